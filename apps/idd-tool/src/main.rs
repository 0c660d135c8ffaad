//! CLI for inspecting an IDD schema registry.
//!
//! Builds the registry from IDD files named on the command line and
//! provides commands for:
//! - Listing file types, versions and merge warnings
//! - Querying object types by file, group, pattern and flags
//! - Exporting live or historical schema files as IDD text or JSON

mod cli;

use std::collections::HashSet;
use std::process;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use idd_factory_core::source::load_sources;
use idd_factory_core::{
    LazyRegistry, ObjectFactoryRegistry, RegistryConfig, SchemaFileType, SchemaObjectDefinition,
    SchemaObjectType, VersionString,
};

use cli::{Cli, Commands, ExportFormat};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt::init();

    let config = RegistryConfig {
        snapshot_dir: cli.snapshot_dir.clone(),
        historical_sources: cli.historical_sources.clone(),
        ..Default::default()
    };

    let sources = match load_sources(&cli.sources) {
        Ok(sources) => sources,
        Err(e) => {
            tracing::error!("Failed to load IDD sources: {}", e);
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    let lazy = LazyRegistry::from_sources(sources, config);
    let registry = match lazy.instance() {
        Ok(registry) => registry,
        Err(e) => {
            tracing::error!("IDD factory cannot start. Fix the IDD sources and retry.");
            eprintln!("error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&registry, cli.command) {
        eprintln!("error: {:#}", e);
        process::exit(2);
    }
}

fn run(registry: &ObjectFactoryRegistry, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Summary => {
            summary(registry);
            Ok(())
        }
        Commands::Objects {
            file,
            group,
            pattern,
            required,
            unique,
        } => {
            let file_type = match file {
                Some(name) => name.parse::<SchemaFileType>()?,
                None => SchemaFileType::WholeRegistry,
            };
            let filter = ObjectFilter {
                group,
                pattern,
                required,
                unique,
            };
            for object in &select_objects(registry, &file_type, &filter)? {
                println!("{}", describe(object));
            }
            Ok(())
        }
        Commands::Header { file } => {
            print!("{}", registry.get_header(&file.parse::<SchemaFileType>()?)?);
            Ok(())
        }
        Commands::Version { file } => {
            println!("{}", registry.get_version(&file.parse::<SchemaFileType>()?)?);
            Ok(())
        }
        Commands::Export {
            file,
            version,
            format,
        } => {
            let file_type: SchemaFileType = file.parse()?;
            let schema = match version {
                Some(version) => {
                    let version = VersionString::parse(&version)?;
                    match registry.get_idd_file_at_version(&file_type, &version) {
                        Some(schema) => schema,
                        None => bail!("No {} IDD file available for version {}", file_type, version),
                    }
                }
                None => registry.get_idd_file(&file_type),
            };
            match format {
                ExportFormat::Idd => print!("{}", schema.to_idd_text()),
                ExportFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&schema).context("Failed to serialize schema file")?
                ),
            }
            Ok(())
        }
    }
}

/// Filters of the `objects` command.
#[derive(Debug, Default)]
struct ObjectFilter {
    group: Option<String>,
    pattern: Option<String>,
    required: bool,
    unique: bool,
}

/// Intersects the registry queries selected by `filter`, in registry order.
fn select_objects(
    registry: &ObjectFactoryRegistry,
    file_type: &SchemaFileType,
    filter: &ObjectFilter,
) -> anyhow::Result<Vec<Arc<SchemaObjectDefinition>>> {
    let mut selections = Vec::new();
    if let Some(pattern) = &filter.pattern {
        selections.push(registry.get_objects_matching(pattern, file_type)?);
    }
    if let Some(group) = &filter.group {
        selections.push(registry.get_objects_in_group(group, file_type));
    }
    if filter.required {
        selections.push(registry.get_required_objects(file_type));
    }
    if filter.unique {
        selections.push(registry.get_unique_objects(file_type));
    }

    let mut selections = selections.into_iter();
    let mut objects = selections
        .next()
        .unwrap_or_else(|| registry.get_objects(file_type));
    for other in selections {
        let keep: HashSet<&SchemaObjectType> = other.iter().map(|o| o.object_type()).collect();
        objects.retain(|o| keep.contains(o.object_type()));
    }
    Ok(objects)
}

fn summary(registry: &ObjectFactoryRegistry) {
    println!("{} object types", registry.object_types().len());
    for file_type in registry.file_types() {
        let count = registry.get_objects(&file_type).len();
        match registry.get_version(&file_type) {
            Ok(version) => println!("  {:<24} {:>10} {:>6} objects", file_type, version, count),
            Err(_) => println!("  {:<24} {:>10} {:>6} objects", file_type, "-", count),
        }
    }
    if !registry.warnings().is_empty() {
        println!();
        for warning in registry.warnings() {
            print!("{}", warning.render_table());
        }
    }
}

fn describe(object: &SchemaObjectDefinition) -> String {
    let mut flags = Vec::new();
    if object.is_required() {
        flags.push("required");
    }
    if object.is_unique() {
        flags.push("unique");
    }
    if flags.is_empty() {
        format!("{:<48} {}", object.name(), object.group())
    } else {
        format!("{:<48} {} [{}]", object.name(), object.group(), flags.join(", "))
    }
}

//! Registry built from IDD files on disk.

use std::collections::BTreeSet;

use tempfile::tempdir;

use idd_factory_core::error::RegistryError;
use idd_factory_core::source::{load_sources, SourceLocation};
use idd_factory_core::{ObjectFactoryRegistry, SchemaFile, SchemaFileType, SchemaObjectType};

use super::helpers::{build_registry, config, write_sources};

fn names(file: &SchemaFile) -> BTreeSet<String> {
    file.objects().iter().map(|o| o.name().to_string()).collect()
}

#[test]
fn test_registry_from_idd_files() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let registry = build_registry(temp_dir.path());
    let os = SchemaFileType::source("OpenStudio");
    let eplus = SchemaFileType::source("Energy+");

    assert_eq!(registry.get_version(&os)?, "3.7.0");
    assert_eq!(registry.get_version(&eplus)?, "23.2.0");
    assert_eq!(
        names(&registry.get_idd_file(&os)),
        ["OS:Version", "OS:Building", "OS:Fan:ConstantVolume", "Zone", "CommentOnly"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    );
    assert_eq!(registry.get_objects(&eplus).len(), 5);
    assert_eq!(registry.objects().len(), 8);
    Ok(())
}

#[test]
fn test_unmatched_removal_is_reported() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let registry = build_registry(temp_dir.path());

    assert_eq!(registry.warnings().len(), 1);
    assert_eq!(registry.warnings()[0].unmatched(), vec!["Output:SQLite"]);
    Ok(())
}

#[test]
fn test_header_lists_inclusion() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let registry = build_registry(temp_dir.path());

    let header = registry.get_header(&SchemaFileType::source("OpenStudio"))?;
    let lines: Vec<_> = header.lines().collect();
    assert_eq!(lines[0], "!IDD_Version 3.7.0");
    assert!(lines.contains(&"! Includes File: 'Energy+'"));
    assert!(lines.contains(&"! Contains all objects from Energy+ IDD_Version 23.2.0, except: "));
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("!   ")).count(),
        4
    );
    Ok(())
}

#[test]
fn test_fields_are_parsed_on_demand() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let registry = build_registry(temp_dir.path());
    let zone_type = SchemaObjectType::from_display("Zone");

    assert_eq!(registry.construction_count(&zone_type), 0);
    let zone = registry.get_object_by_name("zone").unwrap();
    assert_eq!(zone.group(), "Thermal Zones and Surfaces");
    assert_eq!(zone.properties().memo.as_deref(), Some("Defines a thermal zone of the building."));
    assert_eq!(zone.fields().len(), 2);
    assert_eq!(zone.fields()[1].units.as_deref(), Some("deg"));
    assert_eq!(registry.construction_count(&zone_type), 1);
    Ok(())
}

#[test]
fn test_version_objects_and_flags() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let registry = build_registry(temp_dir.path());
    let os = SchemaFileType::source("OpenStudio");

    assert_eq!(registry.get_version_object(&os)?.name(), "OS:Version");
    assert_eq!(
        registry
            .get_version_object(&SchemaFileType::source("Energy+"))?
            .name(),
        "Version"
    );
    let required: Vec<_> = registry
        .get_required_objects(&os)
        .iter()
        .map(|o| o.name().to_string())
        .collect();
    assert_eq!(required, vec!["OS:Building"]);
    assert_eq!(registry.required_objects().len(), 2);
    assert_eq!(registry.get_unique_objects(&os).len(), 2);
    assert_eq!(
        registry.get_groups(&os),
        vec!["", "OpenStudio Building", "OpenStudio Core", "OpenStudio HVAC", "Thermal Zones and Surfaces"]
    );
    Ok(())
}

#[test]
fn test_exported_text_reparses() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let registry = build_registry(temp_dir.path());
    let os = SchemaFileType::source("OpenStudio");

    let live = registry.get_idd_file(&os);
    let reparsed = SchemaFile::parse(&live.to_idd_text(), os.clone())?;
    assert_eq!(reparsed.version(), "3.7.0");
    assert_eq!(names(&reparsed), names(&live));
    for object in live.objects() {
        let other = reparsed.get_object(object.object_type()).unwrap();
        assert_eq!(other.fields(), object.fields(), "{}", object.name());
        assert_eq!(other.group(), object.group());
    }
    Ok(())
}

#[test]
fn test_startup_failures() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let mut locations = write_sources(temp_dir.path());
    locations.reverse();

    let sources = load_sources(&locations)?;
    let err = ObjectFactoryRegistry::new(sources, config(temp_dir.path().join("versions")))
        .unwrap_err();
    assert!(err.is_construction_error());
    assert!(err.to_string().contains("'Energy+' while building 'OpenStudio'"));

    let missing = SourceLocation::parse("Gone,/no/such/dir/Gone.idd")?;
    assert!(matches!(
        load_sources(&[missing]),
        Err(RegistryError::IoError(_))
    ));
    Ok(())
}

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use idd_factory_core::source::SourceLocation;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// IDD source as NAME,PATH; repeat in inclusion order
    #[arg(short, long = "source", value_name = "NAME,PATH", required = true)]
    pub sources: Vec<SourceLocation>,

    /// Root directory of historical snapshots
    #[arg(long, default_value = "./idd/versions")]
    pub snapshot_dir: PathBuf,

    /// Source that can be served by version from snapshots
    #[arg(long = "historical", value_name = "NAME", default_values_t = vec!["OpenStudio".to_string()])]
    pub historical_sources: Vec<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print file types, versions, object counts and merge warnings
    Summary,

    /// List object types, optionally filtered
    Objects {
        /// Restrict to one file type
        #[arg(short, long)]
        file: Option<String>,

        /// Restrict to one group (case-insensitive)
        #[arg(short, long)]
        group: Option<String>,

        /// Regular expression matched against the whole object name
        #[arg(short, long)]
        pattern: Option<String>,

        /// Only objects required at least once per file
        #[arg(long)]
        required: bool,

        /// Only objects allowed at most once per file
        #[arg(long)]
        unique: bool,
    },

    /// Print the synthesized header of a file type
    Header {
        file: String,
    },

    /// Print the version of a file type
    Version {
        file: String,
    },

    /// Write a schema file to stdout
    Export {
        file: String,

        /// Version to export; older versions are read from snapshots
        #[arg(long)]
        version: Option<String>,

        #[arg(long, value_enum, default_value_t = ExportFormat::Idd)]
        format: ExportFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Idd,
    Json,
}

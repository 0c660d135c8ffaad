//! Schema source descriptors and IDD source loading.

mod descriptor;
pub mod parser;
mod validation;


use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::RegistryError;

pub use descriptor::{IncludedSource, ObjectEntry, SchemaSourceDescriptor};
pub use parser::parse_source;
pub use validation::validate_sources;

/// A named IDD file on disk, given as `Name,path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Logical source name, which becomes the file type
    pub name: String,
    /// Path of the IDD file
    pub path: PathBuf,
}

impl SourceLocation {
    /// Parses a `Name,path` argument.
    pub fn parse(arg: &str) -> Result<Self, RegistryError> {
        let (name, path) = arg
            .split_once(',')
            .ok_or_else(|| RegistryError::InvalidSourceSpec(arg.to_string()))?;
        let (name, path) = (name.trim(), path.trim());
        if name.is_empty() || path.is_empty() || name.contains(char::is_whitespace) {
            return Err(RegistryError::InvalidSourceSpec(arg.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            path: PathBuf::from(path),
        })
    }

    /// Reads and parses the IDD file.
    pub fn load(&self) -> Result<SchemaSourceDescriptor, RegistryError> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            RegistryError::io(e, &format!("Failed to read IDD file {}", self.path.display()))
        })?;
        let descriptor = parse_source(&self.name, &text)?;
        tracing::info!(
            "Parsed IDD source '{}' version {} ({} objects, {} inclusions)",
            descriptor.name(),
            descriptor.version(),
            descriptor.objects().len(),
            descriptor.includes().len()
        );
        Ok(descriptor)
    }
}

impl FromStr for SourceLocation {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Loads one descriptor per location, in order.
pub fn load_sources(locations: &[SourceLocation]) -> Result<Vec<SchemaSourceDescriptor>, RegistryError> {
    locations.iter().map(SourceLocation::load).collect()
}

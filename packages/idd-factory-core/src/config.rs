//! Registry configuration.

use std::path::PathBuf;

/// Registry configuration.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Root directory of historical schema snapshots
    pub snapshot_dir: PathBuf,
    /// Sources that can be served by version from snapshots
    pub historical_sources: Vec<String>,
    /// (source name, version object display name) pairs
    pub version_objects: Vec<(String, String)>,
}

impl RegistryConfig {
    /// Returns the version object display name configured for a source.
    pub fn version_object_for(&self, source_name: &str) -> Option<&str> {
        self.version_objects
            .iter()
            .find(|(source, _)| source == source_name)
            .map(|(_, object)| object.as_str())
    }

    /// Returns true if the source supports historical retrieval.
    pub fn is_historical(&self, source_name: &str) -> bool {
        self.historical_sources.iter().any(|s| s == source_name)
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("./idd/versions"),
            historical_sources: vec!["OpenStudio".to_string()],
            version_objects: vec![
                ("EnergyPlus".to_string(), "Version".to_string()),
                ("OpenStudio".to_string(), "OS:Version".to_string()),
            ],
        }
    }
}

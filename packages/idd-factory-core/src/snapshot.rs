//! Historical schema snapshots loaded from disk and cached by version.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::definition::SchemaFile;
use crate::error::RegistryError;
use crate::types::{SchemaFileType, VersionString};

/// Loads `<root>/<major>_<minor>_<patch>/<source>.idd` snapshots of one
/// source and caches them for the life of the loader.
///
/// Cache hits take a shared read lock. Misses read the disk without holding
/// the lock, so loads of different versions do not block each other; the
/// first file inserted for a version wins.
#[derive(Debug)]
pub struct VersionedSnapshotLoader {
    root: PathBuf,
    source_name: String,
    cache: RwLock<HashMap<VersionString, Arc<SchemaFile>>>,
    disk_reads: AtomicUsize,
}

impl VersionedSnapshotLoader {
    pub fn new(root: impl Into<PathBuf>, source_name: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            source_name: source_name.into(),
            cache: RwLock::new(HashMap::new()),
            disk_reads: AtomicUsize::new(0),
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the snapshot for `version`. A missing patch component is 0.
    pub fn snapshot_path(&self, version: &VersionString) -> PathBuf {
        self.root
            .join(format!(
                "{}_{}_{}",
                version.major(),
                version.minor(),
                version.patch().unwrap_or(0)
            ))
            .join(format!("{}.idd", self.source_name))
    }

    /// Returns the snapshot for `version`, reading it on first request.
    ///
    /// A missing file yields `None` and is not cached, so a snapshot added
    /// later is picked up.
    pub fn load(&self, version: &VersionString) -> Option<Arc<SchemaFile>> {
        if let Some(file) = self.cache.read().get(version) {
            return Some(Arc::clone(file));
        }

        let path = self.snapshot_path(version);
        if !path.is_file() {
            tracing::debug!(
                "No {} snapshot for version {} at {}",
                self.source_name,
                version,
                path.display()
            );
            return None;
        }

        self.disk_reads.fetch_add(1, Ordering::Relaxed);
        let file = match read_snapshot(&path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("Failed to load {} snapshot {}: {}", self.source_name, version, e);
                return None;
            }
        };

        let mut cache = self.cache.write();
        let cached = cache
            .entry(version.clone())
            .or_insert_with(|| Arc::new(file));
        Some(Arc::clone(cached))
    }

    /// Versions currently cached, oldest first.
    pub fn cached_versions(&self) -> Vec<VersionString> {
        let mut versions: Vec<_> = self.cache.read().keys().cloned().collect();
        versions.sort();
        versions
    }

    /// Number of snapshot files read from disk so far.
    pub fn disk_reads(&self) -> usize {
        self.disk_reads.load(Ordering::Relaxed)
    }
}

fn read_snapshot(path: &Path) -> Result<SchemaFile, RegistryError> {
    let text = fs::read_to_string(path).map_err(|e| {
        RegistryError::io(e, &format!("Failed to read snapshot {}", path.display()))
    })?;
    // Snapshots are not tracked by the registry.
    SchemaFile::parse(&text, SchemaFileType::UserCustom)
}

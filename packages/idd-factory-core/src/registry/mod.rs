//! Object factory registry: the shared source of object definitions, file
//! membership and schema files.

mod callback;
mod lazy;


use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use regex::Regex;

use crate::config::RegistryConfig;
use crate::definition::{SchemaFile, SchemaObjectDefinition};
use crate::error::RegistryError;
use crate::merge::{compute_membership, synthesize_header, ExclusionWarning, MembershipMap};
use crate::snapshot::VersionedSnapshotLoader;
use crate::source::{validate_sources, SchemaSourceDescriptor};
use crate::types::{SchemaFileType, SchemaObjectType, VersionString};

use callback::ObjectCallback;

pub use callback::CreateObjectFn;
pub use lazy::{LazyRegistry, RegistryState};

/// Callback of one object type and the source that declared it.
#[derive(Debug)]
struct RegisteredObject {
    object_type: SchemaObjectType,
    source_name: String,
    callback: ObjectCallback,
}

/// Version and synthesized header of one tracked source.
#[derive(Debug, Clone)]
struct SourceInfo {
    file_type: SchemaFileType,
    version: VersionString,
    header: String,
}

/// Registry of every object type across the tracked schema sources.
///
/// Built once from an ordered source list. The callback map and membership
/// map are immutable after construction; each callback memoizes its own
/// definition, and historical snapshots are cached by their loaders.
#[derive(Debug)]
pub struct ObjectFactoryRegistry {
    config: RegistryConfig,
    sources: Vec<SourceInfo>,
    object_types: Vec<SchemaObjectType>,
    callbacks: Vec<RegisteredObject>,
    callback_index: HashMap<SchemaObjectType, usize>,
    /// Lowercased display and symbolic names to callback index
    name_index: HashMap<String, usize>,
    membership: MembershipMap,
    warnings: Vec<ExclusionWarning>,
    snapshot_loaders: HashMap<String, VersionedSnapshotLoader>,
}

impl ObjectFactoryRegistry {
    /// Builds the registry from an ordered source list.
    ///
    /// Fails if an inclusion cannot be resolved, a source name repeats, a
    /// source declares a reserved type, or two types share a display name.
    /// Object definitions are not constructed here.
    pub fn new(
        sources: Vec<SchemaSourceDescriptor>,
        config: RegistryConfig,
    ) -> Result<Self, RegistryError> {
        validate_sources(&sources)?;
        let merge = compute_membership(&sources)?;

        let mut infos = Vec::with_capacity(sources.len());
        for source in &sources {
            infos.push(SourceInfo {
                file_type: SchemaFileType::source(source.name()),
                version: source.version().clone(),
                header: synthesize_header(source, &sources)?,
            });
        }

        let mut registry = Self {
            config,
            sources: infos,
            object_types: vec![SchemaObjectType::catchall(), SchemaObjectType::user_custom()],
            callbacks: Vec::new(),
            callback_index: HashMap::new(),
            name_index: HashMap::new(),
            membership: merge.membership,
            warnings: merge.warnings,
            snapshot_loaders: HashMap::new(),
        };

        registry.register(
            SchemaObjectType::catchall(),
            "",
            ObjectCallback::new(SchemaObjectDefinition::catchall),
        )?;
        for source in &sources {
            for entry in source.objects() {
                let owned = entry.clone();
                registry.register(
                    entry.object_type.clone(),
                    source.name(),
                    ObjectCallback::new(move || SchemaObjectDefinition::from_entry(&owned)),
                )?;
                registry.object_types.push(entry.object_type.clone());
            }
        }
        registry.register(
            SchemaObjectType::comment_only(),
            "",
            ObjectCallback::new(SchemaObjectDefinition::comment_only),
        )?;
        registry.object_types.push(SchemaObjectType::comment_only());

        for source in &sources {
            if registry.config.is_historical(source.name()) {
                registry.snapshot_loaders.insert(
                    source.name().to_string(),
                    VersionedSnapshotLoader::new(registry.config.snapshot_dir.clone(), source.name()),
                );
            }
        }

        tracing::info!(
            "IDD factory ready: {} object types across {} files ({} exclusion warnings)",
            registry.callbacks.len(),
            registry.sources.len(),
            registry.warnings.len()
        );
        Ok(registry)
    }

    fn register(
        &mut self,
        object_type: SchemaObjectType,
        source_name: &str,
        callback: ObjectCallback,
    ) -> Result<(), RegistryError> {
        let index = self.callbacks.len();
        if let Some(&existing) = self.callback_index.get(&object_type) {
            let first = &self.callbacks[existing];
            return Err(RegistryError::DuplicateObjectType {
                display_name: object_type.display_name().to_string(),
                first_symbol: first.object_type.symbolic_name().to_string(),
                first_source: first.source_name.clone(),
                second_symbol: object_type.symbolic_name().to_string(),
                second_source: source_name.to_string(),
            });
        }
        self.callback_index.insert(object_type.clone(), index);
        self.name_index
            .entry(object_type.display_name().to_lowercase())
            .or_insert(index);
        self.name_index
            .entry(object_type.symbolic_name().to_lowercase())
            .or_insert(index);
        self.callbacks.push(RegisteredObject {
            object_type,
            source_name: source_name.to_string(),
            callback,
        });
        Ok(())
    }

    fn source_info(&self, file_type: &SchemaFileType) -> Option<&SourceInfo> {
        self.sources.iter().find(|s| &s.file_type == file_type)
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Every object type: `Catchall`, `UserCustom`, the declared types in
    /// source order, then `CommentOnly`.
    pub fn object_types(&self) -> &[SchemaObjectType] {
        &self.object_types
    }

    /// `UserCustom`, `WholeRegistry`, then one file type per source in
    /// declaration order.
    pub fn file_types(&self) -> Vec<SchemaFileType> {
        let mut file_types = vec![SchemaFileType::UserCustom, SchemaFileType::WholeRegistry];
        file_types.extend(self.sources.iter().map(|s| s.file_type.clone()));
        file_types
    }

    /// Exclusion mismatches found while merging sources.
    pub fn warnings(&self) -> &[ExclusionWarning] {
        &self.warnings
    }

    /// Resolves a name to a registered object type by display or symbolic
    /// name, ignoring case. Returns `None` for malformed or unknown names.
    pub fn resolve_object_type(&self, name: &str) -> Option<SchemaObjectType> {
        let parsed = SchemaObjectType::parse(name).ok()?;
        if parsed.is_user_custom() {
            return Some(parsed);
        }
        if let Some(&index) = self.callback_index.get(&parsed) {
            return Some(self.callbacks[index].object_type.clone());
        }
        let index = *self.name_index.get(&parsed.display_name().to_lowercase())?;
        Some(self.callbacks[index].object_type.clone())
    }

    /// Returns the definition of `object_type`, constructing it on first use.
    ///
    /// `UserCustom` and unregistered types yield `None`.
    pub fn get_object(&self, object_type: &SchemaObjectType) -> Option<Arc<SchemaObjectDefinition>> {
        match self.callback_index.get(object_type) {
            Some(&index) => Some(self.callbacks[index].callback.invoke()),
            None => {
                if object_type.is_user_custom() {
                    tracing::info!(
                        "UserCustom objects are not available through the IddFactory. Please query your IddFile by IddObject.name()."
                    );
                } else {
                    tracing::debug!("Object type '{}' is not registered", object_type);
                }
                None
            }
        }
    }

    /// Returns the definition of the object type named `name`. Malformed or
    /// unknown names yield `None`.
    pub fn get_object_by_name(&self, name: &str) -> Option<Arc<SchemaObjectDefinition>> {
        let object_type = self.resolve_object_type(name)?;
        self.get_object(&object_type)
    }

    /// All objects that belong to at least one tracked file.
    pub fn objects(&self) -> Vec<Arc<SchemaObjectDefinition>> {
        self.get_objects(&SchemaFileType::WholeRegistry)
    }

    /// Objects in `file_type`.
    pub fn get_objects(&self, file_type: &SchemaFileType) -> Vec<Arc<SchemaObjectDefinition>> {
        self.collect_where(|object_type| self.is_in_file(object_type, file_type))
    }

    /// Objects whose symbolic or display name fully matches `pattern`.
    pub fn objects_matching(
        &self,
        pattern: &str,
    ) -> Result<Vec<Arc<SchemaObjectDefinition>>, RegistryError> {
        self.get_objects_matching(pattern, &SchemaFileType::WholeRegistry)
    }

    /// Objects in `file_type` whose symbolic or display name fully matches
    /// `pattern`.
    pub fn get_objects_matching(
        &self,
        pattern: &str,
        file_type: &SchemaFileType,
    ) -> Result<Vec<Arc<SchemaObjectDefinition>>, RegistryError> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))
            .map_err(|e| RegistryError::InvalidPattern(e.to_string()))?;
        Ok(self.collect_where(|object_type| {
            self.is_in_file(object_type, file_type)
                && (regex.is_match(object_type.symbolic_name())
                    || regex.is_match(object_type.display_name()))
        }))
    }

    /// Distinct groups across all objects, ignoring case.
    pub fn groups(&self) -> Vec<String> {
        distinct_groups(&self.objects())
    }

    /// Distinct groups in `file_type`, ignoring case.
    pub fn get_groups(&self, file_type: &SchemaFileType) -> Vec<String> {
        distinct_groups(&self.get_objects(file_type))
    }

    /// Objects whose group equals `group`, ignoring case.
    pub fn objects_in_group(&self, group: &str) -> Vec<Arc<SchemaObjectDefinition>> {
        self.get_objects_in_group(group, &SchemaFileType::WholeRegistry)
    }

    /// Objects in `file_type` whose group equals `group`, ignoring case.
    pub fn get_objects_in_group(
        &self,
        group: &str,
        file_type: &SchemaFileType,
    ) -> Vec<Arc<SchemaObjectDefinition>> {
        let group = group.to_lowercase();
        self.get_objects(file_type)
            .into_iter()
            .filter(|o| o.group().to_lowercase() == group)
            .collect()
    }

    /// Objects that must appear at least once in a file.
    pub fn required_objects(&self) -> Vec<Arc<SchemaObjectDefinition>> {
        self.get_required_objects(&SchemaFileType::WholeRegistry)
    }

    pub fn get_required_objects(&self, file_type: &SchemaFileType) -> Vec<Arc<SchemaObjectDefinition>> {
        self.get_objects(file_type)
            .into_iter()
            .filter(|o| o.is_required())
            .collect()
    }

    /// Objects that may appear at most once in a file.
    pub fn unique_objects(&self) -> Vec<Arc<SchemaObjectDefinition>> {
        self.get_unique_objects(&SchemaFileType::WholeRegistry)
    }

    pub fn get_unique_objects(&self, file_type: &SchemaFileType) -> Vec<Arc<SchemaObjectDefinition>> {
        self.get_objects(file_type)
            .into_iter()
            .filter(|o| o.is_unique())
            .collect()
    }

    /// Returns the version record object of a concrete file type.
    ///
    /// Only the file types listed in `RegistryConfig::version_objects` have
    /// one; every other input, sentinels included, is an error.
    pub fn get_version_object(
        &self,
        file_type: &SchemaFileType,
    ) -> Result<Arc<SchemaObjectDefinition>, RegistryError> {
        let object_name = file_type
            .source_name()
            .filter(|_| self.source_info(file_type).is_some())
            .and_then(|name| self.config.version_object_for(name))
            .ok_or_else(|| RegistryError::UnsupportedFileType {
                operation: "unique version object",
                file_type: file_type.to_string(),
            })?;
        self.get_object(&SchemaObjectType::from_display(object_name))
            .ok_or_else(|| RegistryError::VersionObjectNotRegistered {
                file_type: file_type.to_string(),
                object: object_name.to_string(),
            })
    }

    /// Returns the version of a tracked file type.
    pub fn get_version(&self, file_type: &SchemaFileType) -> Result<String, RegistryError> {
        self.source_info(file_type)
            .map(|info| info.version.to_string())
            .ok_or_else(|| RegistryError::UnsupportedFileType {
                operation: "version",
                file_type: file_type.to_string(),
            })
    }

    /// Returns the synthesized header of a tracked file type.
    pub fn get_header(&self, file_type: &SchemaFileType) -> Result<String, RegistryError> {
        self.source_info(file_type)
            .map(|info| info.header.clone())
            .ok_or_else(|| RegistryError::UnsupportedFileType {
                operation: "header",
                file_type: file_type.to_string(),
            })
    }

    /// Returns true if `object_type` belongs to `file_type`.
    ///
    /// `WholeRegistry` matches any type that belongs to some tracked file.
    /// `Catchall` and `UserCustom` belong to no file.
    pub fn is_in_file(&self, object_type: &SchemaObjectType, file_type: &SchemaFileType) -> bool {
        match self.membership.get(object_type) {
            Some(files) => match file_type {
                SchemaFileType::WholeRegistry => !files.is_empty(),
                other => files.contains(other),
            },
            None => false,
        }
    }

    /// Materializes the schema file of `file_type`.
    ///
    /// `UserCustom` yields the empty default file. `WholeRegistry` has no
    /// version or header.
    pub fn get_idd_file(&self, file_type: &SchemaFileType) -> SchemaFile {
        if *file_type == SchemaFileType::UserCustom {
            return SchemaFile::default();
        }

        let mut file = SchemaFile::new(file_type.clone());
        for object in self.get_objects(file_type) {
            file.add_object(object);
        }
        if let Some(info) = self.source_info(file_type) {
            file.set_version(info.version.to_string());
            file.set_header(info.header.clone());
        }
        file
    }

    /// Returns the schema file of `file_type` at `version`.
    ///
    /// The live version is served by [`get_idd_file`](Self::get_idd_file).
    /// Older versions come from on-disk snapshots, and only for the sources
    /// in `RegistryConfig::historical_sources`; those files are stamped
    /// `UserCustom`. Newer versions, sentinels and other sources yield `None`.
    pub fn get_idd_file_at_version(
        &self,
        file_type: &SchemaFileType,
        version: &VersionString,
    ) -> Option<SchemaFile> {
        let Some(info) = self.source_info(file_type) else {
            tracing::warn!("Cannot return the {} IddFile by version.", file_type);
            return None;
        };

        if *version == info.version {
            return Some(self.get_idd_file(file_type));
        }

        let loader = file_type
            .source_name()
            .and_then(|name| self.snapshot_loaders.get(name));
        let Some(loader) = loader else {
            tracing::warn!(
                "At this time, {} IDD files cannot be returned by version.",
                file_type
            );
            return None;
        };

        if *version > info.version {
            tracing::warn!(
                "Requested {} version {} is newer than the current version {}.",
                file_type,
                version,
                info.version
            );
            return None;
        }

        loader.load(version).map(|file| (*file).clone())
    }

    /// Snapshot loader of a historical file type.
    pub fn snapshot_loader(&self, file_type: &SchemaFileType) -> Option<&VersionedSnapshotLoader> {
        file_type
            .source_name()
            .and_then(|name| self.snapshot_loaders.get(name))
    }

    /// Number of times the definition of `object_type` has been constructed:
    /// 0 before first use, 1 after.
    pub fn construction_count(&self, object_type: &SchemaObjectType) -> usize {
        self.callback_index
            .get(object_type)
            .map(|&index| self.callbacks[index].callback.construction_count())
            .unwrap_or(0)
    }

    fn collect_where<F>(&self, keep: F) -> Vec<Arc<SchemaObjectDefinition>>
    where
        F: Fn(&SchemaObjectType) -> bool + Sync,
    {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            self.callbacks
                .par_iter()
                .filter(|registered| keep(&registered.object_type))
                .map(|registered| registered.callback.invoke())
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.callbacks
                .iter()
                .filter(|registered| keep(&registered.object_type))
                .map(|registered| registered.callback.invoke())
                .collect()
        }
    }
}

fn distinct_groups(objects: &[Arc<SchemaObjectDefinition>]) -> Vec<String> {
    let mut groups: BTreeMap<String, String> = BTreeMap::new();
    for object in objects {
        groups
            .entry(object.group().to_lowercase())
            .or_insert_with(|| object.group().to_string());
    }
    groups.into_values().collect()
}

use serde::{Deserialize, Serialize};

use crate::types::{SchemaObjectType, VersionString};

/// One object type declared by a schema source.
///
/// `text` holds the raw IDD block when the entry was parsed from a file; field
/// definitions are parsed from it on first use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub object_type: SchemaObjectType,
    pub group: String,
    pub required: bool,
    pub unique: bool,
    pub text: Option<String>,
}

impl ObjectEntry {
    pub fn new(symbolic_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            object_type: SchemaObjectType::new(symbolic_name, display_name),
            group: String::new(),
            required: false,
            unique: false,
            text: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn symbolic_name(&self) -> &str {
        self.object_type.symbolic_name()
    }

    pub fn display_name(&self) -> &str {
        self.object_type.display_name()
    }
}

/// Inclusion of all objects of an earlier source, minus exclusions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludedSource {
    pub source_name: String,
    pub excluded: Vec<String>,
}

impl IncludedSource {
    pub fn new(source_name: impl Into<String>, excluded: Vec<String>) -> Self {
        Self {
            source_name: source_name.into(),
            excluded,
        }
    }
}

/// Parsed schema source: name, version, header and declared objects.
///
/// Built once at startup and never mutated by the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSourceDescriptor {
    name: String,
    version: VersionString,
    header: String,
    objects: Vec<ObjectEntry>,
    includes: Vec<IncludedSource>,
}

impl SchemaSourceDescriptor {
    pub fn new(name: impl Into<String>, version: VersionString) -> Self {
        Self {
            name: name.into(),
            version,
            header: String::new(),
            objects: Vec::new(),
            includes: Vec::new(),
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_object(mut self, entry: ObjectEntry) -> Self {
        self.objects.push(entry);
        self
    }

    /// Adds an object with an empty group and no structural flags.
    pub fn with_object_named(
        self,
        symbolic_name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        self.with_object(ObjectEntry::new(symbolic_name, display_name))
    }

    /// Includes every object of `source_name` except `excluded`.
    pub fn including<S: Into<String>>(
        mut self,
        source_name: impl Into<String>,
        excluded: impl IntoIterator<Item = S>,
    ) -> Self {
        self.includes.push(IncludedSource::new(
            source_name,
            excluded.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &VersionString {
        &self.version
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn objects(&self) -> &[ObjectEntry] {
        &self.objects
    }

    pub fn includes(&self) -> &[IncludedSource] {
        &self.includes
    }

    /// (symbolic name, display name) pairs in declaration order.
    pub fn object_names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.objects
            .iter()
            .map(|entry| (entry.symbolic_name(), entry.display_name()))
    }

    pub fn find_object(&self, object_type: &SchemaObjectType) -> Option<&ObjectEntry> {
        self.objects
            .iter()
            .find(|entry| &entry.object_type == object_type)
    }
}

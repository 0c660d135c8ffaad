use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::source::parser::scan;
use crate::types::{SchemaFileType, SchemaObjectType};

use super::object::SchemaObjectDefinition;

/// In-memory schema file: a version, a header and object definitions.
///
/// The default value is the empty `UserCustom` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaFile {
    file_type: SchemaFileType,
    version: String,
    header: String,
    objects: Vec<Arc<SchemaObjectDefinition>>,
}

impl SchemaFile {
    pub fn new(file_type: SchemaFileType) -> Self {
        Self {
            file_type,
            version: String::new(),
            header: String::new(),
            objects: Vec::new(),
        }
    }

    pub fn file_type(&self) -> &SchemaFileType {
        &self.file_type
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn objects(&self) -> &[Arc<SchemaObjectDefinition>] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }

    pub fn set_header(&mut self, header: impl Into<String>) {
        self.header = header.into();
    }

    pub fn add_object(&mut self, object: Arc<SchemaObjectDefinition>) {
        self.objects.push(object);
    }

    pub fn get_object(&self, object_type: &SchemaObjectType) -> Option<&Arc<SchemaObjectDefinition>> {
        self.objects.iter().find(|o| o.object_type() == object_type)
    }

    /// Returns the object with the given display name, ignoring case.
    pub fn get_object_by_name(&self, name: &str) -> Option<&Arc<SchemaObjectDefinition>> {
        self.objects
            .iter()
            .find(|o| o.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Renders the file as IDD text.
    ///
    /// Reserved object types are implicit and not written. An `!IDD_Version`
    /// line is emitted ahead of the header when the header lacks one.
    pub fn to_idd_text(&self) -> String {
        let mut out = String::new();
        if !self.header.lines().any(|l| l.starts_with("!IDD_Version")) {
            out.push_str("!IDD_Version ");
            out.push_str(&self.version);
            out.push('\n');
        }
        for line in self.header.lines() {
            if !line.starts_with('!') {
                out.push_str("! ");
            }
            out.push_str(line);
            out.push('\n');
        }

        let mut group: Option<&str> = None;
        for object in self.objects.iter().filter(|o| !o.object_type().is_reserved()) {
            out.push('\n');
            if group != Some(object.group()) {
                out.push_str("\\group ");
                out.push_str(object.group());
                out.push_str("\n\n");
                group = Some(object.group());
            }
            out.push_str(&object.to_idd_text());
            out.push('\n');
        }
        out
    }

    /// Parses IDD text produced by [`SchemaFile::to_idd_text`] into a file of
    /// the given type. Inclusion directives are ignored; `CommentOnly` is
    /// always added.
    pub fn parse(text: &str, file_type: SchemaFileType) -> Result<Self, RegistryError> {
        let source_name = file_type.to_string();
        let scanned = scan(&source_name, text)?;
        if !scanned.includes.is_empty() {
            tracing::warn!(
                "Ignoring {} inclusion directive(s) in flat schema file '{}'",
                scanned.includes.len(),
                source_name
            );
        }

        let mut file = SchemaFile::new(file_type);
        file.version = scanned.version.unwrap_or_default();
        file.header = scanned.header_lines.join("\n");
        for entry in scanned
            .objects
            .iter()
            .filter(|e| !e.object_type.is_reserved())
        {
            file.add_object(Arc::new(SchemaObjectDefinition::from_entry(entry)));
        }
        file.add_object(Arc::new(SchemaObjectDefinition::comment_only()));
        Ok(file)
    }
}

impl Default for SchemaFile {
    fn default() -> Self {
        Self::new(SchemaFileType::UserCustom)
    }
}

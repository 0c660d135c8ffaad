use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::source::parser::parse_object_block;
use crate::source::ObjectEntry;
use crate::types::SchemaObjectType;

const INDENT: &str = "       ";

/// Alpha or numeric IDD field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Alpha,
    Numeric,
}

/// One field of an object definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Field id, e.g. `A1` or `N3`
    pub id: String,
    pub kind: Option<FieldKind>,
    pub name: String,
    pub required: bool,
    pub default: Option<String>,
    pub units: Option<String>,
    pub field_type: Option<String>,
    pub keys: Vec<String>,
    pub notes: Vec<String>,
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            kind: Some(kind),
            ..Default::default()
        }
    }

    /// Applies a field-level `\keyword value` property. Unknown keywords are
    /// ignored.
    pub fn apply_property(&mut self, keyword: &str, value: &str) {
        match keyword {
            "field" => self.name = value.to_string(),
            "required-field" => self.required = true,
            "default" => self.default = Some(value.to_string()),
            "units" => self.units = Some(value.to_string()),
            "type" => self.field_type = Some(value.to_string()),
            "key" => self.keys.push(value.to_string()),
            "note" => self.notes.push(value.to_string()),
            _ => {}
        }
    }
}

/// Object-level structural properties.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectProperties {
    pub memo: Option<String>,
    /// At most one instance allowed per file
    pub unique: bool,
    /// At least one instance required per file
    pub required: bool,
    pub obsolete: bool,
    pub min_fields: usize,
    pub extensible_group_size: Option<usize>,
    pub format: Option<String>,
}

/// Structural definition of one schema object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaObjectDefinition {
    object_type: SchemaObjectType,
    group: String,
    properties: ObjectProperties,
    fields: Vec<FieldDefinition>,
}

impl SchemaObjectDefinition {
    pub fn new(
        object_type: SchemaObjectType,
        group: impl Into<String>,
        properties: ObjectProperties,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            object_type,
            group: group.into(),
            properties,
            fields,
        }
    }

    /// Builds the definition of a declared object type.
    ///
    /// Fields come from the entry's IDD block when present. The entry's group
    /// and flags win over the block, since they are what the registry indexed.
    pub fn from_entry(entry: &ObjectEntry) -> Self {
        let mut properties = ObjectProperties::default();
        let mut fields = Vec::new();

        if let Some(text) = entry.text.as_deref() {
            match parse_object_block(text) {
                Ok(parsed) => {
                    properties = parsed.properties;
                    fields = parsed.fields;
                }
                Err(message) => {
                    tracing::warn!(
                        "Unable to parse fields of IDD object '{}': {}",
                        entry.display_name(),
                        message
                    );
                }
            }
        }
        properties.required = entry.required;
        properties.unique = entry.unique;

        Self::new(entry.object_type.clone(), entry.group.clone(), properties, fields)
    }

    /// Definition returned for `Catchall`: no group, one extensible alpha field.
    pub fn catchall() -> Self {
        let mut field = FieldDefinition::new("A1", FieldKind::Alpha);
        field.name = "Free Text".to_string();
        Self::new(
            SchemaObjectType::catchall(),
            "",
            ObjectProperties {
                extensible_group_size: Some(1),
                ..Default::default()
            },
            vec![field],
        )
    }

    /// Definition returned for `CommentOnly`.
    pub fn comment_only() -> Self {
        Self::new(
            SchemaObjectType::comment_only(),
            "",
            ObjectProperties {
                memo: Some("Autogenerated comment only object.".to_string()),
                ..Default::default()
            },
            Vec::new(),
        )
    }

    pub fn object_type(&self) -> &SchemaObjectType {
        &self.object_type
    }

    /// Display name of the object type.
    pub fn name(&self) -> &str {
        self.object_type.display_name()
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn properties(&self) -> &ObjectProperties {
        &self.properties
    }

    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    pub fn is_required(&self) -> bool {
        self.properties.required
    }

    pub fn is_unique(&self) -> bool {
        self.properties.unique
    }

    /// Renders the definition as an IDD object block.
    pub fn to_idd_text(&self) -> String {
        let mut out = String::new();
        let terminator = if self.fields.is_empty() { ';' } else { ',' };
        let _ = writeln!(out, "{}{}", self.name(), terminator);

        let props = &self.properties;
        if let Some(memo) = &props.memo {
            for line in memo.lines() {
                let _ = writeln!(out, "{}\\memo {}", INDENT, line);
            }
        }
        if props.unique {
            let _ = writeln!(out, "{}\\unique-object", INDENT);
        }
        if props.required {
            let _ = writeln!(out, "{}\\required-object", INDENT);
        }
        if props.obsolete {
            let _ = writeln!(out, "{}\\obsolete", INDENT);
        }
        if props.min_fields > 0 {
            let _ = writeln!(out, "{}\\min-fields {}", INDENT, props.min_fields);
        }
        if let Some(size) = props.extensible_group_size {
            let _ = writeln!(out, "{}\\extensible:{}", INDENT, size);
        }
        if let Some(format) = &props.format {
            let _ = writeln!(out, "{}\\format {}", INDENT, format);
        }

        let last = self.fields.len().saturating_sub(1);
        for (i, field) in self.fields.iter().enumerate() {
            let separator = if i == last { ';' } else { ',' };
            if field.name.is_empty() {
                let _ = writeln!(out, "  {} {}", field.id, separator);
            } else {
                let _ = writeln!(out, "  {} {} \\field {}", field.id, separator, field.name);
            }
            if field.required {
                let _ = writeln!(out, "{}\\required-field", INDENT);
            }
            if let Some(field_type) = &field.field_type {
                let _ = writeln!(out, "{}\\type {}", INDENT, field_type);
            }
            for key in &field.keys {
                let _ = writeln!(out, "{}\\key {}", INDENT, key);
            }
            if let Some(default) = &field.default {
                let _ = writeln!(out, "{}\\default {}", INDENT, default);
            }
            if let Some(units) = &field.units {
                let _ = writeln!(out, "{}\\units {}", INDENT, units);
            }
            for note in &field.notes {
                let _ = writeln!(out, "{}\\note {}", INDENT, note);
            }
        }

        out.truncate(out.trim_end().len());
        out
    }
}

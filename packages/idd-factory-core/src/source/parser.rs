//! IDD text parsing.
//!
//! Source-level parsing only splits the text into object blocks and reads the
//! object-level flags; fields are parsed per block on first use.

use crate::definition::{FieldDefinition, FieldKind, ObjectProperties};
use crate::error::RegistryError;
use crate::types::{symbolic_name_for, VersionString};

use super::descriptor::{IncludedSource, ObjectEntry, SchemaSourceDescriptor};

const VERSION_TAG: &str = "!IDD_Version";

/// Result of scanning IDD text without building a descriptor.
#[derive(Debug, Default)]
pub struct ScannedSource {
    pub header_lines: Vec<String>,
    pub version: Option<String>,
    pub objects: Vec<ObjectEntry>,
    pub includes: Vec<IncludedSource>,
}

/// Fields and properties of one parsed object block.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedObject {
    pub name: String,
    pub properties: ObjectProperties,
    pub fields: Vec<FieldDefinition>,
}

struct OpenBlock {
    name: String,
    group: String,
    line: usize,
    lines: Vec<String>,
    terminated: bool,
}

impl OpenBlock {
    fn finish(self) -> ObjectEntry {
        let mut required = false;
        let mut unique = false;
        for line in &self.lines {
            if let (_, Some(property)) = split_line(line) {
                match split_property(property).0 {
                    "required-object" => required = true,
                    "unique-object" => unique = true,
                    _ => {}
                }
            }
        }
        ObjectEntry::new(symbolic_name_for(&self.name), self.name)
            .with_group(self.group)
            .required(required)
            .unique(unique)
            .with_text(self.lines.join("\n"))
    }
}

/// Parses IDD text into a schema source descriptor named `name`.
///
/// The header is the run of `!` lines before the first object or directive and
/// must carry an `!IDD_Version` line.
pub fn parse_source(name: &str, text: &str) -> Result<SchemaSourceDescriptor, RegistryError> {
    let scanned = scan(name, text)?;
    let version_text = scanned.version.ok_or_else(|| RegistryError::Parse {
        source_name: name.to_string(),
        line: 1,
        message: format!("missing '{}' header line", VERSION_TAG),
    })?;
    let version = VersionString::parse(&version_text)?;

    let mut descriptor =
        SchemaSourceDescriptor::new(name, version).with_header(scanned.header_lines.join("\n"));
    for entry in scanned.objects {
        descriptor = descriptor.with_object(entry);
    }
    for include in scanned.includes {
        descriptor = descriptor.including(include.source_name, include.excluded);
    }
    Ok(descriptor)
}

/// Splits IDD text into header, object blocks and inclusion directives.
pub fn scan(source_name: &str, text: &str) -> Result<ScannedSource, RegistryError> {
    let error = |line: usize, message: String| RegistryError::Parse {
        source_name: source_name.to_string(),
        line,
        message,
    };

    let mut scanned = ScannedSource::default();
    let mut group = String::new();
    let mut in_header = true;
    let mut current: Option<OpenBlock> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim_end();
        let trimmed = line.trim_start();
        let indented = line.starts_with(char::is_whitespace);

        if in_header {
            if trimmed.is_empty() {
                continue;
            }
            if line.starts_with('!') {
                if let Some(rest) = line.strip_prefix(VERSION_TAG) {
                    scanned.version = Some(rest.trim().to_string());
                }
                scanned.header_lines.push(line.to_string());
                continue;
            }
            in_header = false;
        }

        if current.as_ref().is_some_and(|block| block.terminated) {
            // Properties of the last field follow its ';' line.
            if indented && (trimmed.starts_with('\\') || trimmed.starts_with('!')) {
                if let Some(block) = current.as_mut() {
                    block.lines.push(line.to_string());
                }
                continue;
            }
            if let Some(block) = current.take() {
                scanned.objects.push(block.finish());
            }
        } else if let Some(block) = current.as_mut() {
            if trimmed.is_empty() || trimmed.starts_with('!') {
                block.lines.push(line.to_string());
                continue;
            }
            if !indented && !trimmed.starts_with('\\') {
                return Err(error(
                    block.line,
                    format!("object '{}' is not terminated by ';'", block.name),
                ));
            }
            block.lines.push(line.to_string());
            if split_line(trimmed).0.contains(';') {
                block.terminated = true;
            }
            continue;
        }

        if trimmed.is_empty() || trimmed.starts_with('!') {
            continue;
        }

        if let Some(directive) = trimmed.strip_prefix('\\') {
            let (keyword, value) = split_property(directive);
            match keyword {
                "group" => group = value.to_string(),
                "include-file" => {
                    if value.is_empty() {
                        return Err(error(line_no, "'\\include-file' without a file name".into()));
                    }
                    scanned
                        .includes
                        .push(IncludedSource::new(strip_idd_extension(value), Vec::new()));
                }
                "remove-object" => match scanned.includes.last_mut() {
                    Some(include) => include.excluded.push(value.to_string()),
                    None => {
                        return Err(error(
                            line_no,
                            format!("'\\remove-object {}' before any '\\include-file'", value),
                        ))
                    }
                },
                other => {
                    tracing::debug!(
                        "Ignoring top-level directive '\\{}' in '{}' at line {}",
                        other,
                        source_name,
                        line_no
                    );
                }
            }
            continue;
        }

        if indented {
            return Err(error(
                line_no,
                format!("unexpected line outside of an object: '{}'", trimmed),
            ));
        }

        let data = split_line(trimmed).0;
        let Some(end) = data.find([',', ';']) else {
            return Err(error(
                line_no,
                format!("expected ',' or ';' after object name '{}'", data.trim()),
            ));
        };
        let name = data[..end].trim();
        if name.is_empty() {
            return Err(error(line_no, "empty object name".into()));
        }
        current = Some(OpenBlock {
            name: name.to_string(),
            group: group.clone(),
            line: line_no,
            lines: vec![line.to_string()],
            terminated: data[end..].contains(';'),
        });
    }

    if let Some(block) = current.take() {
        if !block.terminated {
            return Err(error(
                block.line,
                format!("object '{}' is not terminated by ';'", block.name),
            ));
        }
        scanned.objects.push(block.finish());
    }

    Ok(scanned)
}

/// Parses the fields and properties of one object block.
pub fn parse_object_block(text: &str) -> Result<ParsedObject, String> {
    let mut lines = text.lines().skip_while(|l| l.trim().is_empty());
    let first = lines.next().ok_or_else(|| "empty object block".to_string())?;

    let (first_data, first_property) = split_line(first.trim());
    let end = first_data
        .find([',', ';'])
        .ok_or_else(|| format!("expected ',' or ';' after '{}'", first_data.trim()))?;
    let name = first_data[..end].trim().to_string();

    let mut parsed = ParsedObject {
        name,
        properties: ObjectProperties::default(),
        fields: Vec::new(),
    };
    let mut current: Option<usize> = None;

    apply_line(&mut parsed, &mut current, &first_data[end + 1..], first_property)?;
    for line in lines {
        let (data, property) = split_line(line.trim());
        apply_line(&mut parsed, &mut current, data, property)?;
    }
    Ok(parsed)
}

fn apply_line(
    parsed: &mut ParsedObject,
    current: &mut Option<usize>,
    data: &str,
    property: Option<&str>,
) -> Result<(), String> {
    for token in data.split([',', ';']) {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let kind = field_kind(token).ok_or_else(|| format!("unexpected field id '{}'", token))?;
        parsed.fields.push(FieldDefinition::new(token, kind));
        *current = Some(parsed.fields.len() - 1);
    }

    let Some(property) = property else {
        return Ok(());
    };
    let (keyword, value) = split_property(property);
    let props = &mut parsed.properties;
    match keyword {
        "memo" => {
            if let Some(memo) = props.memo.as_mut() {
                memo.push('\n');
                memo.push_str(value);
            } else {
                props.memo = Some(value.to_string());
            }
        }
        "unique-object" => props.unique = true,
        "required-object" => props.required = true,
        "obsolete" => props.obsolete = true,
        "min-fields" => {
            props.min_fields = value
                .split_whitespace()
                .next()
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| format!("invalid \\min-fields value '{}'", value))?;
        }
        "format" => props.format = Some(value.to_string()),
        k if k.starts_with("extensible:") => {
            let size = k["extensible:".len()..]
                .parse()
                .map_err(|_| format!("invalid extensible group size in '\\{}'", k))?;
            props.extensible_group_size = Some(size);
        }
        _ => {
            if let Some(field) = current.and_then(|i| parsed.fields.get_mut(i)) {
                field.apply_property(keyword, value);
            }
        }
    }
    Ok(())
}

fn field_kind(token: &str) -> Option<FieldKind> {
    let mut chars = token.chars();
    let kind = match chars.next()? {
        'A' | 'a' => FieldKind::Alpha,
        'N' | 'n' => FieldKind::Numeric,
        _ => return None,
    };
    let digits = chars.as_str();
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        Some(kind)
    } else {
        None
    }
}

/// Splits a line into its data part and the property text after `\`.
///
/// Text after `!` is a comment and dropped.
pub(crate) fn split_line(line: &str) -> (&str, Option<&str>) {
    match line.find(['\\', '!']) {
        Some(i) if line[i..].starts_with('\\') => (&line[..i], Some(&line[i + 1..])),
        Some(i) => (&line[..i], None),
        None => (line, None),
    }
}

/// Splits `keyword value` property text.
pub(crate) fn split_property(property: &str) -> (&str, &str) {
    let property = property.trim();
    match property.find(char::is_whitespace) {
        Some(i) => (&property[..i], property[i..].trim()),
        None => (property, ""),
    }
}

fn strip_idd_extension(file: &str) -> String {
    let lower = file.to_ascii_lowercase();
    if lower.ends_with(".idd") {
        file[..file.len() - 4].to_string()
    } else {
        file.to_string()
    }
}

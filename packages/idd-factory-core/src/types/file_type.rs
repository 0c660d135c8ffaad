use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Logical schema file grouping.
///
/// `UserCustom` and `WholeRegistry` are structural sentinels; every tracked
/// source contributes one `Source` entry, listed in declaration order by
/// [`ObjectFactoryRegistry::file_types`](crate::registry::ObjectFactoryRegistry::file_types).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SchemaFileType {
    /// Arbitrary user-loaded file not tracked by the registry
    UserCustom,
    /// Every object type in the registry
    WholeRegistry,
    /// One tracked schema source, by name
    Source(String),
}

impl SchemaFileType {
    /// File type of a tracked source.
    pub fn source(name: impl Into<String>) -> Self {
        SchemaFileType::Source(name.into())
    }

    /// Source name, or `None` for the sentinels.
    pub fn source_name(&self) -> Option<&str> {
        match self {
            SchemaFileType::Source(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        !matches!(self, SchemaFileType::Source(_))
    }
}

impl fmt::Display for SchemaFileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaFileType::UserCustom => f.write_str("UserCustom"),
            SchemaFileType::WholeRegistry => f.write_str("WholeRegistry"),
            SchemaFileType::Source(name) => f.write_str(name),
        }
    }
}

impl FromStr for SchemaFileType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(RegistryError::InvalidSourceSpec(s.to_string()));
        }
        if trimmed.eq_ignore_ascii_case("UserCustom") {
            Ok(SchemaFileType::UserCustom)
        } else if trimmed.eq_ignore_ascii_case("WholeRegistry")
            || trimmed.eq_ignore_ascii_case("WholeFactory")
        {
            Ok(SchemaFileType::WholeRegistry)
        } else {
            Ok(SchemaFileType::Source(trimmed.to_string()))
        }
    }
}

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Display name of the default object type.
pub const CATCHALL: &str = "Catchall";
/// Display name of the object type for untracked user files.
pub const USER_CUSTOM: &str = "UserCustom";
/// Display name of the comment-only object type present in every file.
pub const COMMENT_ONLY: &str = "CommentOnly";

const RESERVED: [&str; 3] = [CATCHALL, USER_CUSTOM, COMMENT_ONLY];

/// Identity of one schema object type.
///
/// Equality, ordering and hashing use the display name only, so a type built
/// from a parsed name and one taken from the registry are interchangeable as
/// map keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaObjectType {
    symbolic_name: String,
    display_name: String,
}

impl SchemaObjectType {
    /// Creates an object type from its symbolic and display names.
    pub fn new(symbolic_name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            symbolic_name: symbolic_name.into(),
            display_name: display_name.into(),
        }
    }

    /// Creates an object type, deriving the symbolic name from the display name.
    pub fn from_display(display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        Self {
            symbolic_name: symbolic_name_for(&display_name),
            display_name,
        }
    }

    /// Parses an object type name.
    ///
    /// Reserved names match case-insensitively. Names that are empty or carry
    /// IDD punctuation (`,`, `;`, `!`, `\`) or line breaks are rejected.
    pub fn parse(name: &str) -> Result<Self, RegistryError> {
        let trimmed = name.trim();
        if trimmed.is_empty()
            || trimmed
                .chars()
                .any(|c| matches!(c, ',' | ';' | '!' | '\\' | '\n' | '\r'))
        {
            return Err(RegistryError::InvalidObjectName(name.to_string()));
        }
        if let Some(reserved) = RESERVED.iter().find(|r| r.eq_ignore_ascii_case(trimmed)) {
            return Ok(Self::new(*reserved, *reserved));
        }
        Ok(Self::from_display(trimmed))
    }

    /// The default type, used for objects with no specific or a malformed type.
    pub fn catchall() -> Self {
        Self::new(CATCHALL, CATCHALL)
    }

    /// The type of objects loaded from files the registry does not track.
    pub fn user_custom() -> Self {
        Self::new(USER_CUSTOM, USER_CUSTOM)
    }

    /// The synthetic free-text comment type.
    pub fn comment_only() -> Self {
        Self::new(COMMENT_ONLY, COMMENT_ONLY)
    }

    /// Identifier used in code, e.g. `OS_Version`.
    pub fn symbolic_name(&self) -> &str {
        &self.symbolic_name
    }

    /// Schema-exact name, e.g. `OS:Version`.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns true for `Catchall`, `UserCustom` and `CommentOnly`.
    pub fn is_reserved(&self) -> bool {
        RESERVED.contains(&self.display_name.as_str())
    }

    pub fn is_catchall(&self) -> bool {
        self.display_name == CATCHALL
    }

    pub fn is_user_custom(&self) -> bool {
        self.display_name == USER_CUSTOM
    }

    pub fn is_comment_only(&self) -> bool {
        self.display_name == COMMENT_ONLY
    }
}

/// Returns true if `name` collides with a reserved object type.
pub fn is_reserved_name(name: &str) -> bool {
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name.trim()))
}

/// Derives the symbolic name of a display name (`OS:Coil:Heating-DX` becomes
/// `OS_Coil_Heating_DX`).
pub fn symbolic_name_for(display_name: &str) -> String {
    display_name
        .trim()
        .chars()
        .map(|c| match c {
            ':' | '-' | ' ' | '/' => '_',
            other => other,
        })
        .collect()
}

impl Default for SchemaObjectType {
    fn default() -> Self {
        Self::catchall()
    }
}

impl PartialEq for SchemaObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.display_name == other.display_name
    }
}

impl Eq for SchemaObjectType {}

impl Hash for SchemaObjectType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.display_name.hash(state);
    }
}

impl PartialOrd for SchemaObjectType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SchemaObjectType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.display_name.cmp(&other.display_name)
    }
}

impl fmt::Display for SchemaObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

impl FromStr for SchemaObjectType {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

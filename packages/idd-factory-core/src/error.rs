//! Registry error types.

use thiserror::Error;

/// Schema registry errors.
///
/// Construction-time variants (`UnresolvedInclusion`, `DuplicateSource`,
/// `DuplicateObjectType`, `DuplicateSymbolicName`, `ReservedObjectType`,
/// `Parse`) leave the registry
/// unbuilt. Query-time variants are local to the failing call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Inclusion names a source that was not declared earlier
    #[error(
        "Unable to locate included IDD file '{included}' while building '{source_name}'. The available files are named: {}",
        .available.join(", ")
    )]
    UnresolvedInclusion {
        source_name: String,
        included: String,
        available: Vec<String>,
    },

    /// Two sources share a name
    #[error("IDD source '{0}' declared more than once")]
    DuplicateSource(String),

    /// Two object types share a display name
    #[error(
        "Object type '{display_name}' is declared twice: as '{first_symbol}' in '{first_source}' and as '{second_symbol}' in '{second_source}'"
    )]
    DuplicateObjectType {
        display_name: String,
        first_symbol: String,
        first_source: String,
        second_symbol: String,
        second_source: String,
    },

    /// Two object types share a symbolic name
    #[error(
        "Symbolic name '{symbolic_name}' is used twice: by '{first_display}' in '{first_source}' and by '{second_display}' in '{second_source}'"
    )]
    DuplicateSymbolicName {
        symbolic_name: String,
        first_display: String,
        first_source: String,
        second_display: String,
        second_source: String,
    },

    /// Source declares one of the reserved object types
    #[error("Source '{source_name}' declares reserved object type '{name}'")]
    ReservedObjectType { source_name: String, name: String },

    /// Operation is only defined for a concrete, versioned file type
    #[error("No {operation} to return for IddFileType {file_type}")]
    UnsupportedFileType {
        operation: &'static str,
        file_type: String,
    },

    /// The configured version object is missing from the registry
    #[error("Version object '{object}' for IddFileType {file_type} is not registered")]
    VersionObjectNotRegistered { file_type: String, object: String },

    /// Malformed version string
    #[error("Invalid version string '{0}'")]
    InvalidVersion(String),

    /// Malformed object type name
    #[error("Invalid object type name '{0}'")]
    InvalidObjectName(String),

    /// Malformed `Name,path` source argument
    #[error("Invalid IDD source argument '{0}', expected NAME,PATH")]
    InvalidSourceSpec(String),

    /// Malformed object name pattern
    #[error("Invalid object name pattern: {0}")]
    InvalidPattern(String),

    /// IDD text could not be parsed
    #[error("Parse error in '{source_name}' at line {line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    /// I/O error while reading sources or snapshots
    #[error("I/O error: {0}")]
    IoError(String),
}

impl RegistryError {
    /// Classifies an I/O error with the operation context.
    pub fn io(error: std::io::Error, context: &str) -> Self {
        RegistryError::IoError(format!("{}: {}", context, error))
    }

    /// Returns true for errors raised while building the registry.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            RegistryError::UnresolvedInclusion { .. }
                | RegistryError::DuplicateSource(_)
                | RegistryError::DuplicateObjectType { .. }
                | RegistryError::DuplicateSymbolicName { .. }
                | RegistryError::ReservedObjectType { .. }
                | RegistryError::Parse { .. }
        )
    }
}

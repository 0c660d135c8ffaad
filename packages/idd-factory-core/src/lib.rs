//! Schema object factory for IDD definition files.
//!
//! Merges IDD sources into a registry of object types, tracks which file
//! groupings each type belongs to, constructs object definitions lazily and
//! serves historical schema snapshots from disk.

pub mod config;
pub mod definition;
pub mod error;
pub mod merge;
pub mod registry;
pub mod snapshot;
pub mod source;
pub mod types;

pub use config::RegistryConfig;
pub use definition::{SchemaFile, SchemaObjectDefinition};
pub use error::RegistryError;
pub use registry::{LazyRegistry, ObjectFactoryRegistry, RegistryState};
pub use snapshot::VersionedSnapshotLoader;
pub use source::{SchemaSourceDescriptor, SourceLocation};
pub use types::{SchemaFileType, SchemaObjectType, VersionString};

//! Object definitions and whole schema files.

mod file;
mod object;


pub use file::SchemaFile;
pub use object::{FieldDefinition, FieldKind, ObjectProperties, SchemaObjectDefinition};

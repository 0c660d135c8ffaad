//! Object type identities, file groupings and version strings.

mod file_type;
mod object_type;
mod version;


pub use file_type::SchemaFileType;
pub use object_type::{
    is_reserved_name, symbolic_name_for, SchemaObjectType, CATCHALL, COMMENT_ONLY, USER_CUSTOM,
};
pub use version::VersionString;

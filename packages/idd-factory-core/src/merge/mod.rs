//! Membership of object types in file types, resolved across inclusions.

mod header;


use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;

use crate::error::RegistryError;
use crate::source::{IncludedSource, SchemaSourceDescriptor};
use crate::types::{SchemaFileType, SchemaObjectType};

pub use header::{synthesize_header, HeaderBlock, HeaderTemplate};

/// Object type to the set of file types it belongs to.
pub type MembershipMap = HashMap<SchemaObjectType, BTreeSet<SchemaFileType>>;

/// Exclusion list that did not fully match the included source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionWarning {
    /// Including source
    pub source_name: String,
    /// Included source
    pub included: String,
    /// Names declared for removal
    pub declared: Vec<String>,
    /// Names actually removed
    pub removed: Vec<String>,
    /// Declared names that matched no object of the included source
    pub unmatched: Vec<String>,
}

impl ExclusionWarning {
    /// Declared names that removed nothing.
    pub fn unmatched(&self) -> Vec<&str> {
        self.unmatched.iter().map(String::as_str).collect()
    }

    /// Two-column "declared vs. removed" table.
    pub fn render_table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Did not encounter all 'objects to remove' while including file '{}' in file '{}'.",
            self.included, self.source_name
        );
        let _ = writeln!(out, "\\remove-object Tags      Objects Actually Removed ");
        let _ = writeln!(out, "------------------------- -------------------------");
        let rows = self.declared.len().max(self.removed.len());
        for i in 0..rows {
            let left = self.declared.get(i).map(String::as_str).unwrap_or(" ");
            let right = self.removed.get(i).map(String::as_str).unwrap_or(" ");
            let _ = writeln!(out, "{:>25} {:>25}", left, right);
        }
        out
    }
}

/// Output of [`compute_membership`].
#[derive(Debug, Clone, Default)]
pub struct MergeResult {
    pub membership: MembershipMap,
    pub warnings: Vec<ExclusionWarning>,
}

/// Computes which file types every object type belongs to.
///
/// Each source's declared types belong to its file type. Each inclusion adds
/// every member of the included source (its declared and inherited types)
/// except the excluded names. Inclusions must name an earlier source.
/// `CommentOnly` joins every source's file type; `Catchall` joins none.
pub fn compute_membership(
    sources: &[SchemaSourceDescriptor],
) -> Result<MergeResult, RegistryError> {
    let mut result = MergeResult::default();
    // Ordered members per processed source, without CommentOnly.
    let mut members: Vec<Vec<SchemaObjectType>> = Vec::with_capacity(sources.len());

    for (index, source) in sources.iter().enumerate() {
        let file_type = SchemaFileType::source(source.name());
        let mut own: Vec<SchemaObjectType> = Vec::new();
        let mut seen: BTreeSet<SchemaObjectType> = BTreeSet::new();

        for entry in source.objects() {
            if seen.insert(entry.object_type.clone()) {
                own.push(entry.object_type.clone());
            }
        }

        for include in source.includes() {
            let earlier = &sources[..index];
            let included_index = earlier
                .iter()
                .position(|s| s.name() == include.source_name)
                .ok_or_else(|| unresolved(source, include, earlier))?;

            let mut removed = Vec::new();
            for object_type in &members[included_index] {
                if is_excluded(object_type, include) {
                    removed.push(object_type.clone());
                    continue;
                }
                if seen.insert(object_type.clone()) {
                    own.push(object_type.clone());
                }
            }

            if let Some(warning) = validate_exclusions(source.name(), include, &removed) {
                tracing::warn!("{}", warning.render_table());
                result.warnings.push(warning);
            }
        }

        for object_type in &own {
            result
                .membership
                .entry(object_type.clone())
                .or_default()
                .insert(file_type.clone());
        }
        result
            .membership
            .entry(SchemaObjectType::comment_only())
            .or_default()
            .insert(file_type);
        members.push(own);
    }

    Ok(result)
}

/// Compares the exclusion list of an inclusion with the object types it
/// actually removed.
///
/// Returns a warning when some declared name matched none of `removed`.
pub fn validate_exclusions(
    source_name: &str,
    include: &IncludedSource,
    removed: &[SchemaObjectType],
) -> Option<ExclusionWarning> {
    let unmatched: Vec<String> = include
        .excluded
        .iter()
        .filter(|name| !removed.iter().any(|object_type| matches_name(object_type, name)))
        .cloned()
        .collect();
    if unmatched.is_empty() {
        return None;
    }
    Some(ExclusionWarning {
        source_name: source_name.to_string(),
        included: include.source_name.clone(),
        declared: include.excluded.clone(),
        removed: removed
            .iter()
            .map(|object_type| object_type.symbolic_name().to_string())
            .collect(),
        unmatched,
    })
}

fn is_excluded(object_type: &SchemaObjectType, include: &IncludedSource) -> bool {
    include
        .excluded
        .iter()
        .any(|name| matches_name(object_type, name))
}

fn matches_name(object_type: &SchemaObjectType, name: &str) -> bool {
    object_type.symbolic_name() == name || object_type.display_name() == name
}

fn unresolved(
    source: &SchemaSourceDescriptor,
    include: &IncludedSource,
    earlier: &[SchemaSourceDescriptor],
) -> RegistryError {
    RegistryError::UnresolvedInclusion {
        source_name: source.name().to_string(),
        included: include.source_name.clone(),
        available: earlier.iter().map(|s| s.name().to_string()).collect(),
    }
}

/// Finds the source `included` among `sources` on behalf of `source_name`.
pub(crate) fn find_source<'a>(
    source_name: &str,
    included: &str,
    sources: &'a [SchemaSourceDescriptor],
) -> Result<&'a SchemaSourceDescriptor, RegistryError> {
    sources
        .iter()
        .find(|s| s.name() == included)
        .ok_or_else(|| RegistryError::UnresolvedInclusion {
            source_name: source_name.to_string(),
            included: included.to_string(),
            available: sources.iter().map(|s| s.name().to_string()).collect(),
        })
}

//! Source list validation run before the registry is built.

use std::collections::{HashMap, HashSet};

use crate::error::RegistryError;
use crate::types::is_reserved_name;

use super::descriptor::SchemaSourceDescriptor;

/// Validates an ordered source list.
///
/// Checks that source names are distinct, that no source declares a reserved
/// object type, that every display name and every symbolic name is declared
/// once across all sources, and that each inclusion names an earlier source.
pub fn validate_sources(sources: &[SchemaSourceDescriptor]) -> Result<(), RegistryError> {
    let mut seen_sources: HashSet<&str> = HashSet::new();
    // display name -> (symbolic name, source name)
    let mut declared: HashMap<&str, (&str, &str)> = HashMap::new();
    // symbolic name -> (display name, source name)
    let mut symbols: HashMap<&str, (&str, &str)> = HashMap::new();

    for source in sources {
        for include in source.includes() {
            if !seen_sources.contains(include.source_name.as_str()) {
                return Err(RegistryError::UnresolvedInclusion {
                    source_name: source.name().to_string(),
                    included: include.source_name.clone(),
                    available: sources
                        .iter()
                        .take_while(|s| s.name() != source.name())
                        .map(|s| s.name().to_string())
                        .collect(),
                });
            }
        }

        if !seen_sources.insert(source.name()) {
            return Err(RegistryError::DuplicateSource(source.name().to_string()));
        }

        for (symbolic, display) in source.object_names() {
            if is_reserved_name(display) || is_reserved_name(symbolic) {
                return Err(RegistryError::ReservedObjectType {
                    source_name: source.name().to_string(),
                    name: display.to_string(),
                });
            }
            if let Some((first_symbol, first_source)) = declared.insert(display, (symbolic, source.name())) {
                return Err(RegistryError::DuplicateObjectType {
                    display_name: display.to_string(),
                    first_symbol: first_symbol.to_string(),
                    first_source: first_source.to_string(),
                    second_symbol: symbolic.to_string(),
                    second_source: source.name().to_string(),
                });
            }
            if let Some((first_display, first_source)) = symbols.insert(symbolic, (display, source.name())) {
                return Err(RegistryError::DuplicateSymbolicName {
                    symbolic_name: symbolic.to_string(),
                    first_display: first_display.to_string(),
                    first_source: first_source.to_string(),
                    second_display: display.to_string(),
                    second_source: source.name().to_string(),
                });
            }
        }
    }

    Ok(())
}

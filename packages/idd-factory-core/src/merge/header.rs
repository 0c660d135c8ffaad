use crate::error::RegistryError;
use crate::source::SchemaSourceDescriptor;

use super::find_source;

const RULE: &str =
    "! **************************************************************************";

/// One block of a synthesized file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderBlock {
    /// Header text copied from the source, line by line
    Verbatim(String),
    /// Summary of one inclusion
    Inclusion {
        source_name: String,
        version: String,
        excluded: Vec<String>,
    },
}

/// Ordered header blocks for one file type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderTemplate {
    blocks: Vec<HeaderBlock>,
}

impl HeaderTemplate {
    /// Builds the template for `source`: its own header, then one summary per
    /// inclusion. Included sources are looked up in `sources`.
    pub fn for_source(
        source: &SchemaSourceDescriptor,
        sources: &[SchemaSourceDescriptor],
    ) -> Result<Self, RegistryError> {
        let mut blocks = vec![HeaderBlock::Verbatim(source.header().to_string())];
        for include in source.includes() {
            let included = find_source(source.name(), &include.source_name, sources)?;
            blocks.push(HeaderBlock::Inclusion {
                source_name: included.name().to_string(),
                version: included.version().to_string(),
                excluded: include.excluded.clone(),
            });
        }
        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[HeaderBlock] {
        &self.blocks
    }

    /// Renders the header text. Every line ends with `\n`; tooling downstream
    /// parses the starred inclusion blocks line by line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                HeaderBlock::Verbatim(text) => {
                    for line in text.lines() {
                        out.push_str(line);
                        out.push('\n');
                    }
                }
                HeaderBlock::Inclusion {
                    source_name,
                    version,
                    excluded,
                } => {
                    out.push_str("!\n");
                    out.push_str(RULE);
                    out.push('\n');
                    out.push_str(&format!("! Includes File: '{}'\n", source_name));
                    out.push_str("!\n");
                    out.push_str(&format!(
                        "! Contains all objects from {} IDD_Version {}, except: \n",
                        source_name, version
                    ));
                    for name in excluded {
                        out.push_str(&format!("!   {}\n", name));
                    }
                    out.push_str(RULE);
                    out.push('\n');
                }
            }
        }
        out
    }
}

/// Synthesizes the header of `source`.
pub fn synthesize_header(
    source: &SchemaSourceDescriptor,
    sources: &[SchemaSourceDescriptor],
) -> Result<String, RegistryError> {
    Ok(HeaderTemplate::for_source(source, sources)?.render())
}

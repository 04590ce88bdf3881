use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Statement flavor produced by the synthesizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportSyntax {
    #[default]
    Import,
    Require,
}

/// Case convention applied to a raw candidate name when deriving a binding
/// identifier. `Default` strips the name down to identifier characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamingConvention {
    CamelCase,
    PascalCase,
    SnakeCase,
    LowerCase,
    #[default]
    Default,
}

/// User-configured naming rule: the first rule whose regular expression
/// matches the raw name substitutes per `replace` and short-circuits the
/// rest of the naming pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamingRule {
    pub pattern: String,
    pub replace: String,
}

/// One allow-list rule: when `document` matches the requesting document's
/// path, only candidates matching one of the `allow` patterns are offered.
/// The first matching rule wins; no matching rule means no filtering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FilterRule {
    pub document: String,
    pub allow: Vec<String>,
}

/// Configuration surface consumed by the engine. Loadable from a JSON file;
/// every field has a default so partial files work.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportOptions {
    pub syntax: ImportSyntax,
    pub grouping: bool,
    pub file_extension: bool,
    pub index_file: bool,
    pub quote_character: char,
    pub semi_colons: bool,
    pub variable_naming_convention: NamingConvention,
    pub predefined_variable_names: Vec<NamingRule>,
    pub filtered_file_list: Vec<FilterRule>,
    pub allow_type_script_files: bool,
    /// Bound on the most-recently-used candidate list
    pub recency_limit: usize,
}

impl Default for ImportOptions {
    fn default() -> ImportOptions {
        ImportOptions {
            syntax: ImportSyntax::Import,
            grouping: true,
            file_extension: false,
            index_file: true,
            quote_character: '\'',
            semi_colons: false,
            variable_naming_convention: NamingConvention::Default,
            predefined_variable_names: Vec::new(),
            filtered_file_list: Vec::new(),
            allow_type_script_files: false,
            recency_limit: 10,
        }
    }
}

impl ImportOptions {
    pub fn load(path: &Path) -> Result<ImportOptions> {
        let txt = fs::read_to_string(path)
            .with_context(|| format!("Failed to read options file {}", path.display()))?;
        serde_json::from_str(&txt)
            .with_context(|| format!("Failed to parse options file {}", path.display()))
    }
}

use std::path::Path;

/// Operation a language plugin is capable of. Capabilities are checked
/// before dispatch instead of probing for optional methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginOp {
    AddImport,
    CutImport,
    FixImports,
}

/// A source-language plugin described by its document extensions and the
/// operations it supports.
#[derive(Debug, Clone, Copy)]
pub struct LanguagePlugin {
    pub id: &'static str,
    pub extensions: &'static [&'static str],
    pub ops: &'static [PluginOp],
}

impl LanguagePlugin {
    pub fn supports(&self, op: PluginOp) -> bool {
        self.ops.contains(&op)
    }
}

pub const PLUGINS: &[LanguagePlugin] = &[
    LanguagePlugin {
        id: "javascript",
        extensions: &["js", "jsx", "mjs", "cjs"],
        ops: &[PluginOp::AddImport, PluginOp::CutImport, PluginOp::FixImports],
    },
    LanguagePlugin {
        id: "typescript",
        extensions: &["ts", "tsx", "mts", "cts"],
        ops: &[PluginOp::AddImport, PluginOp::CutImport, PluginOp::FixImports],
    },
];

/// Plugin recognizing the document's extension, if any. An unrecognized
/// document makes the whole operation yield no result.
pub fn plugin_for(document: &Path) -> Option<&'static LanguagePlugin> {
    let ext = document.extension().and_then(|e| e.to_str())?;
    PLUGINS.iter().find(|p| p.extensions.contains(&ext))
}

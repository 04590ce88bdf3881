//! Constants for file extensions and module resolution.
//!
//! This module centralizes extension handling so that candidate collection,
//! module resolution, and statement synthesis agree on what counts as a
//! JavaScript/TypeScript module and what counts as an index file.

/// File extensions for JavaScript/TypeScript files that can be imported
pub const JS_TS_EXTENSIONS: &[&str] = &[
    "ts",  // TypeScript
    "tsx", // TypeScript with JSX
    "mts", // TypeScript module
    "cts", // TypeScript CommonJS
    "js",  // JavaScript
    "jsx", // JavaScript with JSX
    "mjs", // JavaScript module
    "cjs", // JavaScript CommonJS
];

/// TypeScript-only extensions, excluded for JavaScript consumers unless the
/// `allowTypeScriptFiles` option opts in
pub const TS_ONLY_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

/// Non-module asset extensions offered as candidates; these are imported with
/// a bare side-effect form and never carry a binding name
pub const ASSET_EXTENSIONS: &[&str] = &["css", "scss", "sass", "less", "json", "svg"];

/// Extensions to try when resolving module requests (in priority order)
pub const RESOLVE_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Index file names to try when resolving directory imports
pub const INDEX_FILES: &[&str] = &[
    "index.ts",
    "index.tsx",
    "index.mts",
    "index.cts",
    "index.js",
    "index.jsx",
    "index.mjs",
    "index.cjs",
];

/// True when the extension (without dot) belongs to the JS/TS module family
pub fn is_script_extension(ext: &str) -> bool {
    JS_TS_EXTENSIONS.contains(&ext)
}

/// True for a file named `index` with a recognized module extension
pub fn is_index_name(base_name: &str, ext: &str) -> bool {
    base_name == "index" && is_script_extension(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_files_cover_all_extensions() {
        assert_eq!(INDEX_FILES.len(), JS_TS_EXTENSIONS.len());
        for ext in JS_TS_EXTENSIONS {
            let expected = format!("index.{}", ext);
            assert!(INDEX_FILES.contains(&expected.as_str()), "INDEX_FILES missing '{}'", expected);
        }
    }

    #[test]
    fn test_ts_only_is_subset_of_script_family() {
        for ext in TS_ONLY_EXTENSIONS {
            assert!(JS_TS_EXTENSIONS.contains(ext));
        }
    }

    #[test]
    fn test_index_name_detection() {
        assert!(is_index_name("index", "ts"));
        assert!(is_index_name("index", "js"));
        assert!(!is_index_name("index", "css"));
        assert!(!is_index_name("main", "ts"));
    }
}

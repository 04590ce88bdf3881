use log::{trace, warn};
use regex::Regex;
use std::path::Path;

use oxiport_core::{Candidate, TS_ONLY_EXTENSIONS, file_candidate_id, to_posix};

use crate::options::ImportOptions;

/// Filter the candidate set for one requesting document:
/// - the document's own file is never offered;
/// - TypeScript-only files are excluded for a JavaScript consumer unless
///   `allowTypeScriptFiles` opts in;
/// - the first `filteredFileList` rule whose document pattern matches applies
///   its allow-list to file candidates; no matching rule means no filtering.
pub fn filter_candidates(
    candidates: &[Candidate],
    document: &Path,
    opts: &ImportOptions,
) -> Vec<Candidate> {
    let own_id = file_candidate_id(document);
    let doc_posix = to_posix(document);
    let doc_ext = document.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let js_consumer = matches!(doc_ext, "js" | "jsx" | "mjs" | "cjs");

    let allow_patterns = matching_allow_list(&doc_posix, opts);

    candidates
        .iter()
        .filter(|c| c.id != own_id)
        .filter(|c| {
            if !js_consumer || opts.allow_type_script_files {
                return true;
            }
            !is_ts_only(c)
        })
        .filter(|c| match &allow_patterns {
            Some(patterns) if c.is_file() => {
                patterns.iter().any(|re| re.is_match(&c.id))
            }
            _ => true,
        })
        .cloned()
        .collect()
}

fn is_ts_only(candidate: &Candidate) -> bool {
    candidate
        .label
        .rsplit('.')
        .next()
        .map(|ext| TS_ONLY_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Compile the allow-list of the first rule matching the document path
fn matching_allow_list(doc_posix: &str, opts: &ImportOptions) -> Option<Vec<Regex>> {
    for rule in &opts.filtered_file_list {
        let doc_re = match Regex::new(&rule.document) {
            Ok(re) => re,
            Err(e) => {
                warn!("Ignoring invalid filter pattern '{}': {}", rule.document, e);
                continue;
            }
        };
        if doc_re.is_match(doc_posix) {
            trace!("Filter rule '{}' applies to {}", rule.document, doc_posix);
            let compiled = rule
                .allow
                .iter()
                .filter_map(|p| match Regex::new(p) {
                    Ok(re) => Some(re),
                    Err(e) => {
                        warn!("Ignoring invalid allow pattern '{}': {}", p, e);
                        None
                    }
                })
                .collect();
            return Some(compiled);
        }
    }
    None
}

use std::cmp::Ordering;
use std::path::Path;

use oxiport_core::{Candidate, to_posix};

/// Two-key stable sort of a candidate list for one requesting document.
///
/// Files sort before packages. Among files the primary key is directory
/// proximity: candidates sharing the longest path prefix with the document's
/// directory sort first, ties broken by fewer remaining components (same
/// directory, then ancestors/descendants, then unrelated). The secondary key
/// is the case-insensitive name key, where index files carry a sentinel that
/// sorts before every sibling. Packages sort alphabetically.
pub fn sort_candidates(candidates: &mut [Candidate], document: &Path) {
    let doc_dir = document.parent().map(to_posix).unwrap_or_default();
    let doc_components: Vec<&str> = components(&doc_dir);

    candidates.sort_by(|a, b| match (a.is_file(), b.is_file()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.sort_name_key.cmp(&b.sort_name_key),
        (true, true) => {
            let ka = proximity_key(&a.sort_dir, &doc_components);
            let kb = proximity_key(&b.sort_dir, &doc_components);
            ka.cmp(&kb).then_with(|| a.sort_name_key.cmp(&b.sort_name_key))
        }
    });
}

fn components(posix: &str) -> Vec<&str> {
    posix.split('/').filter(|c| !c.is_empty()).collect()
}

/// (negated shared-prefix length, remaining distance): smaller sorts earlier
fn proximity_key(candidate_dir: &str, doc_components: &[&str]) -> (i64, usize) {
    let cand = components(candidate_dir);
    let shared = cand.iter().zip(doc_components.iter()).take_while(|(a, b)| a == b).count();
    let distance = (cand.len() - shared) + (doc_components.len() - shared);
    (-(shared as i64), distance)
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use oxiport_core::Candidate;

fn default_limit() -> usize {
    10
}

/// Bounded most-recently-used candidate list per language plugin, used to
/// bias candidate ordering. Serialization round-trips the plugin → id-list
/// mapping order-preservingly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecencyTracker {
    data: HashMap<String, Vec<String>>,
    #[serde(default = "default_limit")]
    limit: usize,
}

impl Default for RecencyTracker {
    fn default() -> RecencyTracker {
        RecencyTracker::new(default_limit())
    }
}

impl RecencyTracker {
    pub fn new(limit: usize) -> RecencyTracker {
        RecencyTracker { data: HashMap::new(), limit }
    }

    /// Stable-sort candidates by recorded rank for the plugin. Candidates
    /// without a recorded rank sort after all ranked ones, keeping their
    /// relative order. With no history the list is returned unchanged.
    pub fn rank(&self, plugin: &str, candidates: &mut Vec<Candidate>) {
        let Some(history) = self.data.get(plugin) else {
            return;
        };
        if history.is_empty() {
            return;
        }
        candidates.sort_by_key(|c| {
            history.iter().position(|id| *id == c.id).unwrap_or(usize::MAX)
        });
    }

    /// Move-to-front insert with bound enforcement; re-selecting an id moves
    /// it to the front rather than duplicating it.
    pub fn mark_used(&mut self, plugin: &str, id: &str) {
        let history = self.data.entry(plugin.to_string()).or_default();
        history.retain(|existing| existing != id);
        history.insert(0, id.to_string());
        history.truncate(self.limit);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<RecencyTracker> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn file(path: &str) -> Candidate {
        Candidate::file(Path::new(path), Path::new("/project"))
    }

    #[test]
    fn test_no_history_leaves_order_unchanged() {
        let tracker = RecencyTracker::new(5);
        let mut candidates = vec![file("/project/b.ts"), file("/project/a.ts")];
        tracker.rank("javascript", &mut candidates);
        assert_eq!(candidates[0].label, "b.ts");
        assert_eq!(candidates[1].label, "a.ts");
    }

    #[test]
    fn test_ranked_before_unranked() {
        let mut tracker = RecencyTracker::new(5);
        tracker.mark_used("javascript", "/project/c.ts");

        let mut candidates = vec![file("/project/a.ts"), file("/project/b.ts"), file("/project/c.ts")];
        tracker.rank("javascript", &mut candidates);
        assert_eq!(candidates[0].label, "c.ts");
        // Unranked keep their relative order
        assert_eq!(candidates[1].label, "a.ts");
        assert_eq!(candidates[2].label, "b.ts");
    }

    #[test]
    fn test_mark_used_moves_to_front_without_duplicating() {
        let mut tracker = RecencyTracker::new(5);
        tracker.mark_used("js", "a");
        tracker.mark_used("js", "b");
        tracker.mark_used("js", "c");
        tracker.mark_used("js", "a");

        let history = tracker.data.get("js").unwrap();
        assert_eq!(history, &vec!["a".to_string(), "c".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_bound_evicts_oldest() {
        let mut tracker = RecencyTracker::new(2);
        tracker.mark_used("js", "a");
        tracker.mark_used("js", "b");
        tracker.mark_used("js", "c");

        let history = tracker.data.get("js").unwrap();
        assert_eq!(history, &vec!["c".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_plugins_are_independent() {
        let mut tracker = RecencyTracker::new(5);
        tracker.mark_used("javascript", "a");
        tracker.mark_used("typescript", "b");
        assert_eq!(tracker.data.get("javascript").unwrap().len(), 1);
        assert_eq!(tracker.data.get("typescript").unwrap().len(), 1);
    }

    #[test]
    fn test_serialization_round_trip_preserves_order() {
        let mut tracker = RecencyTracker::new(5);
        tracker.mark_used("js", "a");
        tracker.mark_used("js", "b");
        tracker.mark_used("js", "c");

        let json = tracker.to_json().unwrap();
        let restored = RecencyTracker::from_json(&json).unwrap();
        assert_eq!(
            restored.data.get("js").unwrap(),
            &vec!["c".to_string(), "b".to_string(), "a".to_string()]
        );
    }
}

use anyhow::Result;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use oxiport_core::{
    CancelFlag, Notifier, PathInfo, PluginOp, SelectionItem, SelectionProvider, TextEdit,
    apply_edits, is_relative_request, is_script_extension, plugin_for, relative_path,
    resolve_relative, scan,
};

use crate::search::FuzzySearch;

/// Host collaborators for one fix run
pub struct FixContext<'a> {
    pub selection: &'a mut dyn SelectionProvider,
    pub notifier: &'a dyn Notifier,
    pub cancel: &'a CancelFlag,
}

/// Result of one fix run over a document. Every variant except `Fixed` and
/// `Partial` leaves the document untouched; none of them is a process error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixReport {
    /// The document's language has no fix-imports capability
    Unsupported,
    /// The document failed to parse
    Unanalyzable,
    NoBrokenImports,
    Fixed { applied: usize },
    /// Some entries stayed broken: no candidate anywhere in the workspace
    /// (`unresolved`), or left unprocessed after cancellation or a dismissed
    /// selection (`skipped`)
    Partial { applied: usize, unresolved: Vec<String>, skipped: usize },
}

/// Repair the document's broken relative imports in place.
///
/// Each relative request that resolves to no file is looked up by base name
/// across the workspace. A unique match is rewritten automatically; multiple
/// matches suspend on a selection; no match leaves the statement untouched
/// and reports it. Dismissing a selection (or cancellation) stops processing
/// further entries while keeping fixes already decided.
pub fn run_fix_imports(
    document: &Path,
    workspace_root: &Path,
    ctx: &mut FixContext,
) -> Result<FixReport> {
    let Some(plugin) = plugin_for(document) else {
        ctx.notifier.warn(&format!("No import support for {}", document.display()));
        return Ok(FixReport::Unsupported);
    };
    if !plugin.supports(PluginOp::FixImports) {
        return Ok(FixReport::Unsupported);
    }

    let text = fs::read_to_string(document)?;
    let Some(doc) = scan(&text, document) else {
        ctx.notifier.error(&format!(
            "Could not parse {}; fix syntax errors and retry",
            document.display()
        ));
        return Ok(FixReport::Unanalyzable);
    };

    let doc_dir = document.parent().unwrap_or(workspace_root);
    let broken: Vec<_> = doc
        .imports
        .iter()
        .filter(|i| is_relative_request(&i.request) && resolve_relative(document, &i.request).is_none())
        .collect();

    if broken.is_empty() {
        return Ok(FixReport::NoBrokenImports);
    }
    debug!("{} broken import(s) in {}", broken.len(), document.display());

    let search = FuzzySearch::new(workspace_root);
    let mut edits: Vec<TextEdit> = Vec::new();
    let mut unresolved: Vec<String> = Vec::new();
    let mut stopped_at: Option<usize> = None;

    for (entry, import) in broken.iter().enumerate() {
        if ctx.cancel.is_cancelled() {
            debug!("Fix run cancelled");
            stopped_at = Some(entry);
            break;
        }

        let needle = PathInfo::new(Path::new(&import.request)).base_name;
        let matches: Vec<PathBuf> =
            search.find(&needle).into_iter().filter(|p| p != document).collect();

        let target = match matches.len() {
            0 => {
                unresolved.push(import.request.clone());
                continue;
            }
            1 => matches[0].clone(),
            _ => {
                let items: Vec<SelectionItem> = matches
                    .iter()
                    .map(|p| SelectionItem::new(relative_path(p, workspace_root), ""))
                    .collect();
                let prompt = format!("Select replacement for '{}'", import.request);
                match ctx.selection.pick(&prompt, &items) {
                    Some(i) => matches[i].clone(),
                    None => {
                        stopped_at = Some(entry);
                        break;
                    }
                }
            }
        };

        let replacement = rewritten_request(&target, doc_dir, &import.request);
        info!("Rewriting '{}' to '{}'", import.request, replacement);
        // Replace only the literal between the quotes, keeping the quote style
        edits.push(TextEdit::replace(
            import.request_span.start + 1,
            import.request_span.end - 1,
            replacement,
        ));
    }

    let applied = edits.len();
    if applied > 0 {
        let new_text = apply_edits(&text, &edits);
        fs::write(document, new_text)?;
    }

    for request in &unresolved {
        ctx.notifier.warn(&format!("No candidate found for '{}'", request));
    }

    let skipped = stopped_at.map(|entry| broken.len() - entry).unwrap_or(0);
    if unresolved.is_empty() && skipped == 0 {
        Ok(FixReport::Fixed { applied })
    } else {
        Ok(FixReport::Partial { applied, unresolved, skipped })
    }
}

/// Relative request pointing at the relocated target, preserving the original
/// request's extension style: explicit extensions stay explicit, bare script
/// requests stay bare.
fn rewritten_request(target: &Path, doc_dir: &Path, original: &str) -> String {
    let mut path = relative_path(target, doc_dir);
    let original_had_ext = Path::new(original).extension().is_some();
    let target_ext = target.extension().and_then(|e| e.to_str()).unwrap_or_default();

    if !original_had_ext
        && is_script_extension(target_ext)
        && path.ends_with(&format!(".{}", target_ext))
    {
        path.truncate(path.len() - target_ext.len() - 1);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    struct Scripted(Vec<Option<usize>>);

    impl SelectionProvider for Scripted {
        fn pick(&mut self, _prompt: &str, _items: &[SelectionItem]) -> Option<usize> {
            self.0.remove(0)
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        warnings: RefCell<Vec<String>>,
        errors: RefCell<Vec<String>>,
    }

    impl Notifier for RecordingNotifier {
        fn info(&self, _message: &str) {}
        fn warn(&self, message: &str) {
            self.warnings.borrow_mut().push(message.to_string());
        }
        fn error(&self, message: &str) {
            self.errors.borrow_mut().push(message.to_string());
        }
    }

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn run(
        doc: &Path,
        root: &Path,
        answers: Vec<Option<usize>>,
    ) -> (FixReport, RecordingNotifier) {
        let mut selection = Scripted(answers);
        let notifier = RecordingNotifier::default();
        let cancel = CancelFlag::new();
        let report = {
            let mut ctx = FixContext {
                selection: &mut selection,
                notifier: &notifier,
                cancel: &cancel,
            };
            run_fix_imports(doc, root, &mut ctx).unwrap()
        };
        (report, notifier)
    }

    #[test]
    fn test_no_broken_imports() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/a.js", "export const a = 1;");
        let doc = create_test_file(root, "src/main.js", "import { a } from './a'\n");

        let (report, _) = run(&doc, root, vec![]);
        assert_eq!(report, FixReport::NoBrokenImports);
    }

    #[test]
    fn test_unique_match_rewritten_automatically() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/lib/helpers.js", "export const h = 1;");
        let doc = create_test_file(root, "src/main.js", "import { h } from './helpers'\n");

        let (report, _) = run(&doc, root, vec![]);
        assert_eq!(report, FixReport::Fixed { applied: 1 });
        assert_eq!(
            fs::read_to_string(&doc).unwrap(),
            "import { h } from './lib/helpers'\n"
        );
    }

    #[test]
    fn test_quote_style_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/lib/helpers.js", "");
        let doc =
            create_test_file(root, "src/main.js", "import { h } from \"./helpers\";\n");

        run(&doc, root, vec![]);
        assert_eq!(
            fs::read_to_string(&doc).unwrap(),
            "import { h } from \"./lib/helpers\";\n"
        );
    }

    #[test]
    fn test_explicit_extension_preserved() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/styles/app.css", "");
        let doc = create_test_file(root, "src/main.js", "import './app.css'\n");

        let (report, _) = run(&doc, root, vec![]);
        assert_eq!(report, FixReport::Fixed { applied: 1 });
        assert_eq!(fs::read_to_string(&doc).unwrap(), "import './styles/app.css'\n");
    }

    #[test]
    fn test_no_match_reports_unresolved() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let doc = create_test_file(root, "src/main.js", "import { g } from './gone'\n");

        let (report, notifier) = run(&doc, root, vec![]);
        assert_eq!(
            report,
            FixReport::Partial {
                applied: 0,
                unresolved: vec!["./gone".to_string()],
                skipped: 0,
            }
        );
        assert_eq!(notifier.warnings.borrow().len(), 1);
        // Statement is left untouched
        assert_eq!(fs::read_to_string(&doc).unwrap(), "import { g } from './gone'\n");
    }

    #[test]
    fn test_multiple_matches_use_selection() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "a/helpers.js", "");
        create_test_file(root, "b/helpers.js", "");
        let doc = create_test_file(root, "src/main.js", "import { h } from './helpers'\n");

        // Matches are sorted, so index 1 is b/helpers.js
        let (report, _) = run(&doc, root, vec![Some(1)]);
        assert_eq!(report, FixReport::Fixed { applied: 1 });
        assert_eq!(
            fs::read_to_string(&doc).unwrap(),
            "import { h } from '../b/helpers'\n"
        );
    }

    #[test]
    fn test_dismissed_selection_keeps_earlier_fixes() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "lib/first.js", "");
        create_test_file(root, "a/second.js", "");
        create_test_file(root, "b/second.js", "");
        let doc = create_test_file(
            root,
            "src/main.js",
            "import { f } from './first'\nimport { s } from './second'\n",
        );

        // The dismissed entry is reported as skipped, not silently dropped
        let (report, _) = run(&doc, root, vec![None]);
        assert_eq!(
            report,
            FixReport::Partial { applied: 1, unresolved: vec![], skipped: 1 }
        );
        assert_eq!(
            fs::read_to_string(&doc).unwrap(),
            "import { f } from '../lib/first'\nimport { s } from './second'\n"
        );
    }

    #[test]
    fn test_cancellation_reports_remaining_as_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "lib/first.js", "");
        let doc = create_test_file(root, "src/main.js", "import { f } from './first'\n");

        let mut selection = Scripted(vec![]);
        let notifier = RecordingNotifier::default();
        let cancel = CancelFlag::new();
        cancel.cancel();
        let mut ctx =
            FixContext { selection: &mut selection, notifier: &notifier, cancel: &cancel };
        let report = run_fix_imports(&doc, root, &mut ctx).unwrap();

        assert_eq!(
            report,
            FixReport::Partial { applied: 0, unresolved: vec![], skipped: 1 }
        );
        assert_eq!(fs::read_to_string(&doc).unwrap(), "import { f } from './first'\n");
    }

    #[test]
    fn test_package_imports_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let doc = create_test_file(root, "src/main.js", "import react from 'react'\n");

        let (report, _) = run(&doc, root, vec![]);
        assert_eq!(report, FixReport::NoBrokenImports);
    }

    #[test]
    fn test_unparsable_document_is_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let doc = create_test_file(root, "src/main.js", "import { from ???");

        let (report, notifier) = run(&doc, root, vec![]);
        assert_eq!(report, FixReport::Unanalyzable);
        assert_eq!(notifier.errors.borrow().len(), 1);
        // Document is left untouched
        assert_eq!(fs::read_to_string(&doc).unwrap(), "import { from ???");
    }

    #[test]
    fn test_unsupported_document_extension() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let doc = create_test_file(root, "notes.md", "# notes\n");

        let (report, notifier) = run(&doc, root, vec![]);
        assert_eq!(report, FixReport::Unsupported);
        assert_eq!(notifier.warnings.borrow().len(), 1);
        assert_eq!(fs::read_to_string(&doc).unwrap(), "# notes\n");
    }
}

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

use oxiport_core::{
    Candidate, LintFixer, Notifier, PluginOp, SelectionItem, SelectionProvider, apply_edits,
    plugin_for,
};

use crate::filter::filter_candidates;
use crate::index::{PackageIndex, WorkspaceIndex};
use crate::options::ImportOptions;
use crate::recency::RecencyTracker;
use crate::sorting::sort_candidates;
use crate::synthesizer::{Synthesis, SynthesisRequest, synthesize};

/// Host collaborators for one operation
pub struct EngineContext<'a> {
    pub selection: &'a mut dyn SelectionProvider,
    pub notifier: &'a dyn Notifier,
    pub lint_fixer: Option<&'a dyn LintFixer>,
}

/// Terminal state of one add-import run. Every outcome except `Applied`
/// leaves the document untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddImportOutcome {
    Applied,
    AlreadyImported,
    Aborted,
    NoCandidates,
    Unsupported,
    Unanalyzable,
}

/// Stateful add-import engine: owns the workspace and package indexes and the
/// recency history, so repeated invocations reuse the built index.
pub struct AddImportEngine {
    index: WorkspaceIndex,
    packages: PackageIndex,
    recency: RecencyTracker,
    options: ImportOptions,
}

impl AddImportEngine {
    pub fn new(workspace_root: impl Into<PathBuf>, options: ImportOptions) -> AddImportEngine {
        let recency = RecencyTracker::new(options.recency_limit);
        AddImportEngine {
            index: WorkspaceIndex::new(workspace_root),
            packages: PackageIndex::new(),
            recency,
            options,
        }
    }

    pub fn index_mut(&mut self) -> &mut WorkspaceIndex {
        &mut self.index
    }

    pub fn recency(&self) -> &RecencyTracker {
        &self.recency
    }

    pub fn set_recency(&mut self, recency: RecencyTracker) {
        self.recency = recency;
    }

    /// Run the full add-import flow for one document: offer the filtered and
    /// sorted candidate list, then synthesize and apply the import the user
    /// picked. `cursor` is the byte offset used to place non-module asset
    /// imports.
    pub fn add_import(
        &mut self,
        document: &Path,
        cursor: Option<u32>,
        ctx: &mut EngineContext,
    ) -> Result<AddImportOutcome> {
        let Some(plugin) = plugin_for(document) else {
            ctx.notifier.warn(&format!(
                "No import support for {}",
                document.display()
            ));
            return Ok(AddImportOutcome::Unsupported);
        };
        if !plugin.supports(PluginOp::AddImport) {
            return Ok(AddImportOutcome::Unsupported);
        }

        let mut candidates = self.gather_candidates(document);
        sort_candidates(&mut candidates, document);
        self.recency.rank(plugin.id, &mut candidates);

        if candidates.is_empty() {
            ctx.notifier.info("No files or packages available to import");
            return Ok(AddImportOutcome::NoCandidates);
        }

        let items: Vec<SelectionItem> = candidates
            .iter()
            .map(|c| SelectionItem::new(c.label.clone(), c.description.clone()))
            .collect();
        let Some(choice) = ctx.selection.pick("Select import", &items) else {
            debug!("Candidate selection dismissed");
            return Ok(AddImportOutcome::Aborted);
        };
        let candidate = &candidates[choice];

        let text = fs::read_to_string(document)
            .with_context(|| format!("Failed to read {}", document.display()))?;

        let request = SynthesisRequest {
            candidate,
            document_path: document,
            document_text: &text,
            cursor,
            options: &self.options,
        };

        match synthesize(&request, ctx.selection) {
            Synthesis::Edits(edits) => {
                let new_text = apply_edits(&text, &edits);
                fs::write(document, new_text)
                    .with_context(|| format!("Failed to write {}", document.display()))?;
                info!("Imported '{}' into {}", candidate.label, document.display());

                self.recency.mark_used(plugin.id, &candidate.id);

                if let Some(fixer) = ctx.lint_fixer
                    && let Err(e) = fixer.fix(document)
                {
                    debug!("Lint fixer failed on {}: {}", document.display(), e);
                }
                Ok(AddImportOutcome::Applied)
            }
            Synthesis::AlreadyImported { span } => {
                ctx.notifier.info(&format!("'{}' is already imported", candidate.label));
                ctx.notifier.focus(span);
                Ok(AddImportOutcome::AlreadyImported)
            }
            Synthesis::Unanalyzable => {
                ctx.notifier.error(&format!(
                    "Could not parse {}; fix syntax errors and retry",
                    document.display()
                ));
                Ok(AddImportOutcome::Unanalyzable)
            }
            Synthesis::Aborted => Ok(AddImportOutcome::Aborted),
        }
    }

    fn gather_candidates(&mut self, document: &Path) -> Vec<Candidate> {
        let root = self.index.root().to_path_buf();
        let mut all: Vec<Candidate> = self.index.candidates().to_vec();
        all.extend_from_slice(self.packages.candidates(document, &root));
        filter_candidates(&all, document, &self.options)
    }
}

use log::{debug, trace};
use std::path::{Path, PathBuf};

use oxiport_core::{
    Candidate, CandidateKind, ExistingImport, ImportStatementKind, INDEX_FILES, SelectionItem,
    SelectionProvider, SourceSpan, TextEdit, exported_variables, exports_through_index,
    has_default_export, is_index_name, is_script_extension, relative_path, resolve_relative, scan,
    PathInfo,
};

use crate::naming::binding_identifier;
use crate::options::{ImportOptions, ImportSyntax};

/// Inputs for one statement synthesis against one document version
pub struct SynthesisRequest<'a> {
    pub candidate: &'a Candidate,
    pub document_path: &'a Path,
    pub document_text: &'a str,
    /// Insertion point for non-module assets
    pub cursor: Option<u32>,
    pub options: &'a ImportOptions,
}

/// Outcome of a synthesis. Every non-`Edits` outcome leaves the document
/// completely unmodified.
#[derive(Debug, PartialEq, Eq)]
pub enum Synthesis {
    Edits(Vec<TextEdit>),
    /// The path is already imported; points at the existing statement
    AlreadyImported { span: SourceSpan },
    /// The document failed to parse
    Unanalyzable,
    /// A selection was dismissed
    Aborted,
}

/// What the new statement binds
#[derive(Debug, Clone, PartialEq, Eq)]
enum BindingForm {
    Default(String),
    Named(String),
    Namespace(String),
    SideEffect,
}

/// Resolved import target: path literal plus naming/export inputs
struct Target {
    path: String,
    raw_name: String,
    file: Option<PathBuf>,
    /// Index file the import goes through, if any
    index: Option<PathBuf>,
    asset: bool,
}

/// Compute the edit that imports the chosen candidate into the document,
/// merging with an existing import of the same path where the grouping
/// option allows it.
pub fn synthesize(req: &SynthesisRequest, selection: &mut dyn SelectionProvider) -> Synthesis {
    let Some(doc) = scan(req.document_text, req.document_path) else {
        return Synthesis::Unanalyzable;
    };

    let target = compute_target(req);
    trace!("Synthesizing import of '{}' into {}", target.path, req.document_path.display());

    let form = match choose_binding_form(req, &target, selection) {
        Some(form) => form,
        None => return Synthesis::Aborted,
    };

    // Duplicate by path wins over everything else
    if let Some(existing) = find_duplicate(&doc.imports, &target, req.document_path) {
        return merge_or_report(req, existing, &form);
    }

    let mut edits: Vec<TextEdit> = Vec::new();

    // A fresh binding may collide with an identifier already bound in the
    // document; the user decides between replacing it and keeping both
    if let Some(name) = form.binding_name()
        && let Some(conflicting) = doc.bindings.iter().find(|b| b.name == name)
    {
        let items = [
            SelectionItem::new("Replace the existing binding", ""),
            SelectionItem::new("Keep both", ""),
        ];
        let prompt = format!("'{}' is already bound in this file", name);
        match selection.pick(&prompt, &items) {
            Some(0) => {
                let mut end = conflicting.span.end;
                // Consume the line break after the deleted declaration
                let bytes = req.document_text.as_bytes();
                while matches!(bytes.get(end as usize), Some(b'\r') | Some(b'\n')) {
                    end += 1;
                }
                edits.push(TextEdit::delete(conflicting.span.start, end));
            }
            Some(_) => {}
            None => return Synthesis::Aborted,
        }
    }

    let line_ending = if req.document_text.contains("\r\n") { "\r\n" } else { "\n" };
    let statement = render_statement(&form, &target.path, req.options, line_ending);

    let at = if target.asset {
        req.cursor.or_else(|| doc.first_import_offset()).unwrap_or(0)
    } else {
        doc.first_import_offset().unwrap_or(0)
    };
    edits.push(TextEdit::insert(at, statement));

    debug!("Synthesized import of '{}' at offset {}", target.path, at);
    Synthesis::Edits(edits)
}

impl BindingForm {
    fn binding_name(&self) -> Option<&str> {
        match self {
            BindingForm::Default(n) | BindingForm::Named(n) | BindingForm::Namespace(n) => {
                Some(n)
            }
            BindingForm::SideEffect => None,
        }
    }
}

fn compute_target(req: &SynthesisRequest) -> Target {
    match &req.candidate.kind {
        CandidateKind::Package(name) => Target {
            path: name.clone(),
            raw_name: name.clone(),
            file: None,
            index: None,
            asset: false,
        },
        CandidateKind::File(path) => compute_file_target(req, path),
    }
}

fn compute_file_target(req: &SynthesisRequest, path: &Path) -> Target {
    let info = PathInfo::new(path);
    let doc_dir = req.document_path.parent().unwrap_or(Path::new("/"));
    let doc_ext =
        req.document_path.extension().and_then(|e| e.to_str()).unwrap_or_default();

    if !is_script_extension(&info.extension) {
        // Non-module asset: bare path form with the extension kept
        return Target {
            path: relative_path(path, doc_dir),
            raw_name: info.base_name,
            file: Some(path.to_path_buf()),
            index: None,
            asset: true,
        };
    }

    // Importing an index file collapses the path to its directory and names
    // the binding after the directory
    if req.options.index_file
        && is_index_name(&info.base_name, &info.extension)
        && let Some(dir) = path.parent()
    {
        let raw_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| info.base_name.clone());
        return Target {
            path: relative_path(dir, doc_dir),
            raw_name,
            file: Some(path.to_path_buf()),
            index: Some(path.to_path_buf()),
            asset: false,
        };
    }

    // A sibling index file that re-exports the target pulls the import
    // through the directory instead
    if req.options.index_file
        && let Some(index) = sibling_index(path)
        && !exports_through_index(&index, path).is_empty()
        && let Some(dir) = path.parent()
    {
        let raw_name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| info.base_name.clone());
        return Target {
            path: relative_path(dir, doc_dir),
            raw_name,
            file: Some(path.to_path_buf()),
            index: Some(index),
            asset: false,
        };
    }

    let mut import_path = relative_path(path, doc_dir);
    if !req.options.file_extension
        && is_script_extension(doc_ext)
        && import_path.ends_with(&format!(".{}", info.extension))
    {
        import_path.truncate(import_path.len() - info.extension.len() - 1);
    }

    Target {
        path: import_path,
        raw_name: info.base_name,
        file: Some(path.to_path_buf()),
        index: None,
        asset: false,
    }
}

fn sibling_index(path: &Path) -> Option<PathBuf> {
    let dir = path.parent()?;
    for name in INDEX_FILES {
        let candidate = dir.join(name);
        if candidate.is_file() && candidate != path {
            return Some(candidate);
        }
    }
    None
}

/// Decide between default, named, namespace, and side-effect binding forms,
/// suspending on the user when the export surface is ambiguous. `None` means
/// the selection was dismissed and the operation aborts.
fn choose_binding_form(
    req: &SynthesisRequest,
    target: &Target,
    selection: &mut dyn SelectionProvider,
) -> Option<BindingForm> {
    if target.asset {
        return Some(BindingForm::SideEffect);
    }

    let name = binding_identifier(&target.raw_name, req.options);

    if req.options.syntax == ImportSyntax::Require {
        return Some(BindingForm::Default(name));
    }

    let Some(file) = &target.file else {
        // Package candidates bind their default export surface
        return Some(BindingForm::Default(name));
    };

    let exports = match (&target.index, target.file.as_deref()) {
        (Some(index), Some(file)) if index != file => exports_through_index(index, file),
        (Some(index), _) => exported_variables(index),
        _ => {
            if has_default_export(file) {
                return Some(BindingForm::Default(name));
            }
            exported_variables(file)
        }
    };

    match exports.len() {
        0 => Some(BindingForm::Namespace(name)),
        1 => Some(BindingForm::Named(exports[0].clone())),
        _ => {
            let mut items =
                vec![SelectionItem::new(format!("* as {}", name), "import everything")];
            items.extend(exports.iter().map(|e| SelectionItem::new(e.clone(), "named export")));
            match selection.pick("Select what to import", &items)? {
                0 => Some(BindingForm::Namespace(name)),
                i => Some(BindingForm::Named(exports[i - 1].clone())),
            }
        }
    }
}

/// An existing import is a duplicate when its request is the same literal or
/// resolves to the same target file
fn find_duplicate<'a>(
    imports: &'a [ExistingImport],
    target: &Target,
    document_path: &Path,
) -> Option<&'a ExistingImport> {
    imports.iter().find(|existing| {
        if existing.request == target.path {
            return true;
        }
        match &target.file {
            Some(file) => resolve_relative(document_path, &existing.request)
                .map(|resolved| resolved == *file)
                .unwrap_or(false),
            None => false,
        }
    })
}

fn merge_or_report(
    req: &SynthesisRequest,
    existing: &ExistingImport,
    form: &BindingForm,
) -> Synthesis {
    let already = Synthesis::AlreadyImported { span: existing.span };

    if existing.kind != ImportStatementKind::ImportDecl
        || req.options.syntax == ImportSyntax::Require
        || !req.options.grouping
    {
        return already;
    }

    let mut default = existing.default_binding.clone();
    let mut namespace = existing.namespace_binding.clone();
    let mut named: Vec<String> = existing.named_bindings.iter().map(|b| b.render()).collect();

    match form {
        BindingForm::Namespace(name) => {
            if namespace.is_some() {
                return already;
            }
            // "Import everything" supersedes the named list
            namespace = Some(name.clone());
            named.clear();
        }
        BindingForm::Named(name) => {
            if namespace.is_some()
                || existing
                    .named_bindings
                    .iter()
                    .any(|b| b.imported == *name || b.local == *name)
            {
                return already;
            }
            named.push(name.clone());
        }
        BindingForm::Default(name) => {
            if default.is_some() || namespace.is_some() {
                return already;
            }
            default = Some(name.clone());
        }
        BindingForm::SideEffect => return already,
    }

    // Rebuild the one statement in place, preserving its quote character,
    // original path literal, and terminator
    let text = req.document_text;
    let inner = &text[(existing.request_span.start + 1) as usize
        ..(existing.request_span.end - 1) as usize];
    let had_semi = text[..existing.span.end as usize].ends_with(';');

    let mut clauses: Vec<String> = Vec::new();
    if let Some(d) = &default {
        clauses.push(d.clone());
    }
    if let Some(ns) = &namespace {
        clauses.push(format!("* as {}", ns));
    }
    if !named.is_empty() {
        clauses.push(format!("{{ {} }}", named.join(", ")));
    }

    let q = existing.quote;
    let statement = format!(
        "import {} from {}{}{}{}",
        clauses.join(", "),
        q,
        inner,
        q,
        if had_semi { ";" } else { "" }
    );

    debug!("Merging into existing import of '{}'", existing.request);
    Synthesis::Edits(vec![TextEdit::replace(existing.span.start, existing.span.end, statement)])
}

fn render_statement(
    form: &BindingForm,
    path: &str,
    opts: &ImportOptions,
    line_ending: &str,
) -> String {
    let q = opts.quote_character;
    let semi = if opts.semi_colons { ";" } else { "" };

    let body = match (opts.syntax, form) {
        (ImportSyntax::Import, BindingForm::Default(name)) => {
            format!("import {} from {}{}{}{}", name, q, path, q, semi)
        }
        (ImportSyntax::Import, BindingForm::Named(name)) => {
            format!("import {{ {} }} from {}{}{}{}", name, q, path, q, semi)
        }
        (ImportSyntax::Import, BindingForm::Namespace(name)) => {
            format!("import * as {} from {}{}{}{}", name, q, path, q, semi)
        }
        (ImportSyntax::Import, BindingForm::SideEffect) => {
            format!("import {}{}{}{}", q, path, q, semi)
        }
        (ImportSyntax::Require, BindingForm::SideEffect) => {
            format!("require({}{}{}){}", q, path, q, semi)
        }
        (ImportSyntax::Require, form) => {
            let name = form.binding_name().unwrap_or_default();
            format!("const {} = require({}{}{}){}", name, q, path, q, semi)
        }
    };

    format!("{}{}", body, line_ending)
}

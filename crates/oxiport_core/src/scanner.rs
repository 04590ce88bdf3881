use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use std::path::Path;

use crate::edit::SourceSpan;

/// One existing import/require statement extracted from a document.
///
/// The oxc arena does not outlive the parse, so the scanner extracts an owned
/// record per statement in a single pass. Everything is tied to one parse of
/// one document version and is never persisted.
#[derive(Debug, Clone)]
pub struct ExistingImport {
    /// The literal module request, with one trailing slash trimmed
    pub request: String,
    pub kind: ImportStatementKind,
    /// Span of the whole statement
    pub span: SourceSpan,
    /// Span of the string literal, quotes included
    pub request_span: SourceSpan,
    /// Quote character of the original literal
    pub quote: char,
    pub default_binding: Option<String>,
    pub namespace_binding: Option<String>,
    pub named_bindings: Vec<NamedBinding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStatementKind {
    /// `import ... from 'x'` / `import 'x'`
    ImportDecl,
    /// `const x = require('x')`
    RequireVar,
    /// bare `require('x')` expression statement
    RequireBare,
}

/// One named specifier, `{ imported as local }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBinding {
    pub imported: String,
    pub local: String,
}

impl NamedBinding {
    pub fn render(&self) -> String {
        if self.imported == self.local {
            self.imported.clone()
        } else {
            format!("{} as {}", self.imported, self.local)
        }
    }
}

/// A top-level bound identifier with its declaration span, used for naming
/// conflict checks before inserting a new binding.
#[derive(Debug, Clone)]
pub struct DeclaredBinding {
    pub name: String,
    pub span: SourceSpan,
}

/// Everything the synthesizer needs to know about the current document
#[derive(Debug, Clone, Default)]
pub struct ScannedDocument {
    pub imports: Vec<ExistingImport>,
    pub bindings: Vec<DeclaredBinding>,
}

impl ScannedDocument {
    /// Byte offset of the first existing import, if any
    pub fn first_import_offset(&self) -> Option<u32> {
        self.imports.iter().map(|i| i.span.start).min()
    }
}

/// Parse a document and extract its import statements and top-level bindings.
///
/// The grammar is a permissive superset (JSX, decorators, TS annotations). A
/// hard parse failure yields `None`; the caller treats the document as
/// unanalyzable and skips the operation rather than erroring.
pub fn scan(src: &str, path: &Path) -> Option<ScannedDocument> {
    trace!("Scanning document: {}", path.display());
    let st = source_type_for(path);
    let allocator = Allocator::default();
    let ret: ParserReturn = OxcParser::new(&allocator, src, st).parse();
    if ret.panicked {
        debug!("Parse failed for {}; treating as unanalyzable", path.display());
        return None;
    }

    let mut doc = ScannedDocument::default();

    for stmt in &ret.program.body {
        match stmt {
            Statement::ImportDeclaration(decl) => {
                extract_import_declaration(src, decl, &mut doc);
            }
            Statement::VariableDeclaration(vd) => {
                extract_variable_declaration(src, vd, &mut doc);
            }
            Statement::ExpressionStatement(es) => {
                if let Expression::CallExpression(ce) = &es.expression
                    && let Some((request, request_span, quote)) = require_argument(src, ce)
                {
                    trace!("Found bare require: '{}'", request);
                    doc.imports.push(ExistingImport {
                        request,
                        kind: ImportStatementKind::RequireBare,
                        span: SourceSpan::new(src, es.span.start, es.span.end),
                        request_span,
                        quote,
                        default_binding: None,
                        namespace_binding: None,
                        named_bindings: Vec::new(),
                    });
                }
            }
            Statement::FunctionDeclaration(f) => {
                if let Some(id) = &f.id {
                    doc.bindings.push(DeclaredBinding {
                        name: id.name.to_string(),
                        span: SourceSpan::new(src, f.span.start, f.span.end),
                    });
                }
            }
            Statement::ClassDeclaration(c) => {
                if let Some(id) = &c.id {
                    doc.bindings.push(DeclaredBinding {
                        name: id.name.to_string(),
                        span: SourceSpan::new(src, c.span.start, c.span.end),
                    });
                }
            }
            _ => {}
        }
    }

    debug!(
        "Scanned {}: {} imports, {} bindings",
        path.display(),
        doc.imports.len(),
        doc.bindings.len()
    );
    Some(doc)
}

fn extract_import_declaration(src: &str, decl: &ImportDeclaration, doc: &mut ScannedDocument) {
    let (request, request_span, quote) = literal_parts(src, &decl.source);
    trace!("Found static import: '{}'", request);

    let mut default_binding = None;
    let mut namespace_binding = None;
    let mut named_bindings = Vec::new();

    if let Some(specifiers) = &decl.specifiers {
        for spec in specifiers {
            match spec {
                ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => {
                    default_binding = Some(s.local.name.to_string());
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => {
                    namespace_binding = Some(s.local.name.to_string());
                }
                ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    named_bindings.push(NamedBinding {
                        imported: module_export_name(&s.imported),
                        local: s.local.name.to_string(),
                    });
                }
            }
        }
    }

    // Import bindings participate in the document's bound-identifier set
    let stmt_span = SourceSpan::new(src, decl.span.start, decl.span.end);
    for name in default_binding
        .iter()
        .chain(namespace_binding.iter())
        .cloned()
        .chain(named_bindings.iter().map(|b| b.local.clone()))
    {
        doc.bindings.push(DeclaredBinding { name, span: stmt_span });
    }

    doc.imports.push(ExistingImport {
        request,
        kind: ImportStatementKind::ImportDecl,
        span: stmt_span,
        request_span,
        quote,
        default_binding,
        namespace_binding,
        named_bindings,
    });
}

fn extract_variable_declaration(src: &str, vd: &VariableDeclaration, doc: &mut ScannedDocument) {
    for decl in &vd.declarations {
        let name = match &decl.id.kind {
            BindingPatternKind::BindingIdentifier(id) => Some(id.name.to_string()),
            _ => None,
        };

        if let Some(name) = &name {
            doc.bindings.push(DeclaredBinding {
                name: name.clone(),
                span: SourceSpan::new(src, vd.span.start, vd.span.end),
            });
        }

        // Only a declarator initialized *directly* by require('lit') counts
        // as an import statement
        if let Some(Expression::CallExpression(ce)) = &decl.init
            && let Some((request, request_span, quote)) = require_argument(src, ce)
        {
            trace!("Found require variable: '{}'", request);
            doc.imports.push(ExistingImport {
                request,
                kind: ImportStatementKind::RequireVar,
                span: SourceSpan::new(src, vd.span.start, vd.span.end),
                request_span,
                quote,
                default_binding: name,
                namespace_binding: None,
                named_bindings: Vec::new(),
            });
        }
    }
}

/// Match `require('lit')` with a single string-literal argument
fn require_argument(src: &str, ce: &CallExpression) -> Option<(String, SourceSpan, char)> {
    if let Expression::Identifier(callee) = &ce.callee
        && callee.name.as_str() == "require"
        && ce.arguments.len() == 1
        && let Some(Expression::StringLiteral(sl)) = ce.arguments[0].as_expression()
    {
        let (request, span, quote) = literal_parts(src, sl);
        return Some((request, span, quote));
    }
    None
}

fn literal_parts(src: &str, sl: &StringLiteral) -> (String, SourceSpan, char) {
    let raw = sl.value.to_string();
    let request = raw.strip_suffix('/').map(|s| s.to_string()).unwrap_or(raw);
    let span = SourceSpan::new(src, sl.span.start, sl.span.end);
    let quote = src.as_bytes().get(sl.span.start as usize).map(|b| *b as char).unwrap_or('\'');
    (request, span, quote)
}

pub(crate) fn module_export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::IdentifierName(i) => i.name.to_string(),
        ModuleExportName::IdentifierReference(i) => i.name.to_string(),
        ModuleExportName::StringLiteral(s) => s.value.to_string(),
    }
}

pub fn source_type_for(path: &Path) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str());

    let mut st = SourceType::default()
        .with_jsx(matches!(ext, Some("tsx") | Some("jsx")))
        .with_typescript(matches!(ext, Some("ts") | Some("tsx") | Some("mts") | Some("cts")));

    // ESM heuristic - .mjs, .mts are ES modules
    if matches!(ext, Some("mjs") | Some("mts")) {
        st = st.with_module(true);
    }

    st
}

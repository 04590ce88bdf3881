use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_parser::{Parser as OxcParser, ParserReturn};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::resolve::{is_relative_request, resolve_relative};
use crate::scanner::{module_export_name, source_type_for};

/// The statically visible export surface of one module, before following
/// star re-exports.
#[derive(Debug, Clone, Default)]
struct ModuleSurface {
    /// Names declared or re-exported by this file itself
    own: Vec<String>,
    /// (exported name, source request) for specifiers re-exported from
    /// another module
    named_reexports: Vec<(String, String)>,
    /// Sources of `export * from '...'` declarations
    star_sources: Vec<String>,
    /// Explicit default export or a `module.exports = ...` assignment
    has_default: bool,
}

/// Externally visible binding names exported by `file`, following star
/// re-export chains with cycle protection. Parse errors and missing files
/// yield an empty result, never an error.
pub fn exported_variables(file: &Path) -> Vec<String> {
    let mut visited = HashSet::new();
    let mut memo = HashMap::new();
    collect_exports(file, &mut visited, &mut memo)
}

/// True when `file` has a default-style export: an explicit default-export
/// declaration or a module-export-object assignment.
pub fn has_default_export(file: &Path) -> bool {
    surface_of(file).map(|s| s.has_default).unwrap_or(false)
}

/// Exports of `index_file` restricted to the subset whose re-export source
/// resolves back to `sibling`. Used when a file is imported through its
/// directory's index file.
pub fn exports_through_index(index_file: &Path, sibling: &Path) -> Vec<String> {
    let Some(surface) = surface_of(index_file) else {
        return Vec::new();
    };

    let mut names = Vec::new();

    for (exported, source) in &surface.named_reexports {
        if let Some(target) = resolve_relative(index_file, source)
            && paths_equal(&target, sibling)
        {
            names.push(exported.clone());
        }
    }

    for source in &surface.star_sources {
        if is_relative_request(source)
            && let Some(target) = resolve_relative(index_file, source)
            && paths_equal(&target, sibling)
        {
            names.extend(exported_variables(sibling));
        }
    }

    dedupe(&mut names);
    debug!(
        "{} re-exports {} names of {}",
        index_file.display(),
        names.len(),
        sibling.display()
    );
    names
}

fn collect_exports(
    file: &Path,
    visited: &mut HashSet<PathBuf>,
    memo: &mut HashMap<PathBuf, Vec<String>>,
) -> Vec<String> {
    if let Some(names) = memo.get(file) {
        trace!("Memo hit for exports: {}", file.display());
        return names.clone();
    }
    if !visited.insert(file.to_path_buf()) {
        trace!("Export cycle detected at: {}", file.display());
        return Vec::new();
    }

    let Some(surface) = surface_of(file) else {
        return Vec::new();
    };

    let mut names = surface.own;
    names.extend(surface.named_reexports.into_iter().map(|(exported, _)| exported));

    for source in surface.star_sources {
        // A star re-export sourced from a package is unsupported; skip it
        if !is_relative_request(&source) {
            trace!("Skipping package star re-export '{}' in {}", source, file.display());
            continue;
        }
        if let Some(target) = resolve_relative(file, &source) {
            names.extend(collect_exports(&target, visited, memo));
        }
    }

    dedupe(&mut names);
    debug!("{} exports {} names", file.display(), names.len());
    memo.insert(file.to_path_buf(), names.clone());
    names
}

fn surface_of(file: &Path) -> Option<ModuleSurface> {
    let src = fs::read_to_string(file).ok()?;

    let st = source_type_for(file);
    let allocator = Allocator::default();
    let ret: ParserReturn = OxcParser::new(&allocator, &src, st).parse();
    if ret.panicked {
        debug!("Parse failed for {}; no exports", file.display());
        return None;
    }

    let mut surface = ModuleSurface::default();

    for stmt in &ret.program.body {
        match stmt {
            Statement::ExportNamedDeclaration(en) => {
                if en.export_kind.is_type() {
                    continue;
                }
                if let Some(decl) = &en.declaration {
                    collect_declaration_names(decl, &mut surface.own);
                }
                for spec in &en.specifiers {
                    if spec.export_kind.is_type() {
                        continue;
                    }
                    let exported = module_export_name(&spec.exported);
                    match &en.source {
                        Some(source) => {
                            surface.named_reexports.push((exported, source.value.to_string()));
                        }
                        None => surface.own.push(exported),
                    }
                }
            }
            Statement::ExportAllDeclaration(ea) => {
                if ea.export_kind.is_type() {
                    continue;
                }
                match &ea.exported {
                    // export * as ns from '...' exposes one binding
                    Some(ns) => surface.own.push(module_export_name(ns)),
                    None => surface.star_sources.push(ea.source.value.to_string()),
                }
            }
            Statement::ExportDefaultDeclaration(_) => {
                surface.has_default = true;
            }
            Statement::ExpressionStatement(es) => {
                if let Expression::AssignmentExpression(ae) = &es.expression {
                    collect_commonjs_exports(ae, &mut surface);
                }
            }
            _ => {}
        }
    }

    Some(surface)
}

fn collect_declaration_names(decl: &Declaration, names: &mut Vec<String>) {
    match decl {
        Declaration::FunctionDeclaration(f) => {
            if let Some(id) = &f.id {
                names.push(id.name.to_string());
            }
        }
        Declaration::ClassDeclaration(c) => {
            if let Some(id) = &c.id {
                names.push(id.name.to_string());
            }
        }
        Declaration::VariableDeclaration(vd) => {
            for declarator in &vd.declarations {
                if let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind {
                    names.push(id.name.to_string());
                }
            }
        }
        _ => {}
    }
}

/// Recognize `module.exports = {...}`, `module.exports.x = ...` and
/// `exports.x = ...` assignment shapes.
fn collect_commonjs_exports(ae: &AssignmentExpression, surface: &mut ModuleSurface) {
    let AssignmentTarget::StaticMemberExpression(member) = &ae.left else {
        return;
    };

    match &member.object {
        Expression::Identifier(obj) if obj.name.as_str() == "module" => {
            if member.property.name.as_str() != "exports" {
                return;
            }
            // module.exports = ... acts as the default export surface; an
            // object literal also contributes its property names
            surface.has_default = true;
            if let Expression::ObjectExpression(oe) = &ae.right {
                for prop in &oe.properties {
                    if let ObjectPropertyKind::ObjectProperty(p) = prop {
                        match &p.key {
                            PropertyKey::StaticIdentifier(id) => {
                                surface.own.push(id.name.to_string());
                            }
                            PropertyKey::StringLiteral(sl) => {
                                surface.own.push(sl.value.to_string());
                            }
                            _ => {}
                        }
                    }
                }
            }
        }
        Expression::Identifier(obj) if obj.name.as_str() == "exports" => {
            surface.own.push(member.property.name.to_string());
        }
        Expression::StaticMemberExpression(inner) => {
            if let Expression::Identifier(obj) = &inner.object
                && obj.name.as_str() == "module"
                && inner.property.name.as_str() == "exports"
            {
                surface.own.push(member.property.name.to_string());
            }
        }
        _ => {}
    }
}

fn paths_equal(a: &Path, b: &Path) -> bool {
    let ca = a.canonicalize().unwrap_or_else(|_| a.to_path_buf());
    let cb = b.canonicalize().unwrap_or_else(|_| b.to_path_buf());
    ca == cb
}

fn dedupe(names: &mut Vec<String>) {
    let mut seen = HashSet::new();
    names.retain(|n| seen.insert(n.clone()));
}

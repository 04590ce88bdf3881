use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;

use crate::fixer::FixReport;

/// Print a one-document fix summary
pub fn print_fix_report<W: Write>(
    out: &mut W,
    document: &Path,
    report: &FixReport,
) -> io::Result<()> {
    match report {
        FixReport::Unsupported => {
            writeln!(out, "{} {}: not a supported document", "⚠".yellow(), document.display())
        }
        FixReport::Unanalyzable => {
            writeln!(out, "{} {}: could not parse", "✗".red(), document.display())
        }
        FixReport::NoBrokenImports => {
            writeln!(out, "{} {}: no broken imports", "✓".green(), document.display())
        }
        FixReport::Fixed { applied } => {
            writeln!(
                out,
                "{} {}: fixed {} import{}",
                "✓".green(),
                document.display(),
                applied,
                if *applied == 1 { "" } else { "s" }
            )
        }
        FixReport::Partial { applied, unresolved, skipped } => {
            writeln!(
                out,
                "{} {}: fixed {}, {} unresolved, {} skipped",
                "⚠".yellow(),
                document.display(),
                applied,
                unresolved.len(),
                skipped
            )?;
            for request in unresolved {
                writeln!(out, "    {}", request.yellow())?;
            }
            Ok(())
        }
    }
}

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use std::io::{BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use oxiport_add::{AddImportEngine, AddImportOutcome, EngineContext, ImportOptions};
use oxiport_core::{
    CancelFlag, Notifier, SelectionItem, SelectionProvider, SourceSpan, find_workspace_root,
};
use oxiport_fix::{FixContext, FixReport, print_fix_report, run_fix_imports};

#[derive(Parser)]
#[command(name = "oxiport")]
#[command(about = "Import management tools for JavaScript/TypeScript projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add an import to a document, picking from workspace files and packages
    Add(AddArgs),
    /// Repair broken relative imports in a document
    Fix(FixArgs),
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Document to add the import to
    document: PathBuf,

    /// Workspace root (defaults to the enclosing git repository)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Path to a JSON options file
    #[arg(long)]
    options: Option<PathBuf>,

    /// Byte offset used to place non-module asset imports
    #[arg(long)]
    cursor: Option<u32>,

    /// Answer every prompt with its first item
    #[arg(short, long)]
    yes: bool,
}

#[derive(Debug, Args)]
struct FixArgs {
    /// Document to repair
    document: PathBuf,

    /// Workspace root (defaults to the enclosing git repository)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Answer every prompt with its first item
    #[arg(short, long)]
    yes: bool,
}

/// Terminal selection prompt: numbered list on stderr, 1-based answer on
/// stdin. An empty or invalid answer dismisses the prompt.
struct StdinSelection {
    auto_first: bool,
}

impl SelectionProvider for StdinSelection {
    fn pick(&mut self, prompt: &str, items: &[SelectionItem]) -> Option<usize> {
        if self.auto_first {
            debug!("Auto-answering '{}' with the first item", prompt);
            return if items.is_empty() { None } else { Some(0) };
        }

        eprintln!("{}", prompt.bold());
        for (i, item) in items.iter().enumerate() {
            if item.description.is_empty() {
                eprintln!("  {} {}", format!("{}.", i + 1).cyan(), item.label);
            } else {
                eprintln!(
                    "  {} {} {}",
                    format!("{}.", i + 1).cyan(),
                    item.label,
                    item.description.dimmed()
                );
            }
        }
        eprint!("> ");

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).ok()?;
        let n: usize = line.trim().parse().ok()?;
        if n >= 1 && n <= items.len() { Some(n - 1) } else { None }
    }
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        eprintln!("{} {}", "●".bright_blue(), message);
    }

    fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    fn focus(&self, span: SourceSpan) {
        eprintln!("  at line {}, column {}", span.line + 1, span.column + 1);
    }
}

/// Build the file index up front, announcing it only when the build outlives
/// a short debounce so quick builds stay silent.
fn build_index_with_progress(engine: &mut AddImportEngine) {
    let done = CancelFlag::new();
    let progress = {
        let done = done.clone();
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(200));
            if !done.is_cancelled() {
                eprintln!("{} Indexing workspace files...", "●".bright_blue());
            }
        })
    };

    engine.index_mut().candidates();

    done.cancel();
    let _ = progress.join();
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Add(args) => {
            let root = match args.root {
                Some(root) => root,
                None => find_workspace_root()?,
            };
            let options = match &args.options {
                Some(path) => ImportOptions::load(path)?,
                None => ImportOptions::default(),
            };
            let document = args.document.canonicalize()?;
            info!("Adding import to {} (root {})", document.display(), root.display());

            let mut engine = AddImportEngine::new(&root, options);
            build_index_with_progress(&mut engine);
            let mut selection = StdinSelection { auto_first: args.yes };
            let notifier = ConsoleNotifier;
            let mut ctx = EngineContext {
                selection: &mut selection,
                notifier: &notifier,
                lint_fixer: None,
            };

            let outcome = engine.add_import(&document, args.cursor, &mut ctx)?;
            debug!("Add import outcome: {:?}", outcome);

            let elapsed_ms = start.elapsed().as_millis();
            match outcome {
                AddImportOutcome::Applied => {
                    writeln!(
                        stdout,
                        "{} Import added. Finished in {}ms.",
                        "●".bright_blue(),
                        elapsed_ms.to_string().cyan()
                    )?;
                }
                AddImportOutcome::Aborted => {
                    writeln!(stdout, "{} Aborted.", "●".bright_blue())?;
                }
                _ => {}
            }
            stdout.flush()?;
            Ok(())
        }
        Commands::Fix(args) => {
            let root = match args.root {
                Some(root) => root,
                None => find_workspace_root()?,
            };
            let document = args.document.canonicalize()?;
            info!("Fixing imports in {} (root {})", document.display(), root.display());

            let mut selection = StdinSelection { auto_first: args.yes };
            let notifier = ConsoleNotifier;
            let cancel = CancelFlag::new();
            let mut ctx = FixContext {
                selection: &mut selection,
                notifier: &notifier,
                cancel: &cancel,
            };

            let report = run_fix_imports(&document, &root, &mut ctx)?;
            print_fix_report(&mut stdout, &document, &report)?;

            let elapsed_ms = start.elapsed().as_millis();
            writeln!(
                stdout,
                "\n{} Finished in {}ms.",
                "●".bright_blue(),
                elapsed_ms.to_string().cyan()
            )?;
            stdout.flush()?;

            // Non-zero exit to fail CI when imports stay broken
            if matches!(report, FixReport::Partial { .. } | FixReport::Unanalyzable) {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

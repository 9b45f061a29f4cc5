//! Patch diagnostics command.

use std::path::PathBuf;

use clap::Args;
use pdview_config::ViewerConfig;
use pdview_core::SubpatchOutcome;

use super::common::parse_document;

/// Report what the parser skipped.
#[derive(Args)]
pub struct CheckArgs {
    /// Path to the `.pd` file
    pub file: PathBuf,
}

/// Run the check command.
///
/// Fails only when the top-level file cannot be opened; skipped lines and
/// unresolved subpatches are reported but are not errors.
pub fn run(args: CheckArgs, config: &ViewerConfig) -> anyhow::Result<()> {
    let doc = parse_document(&args.file, config);
    if !doc.opened() {
        anyhow::bail!("cannot open {}", args.file.display());
    }

    for diag in doc.diagnostics() {
        let document = diag.document.as_deref().unwrap_or(args.file.as_path());
        println!("{}:{}: {}", document.display(), diag.line, diag.error);
    }

    for report in doc.subpatches() {
        let indent = "  ".repeat(report.depth.saturating_sub(1));
        match (&report.resolved, report.outcome) {
            (Some(path), SubpatchOutcome::Loaded) => println!(
                "{indent}subpatch '{}': {} widgets from {}",
                report.name,
                report.widgets,
                path.display()
            ),
            (_, outcome) => println!("{indent}subpatch '{}': {}", report.name, outcome.name()),
        }
    }

    let stats = doc.stats();
    let kinds: Vec<String> = stats
        .by_kind
        .iter()
        .map(|(kind, count)| format!("{count} {kind}"))
        .collect();
    println!();
    println!(
        "{} widgets ({}), {} skipped lines, {} unresolved subpatches",
        doc.len(),
        if kinds.is_empty() { "none".to_string() } else { kinds.join(", ") },
        stats.skipped_lines,
        stats.unresolved_subpatches
    );
    Ok(())
}

use crate::output::print_json;
use anyhow::Context;
use clap::Args;
use devhooks_core::paths;
use devhooks_core::session::{self, SessionInput, SessionOptions, SessionReport};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct SessionEndArgs {
    /// File edited during the session (repeatable)
    #[arg(long = "file", short = 'f', value_name = "PATH")]
    files: Vec<PathBuf>,

    /// Closing narrative of the session
    #[arg(long, conflicts_with = "narrative_file")]
    narrative: Option<String>,

    /// Read the closing narrative from a file
    #[arg(long, value_name = "PATH")]
    narrative_file: Option<PathBuf>,

    /// Read `{"editedFiles": [...], "conversationText": "..."}` from stdin
    #[arg(long, conflicts_with_all = ["files", "narrative", "narrative_file"])]
    stdin: bool,

    /// Report what would change without writing
    #[arg(long)]
    dry_run: bool,
}

/// Session-end hook. Failures are reported on stderr but never fail the
/// process; a broken docs update must not break the session.
pub fn run(root: &Path, args: SessionEndArgs, json: bool) -> anyhow::Result<()> {
    let options = SessionOptions {
        dry_run: args.dry_run,
    };
    let outcome = read_input(args)
        .and_then(|input| {
            session::on_session_end(root, &input, chrono::Utc::now(), options)
                .context("session-end update failed")
        });

    match outcome {
        Ok(report) if json => print_json(&report)?,
        Ok(report) => print_summary(&report),
        Err(e) => eprintln!("warning: {e:#}"),
    }
    Ok(())
}

fn read_input(args: SessionEndArgs) -> anyhow::Result<SessionInput> {
    if args.stdin {
        let input: SessionInput = serde_json::from_reader(std::io::stdin().lock())
            .context("failed to parse session input from stdin")?;
        return Ok(input);
    }

    let conversation_text = match (args.narrative, args.narrative_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read narrative from {}", path.display()))?,
        (None, None) => String::new(),
    };
    Ok(SessionInput {
        edited_files: args.files,
        conversation_text,
    })
}

fn print_summary(report: &SessionReport) {
    let Some(folder) = &report.task_folder else {
        return;
    };
    if !report.has_captures() {
        return;
    }

    let heading = if report.dry_run {
        "Dev docs auto-update (dry run)"
    } else {
        "Dev docs auto-update"
    };
    println!("{heading}");
    println!("   Objects captured: {}", report.identifiers.len());
    println!("   Completions found: {}", report.completions.len());
    if let Some(toggled) = report.tasks_toggled {
        println!("   Tasks closed: {toggled}");
    }
    if let Some(added) = &report.context_added {
        println!("   Context entries added: {}", added.len());
    }
    println!("   Location: {}/", paths::base_name(folder));
}

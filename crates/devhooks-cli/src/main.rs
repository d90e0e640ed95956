mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{rules::RulesSubcommand, session::SessionEndArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "devhooks",
    about = "Session hooks for AL development: skill activation on prompt submit, dev-docs upkeep on session end",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .claude/ or .git/)
    #[arg(long, global = true, env = "DEVHOOKS_ROOT")]
    root: Option<PathBuf>,

    /// Skill rules file (default: <root>/.claude/hooks/config/skill-rules.json)
    #[arg(long, global = true, env = "DEVHOOKS_RULES")]
    rules: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt-submit hook: read the prompt on stdin, write it back with skill directives
    Prompt,

    /// Session-end hook: close finished tasks and capture new objects in the active task's docs
    SessionEnd(SessionEndArgs),

    /// Inspect and validate skill rules
    Rules {
        #[command(subcommand)]
        subcommand: RulesSubcommand,
    },

    /// Show the active task folder
    ActiveTask,
}

fn main() {
    let cli = Cli::parse();

    // stdout carries the hook payload; diagnostics go to stderr only.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let rules_path = cli
        .rules
        .unwrap_or_else(|| devhooks_core::paths::rules_path(&root));

    let result = match cli.command {
        Commands::Prompt => cmd::prompt::run(&rules_path),
        Commands::SessionEnd(args) => cmd::session::run(&root, args, cli.json),
        Commands::Rules { subcommand } => cmd::rules::run(&rules_path, subcommand, cli.json),
        Commands::ActiveTask => cmd::active::run(&root, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

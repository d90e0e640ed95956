use devhooks_core::{prompt, rules::RuleSet};
use std::io::{Read, Write};
use std::path::Path;

/// Prompt-submit hook. Always succeeds: whatever goes wrong, the caller gets
/// its prompt back.
pub fn run(rules_path: &Path) -> anyhow::Result<()> {
    let mut input = Vec::new();
    if let Err(e) = std::io::stdin().read_to_end(&mut input) {
        tracing::error!("failed to read prompt from stdin: {e}");
    }

    let rules = RuleSet::load_or_disabled(rules_path);
    let output = prompt::process_or_passthrough(&input, &rules);

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = stdout.write_all(&output).and_then(|_| stdout.flush()) {
        tracing::error!("failed to write prompt to stdout: {e}");
    }
    Ok(())
}

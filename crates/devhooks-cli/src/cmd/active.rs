use crate::output::print_json;
use anyhow::Context;
use devhooks_core::session;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let folder = session::find_active_task_folder(root)
        .context("failed to scan active task folders")?;

    if json {
        print_json(&serde_json::json!({ "task_folder": folder }))?;
    } else {
        match folder {
            Some(path) => println!("{}", path.display()),
            None => println!("No active task."),
        }
    }
    Ok(())
}

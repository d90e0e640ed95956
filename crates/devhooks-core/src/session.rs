use crate::completions::extract_completions;
use crate::context;
use crate::error::Result;
use crate::identifiers::{extract_identifiers, IdentifierDescriptor};
use crate::io;
use crate::paths;
use crate::tasks;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

// ---------------------------------------------------------------------------
// Input / options / report
// ---------------------------------------------------------------------------

/// Session-end payload: files touched during the session and the assistant's
/// closing narrative.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    #[serde(default)]
    pub edited_files: Vec<PathBuf>,
    #[serde(default)]
    pub conversation_text: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Compute the report without touching either document.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionReport {
    pub task_folder: Option<PathBuf>,
    pub identifiers: Vec<String>,
    pub completions: Vec<String>,
    /// Lines closed in `tasks.md`; `None` when it was not consulted or is absent.
    pub tasks_toggled: Option<usize>,
    /// Identifiers appended to `context.md`; `None` when it was not consulted or is absent.
    pub context_added: Option<Vec<String>>,
    pub dry_run: bool,
}

impl SessionReport {
    pub fn has_captures(&self) -> bool {
        !self.identifiers.is_empty() || !self.completions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Active task folder
// ---------------------------------------------------------------------------

/// Most recently modified directory under `.claude/active-tasks/`.
pub fn find_active_task_folder(root: &Path) -> Result<Option<PathBuf>> {
    let dir = paths::active_tasks_dir(root);
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut newest: Option<(SystemTime, PathBuf)> = None;
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_dir() {
            continue;
        }
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        if newest.as_ref().map_or(true, |(best, _)| modified > *best) {
            newest = Some((modified, entry.path()));
        }
    }
    Ok(newest.map(|(_, path)| path))
}

// ---------------------------------------------------------------------------
// Session end
// ---------------------------------------------------------------------------

/// Identifiers declared in the AL files among `touched`, in file order.
///
/// Relative paths resolve against `root`. Bytes that are not UTF-8 (AL files
/// saved as Windows-1252) are decoded lossily; only files that cannot be read
/// at all are skipped.
pub fn scan_touched_files(root: &Path, touched: &[PathBuf]) -> Vec<IdentifierDescriptor> {
    let mut found = Vec::new();
    for file in touched.iter().filter(|f| paths::is_al_source(f)) {
        let path = if file.is_absolute() {
            file.clone()
        } else {
            root.join(file)
        };
        match io::read_lossy_if_exists(&path) {
            Ok(Some(source)) => found.extend(extract_identifiers(&source)),
            Ok(None) => tracing::debug!(path = %path.display(), "touched file no longer exists"),
            Err(e) => tracing::debug!(path = %path.display(), "skipping unreadable file: {e}"),
        }
    }
    found
}

/// Merge what the session produced into the active task's documents.
///
/// No active task folder is a silent no-op.
pub fn on_session_end(
    root: &Path,
    input: &SessionInput,
    now: DateTime<Utc>,
    options: SessionOptions,
) -> Result<SessionReport> {
    let mut report = SessionReport {
        dry_run: options.dry_run,
        ..SessionReport::default()
    };

    let Some(folder) = find_active_task_folder(root)? else {
        tracing::debug!(root = %root.display(), "no active task folder");
        return Ok(report);
    };

    let identifiers = scan_touched_files(root, &input.edited_files);
    let completions = extract_completions(&input.conversation_text);
    report.identifiers = identifiers.iter().map(ToString::to_string).collect();
    report.completions = completions.clone();

    // Each document is updated on its own; a failure on one leaves the other alone.
    if !completions.is_empty() {
        let path = paths::tasks_md(&folder);
        match tasks::update_tasks_file(&path, &completions, now, options.dry_run) {
            Ok(toggle) => report.tasks_toggled = toggle.map(|t| t.toggled),
            Err(e) => tracing::warn!(path = %path.display(), "skipping tasks document: {e}"),
        }
    }

    if !identifiers.is_empty() || !input.edited_files.is_empty() {
        let path = paths::context_md(&folder);
        match context::update_context_file(
            &path,
            &identifiers,
            &input.edited_files,
            now,
            options.dry_run,
        ) {
            Ok(appended) => report.context_added = appended.map(|a| a.added),
            Err(e) => tracing::warn!(path = %path.display(), "skipping context document: {e}"),
        }
    }

    tracing::info!(
        folder = %paths::base_name(&folder),
        identifiers = report.identifiers.len(),
        completions = report.completions.len(),
        "session end processed"
    );
    report.task_folder = Some(folder);
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

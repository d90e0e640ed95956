//! Append-only capture of new object identifiers into `context.md`.

use crate::error::Result;
use crate::identifiers::IdentifierDescriptor;
use crate::io;
use crate::paths;
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextAppend {
    /// Text appended to the document; empty when unchanged.
    pub section: String,
    pub changed: bool,
    /// Rendered identifiers that were new to the document.
    pub added: Vec<String>,
}

impl ContextAppend {
    fn unchanged() -> Self {
        Self {
            section: String::new(),
            changed: false,
            added: Vec::new(),
        }
    }

    /// Full document after the append.
    pub fn apply(&self, doc: &str) -> String {
        format!("{doc}{}", self.section)
    }
}

/// Build the section for identifiers not yet present anywhere in `doc`.
pub fn append_context(
    doc: &str,
    identifiers: &[IdentifierDescriptor],
    touched_files: &[PathBuf],
    now: DateTime<Utc>,
) -> ContextAppend {
    let mut added: Vec<String> = Vec::new();
    for rendered in identifiers.iter().map(ToString::to_string) {
        if !doc.contains(&rendered) && !added.contains(&rendered) {
            added.push(rendered);
        }
    }
    if added.is_empty() {
        return ContextAppend::unchanged();
    }

    let mut section = format!(
        "\n\n## Auto-Captured Context ({})\n\n**Object IDs:**\n",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    );
    let ids: Vec<String> = added.iter().map(|id| format!("- {id}")).collect();
    section.push_str(&ids.join("\n"));
    section.push_str("\n\n**Files Modified:**\n");
    let files: Vec<String> = touched_files
        .iter()
        .map(|f| format!("- {}", paths::base_name(f)))
        .collect();
    section.push_str(&files.join("\n"));

    ContextAppend {
        section,
        changed: true,
        added,
    }
}

/// Apply [`append_context`] to the file at `path`, appending in place.
///
/// Returns `None` when the file does not exist. The document is only appended
/// to, so invalid UTF-8 in its history is tolerated.
pub fn update_context_file(
    path: &Path,
    identifiers: &[IdentifierDescriptor],
    touched_files: &[PathBuf],
    now: DateTime<Utc>,
    dry_run: bool,
) -> Result<Option<ContextAppend>> {
    let Some(doc) = io::read_lossy_if_exists(path)? else {
        tracing::debug!(path = %path.display(), "no context document");
        return Ok(None);
    };
    let result = append_context(&doc, identifiers, touched_files, now);
    if result.changed && !dry_run {
        io::append_text(path, &result.section)?;
        tracing::info!(
            path = %path.display(),
            added = result.added.len(),
            "updated context document"
        );
    }
    Ok(Some(result))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Checklist toggling for an active task's `tasks.md`.
//!
//! Matching is a fuzzy substring heuristic. It can close a line the phrase
//! was not about, and every qualifying line is closed, not just the best one.

use crate::error::Result;
use crate::io;
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

pub const OPEN_MARKER: &str = "[ ]";
pub const CLOSED_MARKER: &str = "[x]";

/// Characters compared in either direction.
const MATCH_WINDOW: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskToggle {
    pub content: String,
    pub changed: bool,
    /// Lines flipped from open to closed.
    pub toggled: usize,
}

/// Footer appended after a run that closed at least one line.
pub fn footer(now: DateTime<Utc>) -> String {
    format!(
        "\n\n_Last auto-updated: {}_",
        now.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

static LEADING_VERB: OnceLock<Regex> = OnceLock::new();

fn leading_verb() -> &'static Regex {
    LEADING_VERB.get_or_init(|| {
        Regex::new(r"(?i)^(?:implement|create|add|fix|update|complete)(?:s|d|ed|es|ing)?\s+")
            .unwrap()
    })
}

fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// Lower-cased first 20 characters after the marker and its separator.
fn literal_window(after_marker: &str) -> String {
    let mut rest = after_marker.chars();
    rest.next();
    take_chars(rest.as_str(), MATCH_WINDOW).trim().to_lowercase()
}

/// Task text with a leading imperative verb dropped, so "Implement customer
/// table" is compared as "customer table". The object must start on a word
/// boundary in the phrase, and end on one unless it was cut at the window.
fn object_window(after_marker: &str) -> Option<Regex> {
    let text = after_marker.trim_start();
    let m = leading_verb().find(text)?;
    let rest = &text[m.end()..];
    let object = take_chars(rest, MATCH_WINDOW);
    let truncated = object.len() < rest.trim_end().len();
    let object = object.trim().to_lowercase();
    if object.is_empty() {
        return None;
    }
    let tail = if truncated { "" } else { r"\b" };
    Regex::new(&format!(r"\b{}{tail}", regex::escape(&object))).ok()
}

fn line_matches(line: &str, marker_at: usize, completion_lower: &str, prefix: &str) -> bool {
    if line.to_lowercase().contains(prefix) {
        return true;
    }
    let after_marker = &line[marker_at + OPEN_MARKER.len()..];
    let literal = literal_window(after_marker);
    if !literal.is_empty() && completion_lower.contains(literal.as_str()) {
        return true;
    }
    object_window(after_marker).is_some_and(|re| re.is_match(completion_lower))
}

/// Close every open checklist line matching one of `completions`.
pub fn toggle_completed(doc: &str, completions: &[String], now: DateTime<Utc>) -> TaskToggle {
    let mut lines: Vec<String> = doc.split('\n').map(str::to_string).collect();
    let mut toggled = 0;

    for completion in completions {
        let completion_lower = completion.trim().to_lowercase();
        if completion_lower.is_empty() {
            continue;
        }
        let prefix = take_chars(&completion_lower, MATCH_WINDOW);

        for line in lines.iter_mut() {
            let Some(marker_at) = line.find(OPEN_MARKER) else {
                continue;
            };
            if line_matches(line, marker_at, &completion_lower, prefix) {
                line.replace_range(marker_at..marker_at + OPEN_MARKER.len(), CLOSED_MARKER);
                toggled += 1;
            }
        }
    }

    if toggled == 0 {
        return TaskToggle {
            content: doc.to_string(),
            changed: false,
            toggled,
        };
    }

    let mut content = lines.join("\n");
    content.push_str(&footer(now));
    TaskToggle {
        content,
        changed: true,
        toggled,
    }
}

/// Apply [`toggle_completed`] to the file at `path`.
///
/// Returns `None` when the file does not exist. The file is only rewritten
/// when something changed and `dry_run` is false.
pub fn update_tasks_file(
    path: &Path,
    completions: &[String],
    now: DateTime<Utc>,
    dry_run: bool,
) -> Result<Option<TaskToggle>> {
    let Some(doc) = io::read_if_exists(path)? else {
        tracing::debug!(path = %path.display(), "no tasks document");
        return Ok(None);
    };
    let result = toggle_completed(&doc, completions, now);
    if result.changed && !dry_run {
        io::atomic_write(path, result.content.as_bytes())?;
        tracing::info!(path = %path.display(), toggled = result.toggled, "updated tasks document");
    }
    Ok(Some(result))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

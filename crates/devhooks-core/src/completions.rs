//! Completion phrases ("implemented X", "successfully added Y") in narrative text.

use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

static SHAPES: OnceLock<[Regex; 2]> = OnceLock::new();

fn shapes() -> &'static [Regex; 2] {
    SHAPES.get_or_init(|| {
        let build = |p: &str| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .unwrap()
        };
        [
            build(r"(?:implemented|created|added|fixed|updated|completed)\s+([^.\n]+)"),
            build(r"(?:successfully|now)\s+(?:implemented|created|added|fixed|updated)\s+([^.\n]+)"),
        ]
    })
}

/// Trimmed completion phrases in order of appearance.
///
/// Both shapes are scanned independently, so "successfully implemented X"
/// yields "X" twice. Duplicates are harmless downstream.
pub fn extract_completions(narrative: &str) -> Vec<String> {
    let mut found: Vec<(usize, usize, String)> = Vec::new();
    for (shape, re) in shapes().iter().enumerate() {
        for caps in re.captures_iter(narrative) {
            let Some(tail) = caps.get(1) else {
                continue;
            };
            let phrase = tail.as_str().trim();
            if !phrase.is_empty() {
                found.push((tail.start(), shape, phrase.to_string()));
            }
        }
    }
    found.sort_by_key(|(start, shape, _)| (*start, *shape));
    found.into_iter().map(|(_, _, phrase)| phrase).collect()
}

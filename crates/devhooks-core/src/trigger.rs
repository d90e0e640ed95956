use crate::error::{HookError, Result};
use crate::rules::TriggerSpec;
use regex::{Regex, RegexBuilder};

/// Compile an intent pattern case-insensitively.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| HookError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

/// Whether `prompt_lower` fires `spec`.
///
/// Checks keywords, then intent patterns, then context indicators, and stops
/// at the first hit. A pattern that fails to compile is logged and skipped.
pub fn matches(prompt_lower: &str, spec: &TriggerSpec) -> bool {
    if contains_any(prompt_lower, &spec.keywords) {
        return true;
    }

    let pattern_hit = spec
        .intent_patterns
        .iter()
        .any(|pattern| match compile_pattern(pattern) {
            Ok(re) => re.is_match(prompt_lower),
            Err(e) => {
                tracing::warn!("{e}");
                false
            }
        });
    if pattern_hit {
        return true;
    }

    contains_any(prompt_lower, &spec.context_indicators)
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|needle| haystack.contains(&needle.to_lowercase()))
}

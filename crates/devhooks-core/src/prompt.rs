//! Prompt-submit hook: decode stdin, activate skills, never lose the prompt.

use crate::activation;
use crate::error::Result;
use crate::rules::RuleSet;

// ---------------------------------------------------------------------------
// PromptEnvelope
// ---------------------------------------------------------------------------

/// Hook payload as delivered on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEnvelope {
    /// JSON object carrying a string `prompt` field.
    Structured { prompt: String },
    /// Anything else, taken verbatim.
    Raw(String),
}

impl PromptEnvelope {
    pub fn decode(input: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(input).ok();
        match parsed
            .as_ref()
            .and_then(|v| v.get("prompt"))
            .and_then(|p| p.as_str())
        {
            Some(prompt) if !prompt.is_empty() => PromptEnvelope::Structured {
                prompt: prompt.to_string(),
            },
            _ => PromptEnvelope::Raw(input.to_string()),
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            PromptEnvelope::Structured { prompt } => prompt,
            PromptEnvelope::Raw(text) => text,
        }
    }
}

// ---------------------------------------------------------------------------
// Hook entry points
// ---------------------------------------------------------------------------

/// Decode `input` and return the (possibly augmented) trimmed prompt.
///
/// The prompt is trimmed even when nothing activates, so a disabled rule set
/// echoes `"  raw prompt\n"` as `"raw prompt"`. Only a failure returns the
/// input byte-for-byte, via [`process_or_passthrough`].
pub fn process(input: &[u8], rules: &RuleSet) -> Result<String> {
    let text = std::str::from_utf8(input)?;
    let envelope = PromptEnvelope::decode(text);
    Ok(activation::activate(envelope.prompt().trim(), rules))
}

/// Like [`process`], but any failure yields `input` unchanged.
pub fn process_or_passthrough(input: &[u8], rules: &RuleSet) -> Vec<u8> {
    match process(input, rules) {
        Ok(output) => output.into_bytes(),
        Err(e) => {
            tracing::error!("prompt hook failed, passing input through: {e}");
            input.to_vec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{GlobalSettings, Rule};
    use crate::types::Priority;

    fn core_only() -> RuleSet {
        RuleSet::new(
            GlobalSettings {
                enable_auto_activation: true,
                ..GlobalSettings::default()
            },
            vec![Rule::new("al-development-core", Priority::Critical, "R0")],
        )
    }

    #[test]
    fn decode_structured_envelope() {
        let env = PromptEnvelope::decode(r#"{"session_id":"s1","prompt":"add a page"}"#);
        assert_eq!(
            env,
            PromptEnvelope::Structured {
                prompt: "add a page".to_string()
            }
        );
    }

    #[test]
    fn decode_falls_back_to_raw() {
        for input in [
            "just text",
            r#"{"no_prompt": true}"#,
            r#"{"prompt": 42}"#,
            r#"["prompt"]"#,
            r#"{"prompt": ""}"#,
        ] {
            assert_eq!(PromptEnvelope::decode(input), PromptEnvelope::Raw(input.to_string()));
        }
    }

    #[test]
    fn process_trims_and_augments() {
        let out = process(b"{\"prompt\":\"  build it \\n\"}", &core_only()).unwrap();
        assert!(out.ends_with("USER REQUEST:\nbuild it"));
    }

    #[test]
    fn disabled_rules_echo_trimmed_prompt() {
        let out = process(b"  raw prompt\n", &RuleSet::disabled()).unwrap();
        assert_eq!(out, "raw prompt");

        let out = process(b"{\"prompt\":\" wrapped \"}", &RuleSet::disabled()).unwrap();
        assert_eq!(out, "wrapped");
    }

    #[test]
    fn invalid_utf8_passes_through_unchanged() {
        let input = [0x66, 0x6f, 0xff, 0xfe];
        assert!(process(&input, &core_only()).is_err());
        assert_eq!(process_or_passthrough(&input, &core_only()), input.to_vec());
    }
}

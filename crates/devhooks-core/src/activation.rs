use crate::paths;
use crate::rules::{Rule, RuleSet};
use serde::Serialize;

pub const USER_REQUEST_LABEL: &str = "USER REQUEST:";

// ---------------------------------------------------------------------------
// ActivatedRule
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ActivatedRule<'a> {
    pub name: &'a str,
    pub rank: u8,
    pub reminder: &'a str,
}

impl<'a> ActivatedRule<'a> {
    fn from_rule(rule: &'a Rule) -> Self {
        Self {
            name: &rule.name,
            rank: rule.priority.rank(),
            reminder: &rule.reminder,
        }
    }
}

// ---------------------------------------------------------------------------
// Activation
// ---------------------------------------------------------------------------

/// Rules activated by `prompt`, highest priority first.
///
/// Returns nothing when auto-activation is disabled. The base rule is always
/// included; ties keep configuration order.
pub fn activated_rules<'a>(prompt: &str, rules: &'a RuleSet) -> Vec<ActivatedRule<'a>> {
    if !rules.is_enabled() {
        return Vec::new();
    }

    let prompt_lower = prompt.to_lowercase();
    let mut activated: Vec<ActivatedRule<'a>> = rules
        .rules
        .iter()
        .filter(|rule| rules.is_base(rule) || rule.matches(&prompt_lower))
        .map(ActivatedRule::from_rule)
        .collect();

    // Vec::sort_by_key is stable
    activated.sort_by_key(|a| a.rank);
    activated
}

/// Augment `prompt` with a skill directive, or return it unchanged when
/// nothing activates.
pub fn activate(prompt: &str, rules: &RuleSet) -> String {
    let activated = activated_rules(prompt, rules);
    if activated.is_empty() {
        return prompt.to_string();
    }
    tracing::info!(
        skills = %activated.iter().map(|a| a.name).collect::<Vec<_>>().join(", "),
        "activated skills"
    );
    render_directive(prompt, &activated, &rules.settings.skills_path)
}

// ---------------------------------------------------------------------------
// render_directive
// ---------------------------------------------------------------------------

pub fn render_directive(prompt: &str, activated: &[ActivatedRule<'_>], skills_path: &str) -> String {
    let mut doc = String::new();

    doc.push_str("CRITICAL INSTRUCTION: Skill Compliance Required\n\n");
    doc.push_str("Read the complete skill documentation before doing anything else:\n\n");
    for a in activated {
        doc.push_str(&format!(
            "- {} (and every resource file it references)\n",
            paths::skill_doc(skills_path, a.name)
        ));
    }

    doc.push('\n');
    for a in activated.iter().filter(|a| !a.reminder.is_empty()) {
        doc.push_str(&format!("  {}\n", a.reminder));
    }

    doc.push_str("\nThis means:\n");
    doc.push_str("- Read every section of each SKILL.md, not just the summary\n");
    doc.push_str("- Read all resource files referenced from SKILL.md\n");
    doc.push_str("- Follow every rule, workflow phase, and requirement as written\n");
    doc.push_str("- Apply the documented standards for IDs, properties, and naming\n");
    doc.push_str("- Do not skip steps or improvise alternatives\n\n");
    doc.push_str("Confirm your understanding by following the documented workflow exactly.\n\n");

    let names: Vec<&str> = activated.iter().map(|a| a.name).collect();
    doc.push_str(&format!("Active skills: {}\n\n", names.join(", ")));

    doc.push_str(USER_REQUEST_LABEL);
    doc.push('\n');
    doc.push_str(prompt);
    doc
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

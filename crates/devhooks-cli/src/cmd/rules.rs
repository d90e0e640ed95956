use crate::output::{print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use devhooks_core::activation;
use devhooks_core::rules::{RuleSet, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum RulesSubcommand {
    /// List configured rules in configuration order
    List,
    /// Validate the rules file for common mistakes
    Check,
    /// Show which skills a prompt would activate
    Match {
        #[arg(required = true)]
        prompt: Vec<String>,
    },
}

pub fn run(rules_path: &Path, subcmd: RulesSubcommand, json: bool) -> anyhow::Result<()> {
    let rules = RuleSet::load(rules_path)
        .with_context(|| format!("failed to load rules from {}", rules_path.display()))?;
    match subcmd {
        RulesSubcommand::List => list(&rules, json),
        RulesSubcommand::Check => check(&rules, json),
        RulesSubcommand::Match { prompt } => match_prompt(&rules, &prompt.join(" "), json),
    }
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

fn list(rules: &RuleSet, json: bool) -> anyhow::Result<()> {
    if json {
        let items: Vec<serde_json::Value> = rules
            .rules
            .iter()
            .map(|r| {
                serde_json::json!({
                    "name": r.name,
                    "priority": r.priority,
                    "base": rules.is_base(r),
                    "reminder": r.reminder,
                    "triggers": r.triggers,
                })
            })
            .collect();
        return print_json(&serde_json::json!({
            "enabled": rules.is_enabled(),
            "rules": items,
        }));
    }

    if !rules.is_enabled() {
        println!("Auto-activation is disabled.");
    }
    if rules.rules.is_empty() {
        println!("No rules configured.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = rules
        .rules
        .iter()
        .map(|r| {
            let counts = r.triggers.as_ref().map_or((0, 0, 0), |t| {
                (
                    t.keywords.len(),
                    t.intent_patterns.len(),
                    t.context_indicators.len(),
                )
            });
            let name = if rules.is_base(r) {
                format!("{} (base)", r.name)
            } else {
                r.name.clone()
            };
            vec![
                name,
                r.priority.to_string(),
                counts.0.to_string(),
                counts.1.to_string(),
                counts.2.to_string(),
            ]
        })
        .collect();
    print_table(
        &["NAME", "PRIORITY", "KEYWORDS", "PATTERNS", "INDICATORS"],
        &rows,
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

fn check(rules: &RuleSet, json: bool) -> anyhow::Result<()> {
    let warnings = rules.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Rules are valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            match &w.rule {
                Some(rule) => println!("[{prefix}] {rule}: {}", w.message),
                None => println!("[{prefix}] {}", w.message),
            }
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("rules validation found errors");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// match
// ---------------------------------------------------------------------------

fn match_prompt(rules: &RuleSet, prompt: &str, json: bool) -> anyhow::Result<()> {
    let activated = activation::activated_rules(prompt, rules);

    if json {
        return print_json(&serde_json::json!({
            "enabled": rules.is_enabled(),
            "activated": activated,
        }));
    }

    if !rules.is_enabled() {
        println!("Auto-activation is disabled; the prompt passes through unchanged.");
    } else if activated.is_empty() {
        println!("No skills activate for this prompt.");
    } else {
        for a in &activated {
            println!("{} (rank {})", a.name, a.rank);
        }
    }
    Ok(())
}

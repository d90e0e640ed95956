use crate::error::{HookError, Result};
use crate::paths;
use crate::trigger;
use crate::types::Priority;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// RuleWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleWarning {
    pub level: WarnLevel,
    pub rule: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// GlobalSettings
// ---------------------------------------------------------------------------

pub const DEFAULT_BASE_RULE: &str = "al-development-core";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    #[serde(default)]
    pub enable_auto_activation: bool,
    /// Rule activated for every prompt while auto-activation is enabled.
    #[serde(default = "default_base_rule")]
    pub base_rule: String,
    #[serde(default = "default_skills_path")]
    pub skills_path: String,
}

fn default_base_rule() -> String {
    DEFAULT_BASE_RULE.to_string()
}

fn default_skills_path() -> String {
    paths::DEFAULT_SKILLS_DIR.to_string()
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            enable_auto_activation: false,
            base_rule: default_base_rule(),
            skills_path: default_skills_path(),
        }
    }
}

// ---------------------------------------------------------------------------
// TriggerSpec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerSpec {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub intent_patterns: Vec<String>,
    #[serde(default)]
    pub context_indicators: Vec<String>,
}

impl TriggerSpec {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
            && self.intent_patterns.is_empty()
            && self.context_indicators.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Rule
// ---------------------------------------------------------------------------

/// One entry of the `rules` map as it appears on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleEntry {
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub reminder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_triggers: Option<TriggerSpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: String,
    pub priority: Priority,
    pub reminder: String,
    pub triggers: Option<TriggerSpec>,
}

impl Rule {
    pub fn new(name: impl Into<String>, priority: Priority, reminder: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            priority,
            reminder: reminder.into(),
            triggers: None,
        }
    }

    pub fn with_triggers(mut self, triggers: TriggerSpec) -> Self {
        self.triggers = Some(triggers);
        self
    }

    /// Trigger evaluation only; the base-rule exemption lives in the engine.
    pub fn matches(&self, prompt_lower: &str) -> bool {
        match &self.triggers {
            Some(spec) => trigger::matches(prompt_lower, spec),
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// RuleFile (serialized shape)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleFile {
    #[serde(default)]
    global_settings: GlobalSettings,
    #[serde(default)]
    rules: IndexMap<String, RuleEntry>,
}

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

/// Immutable rule store for one invocation. Rules keep configuration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub settings: GlobalSettings,
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(settings: GlobalSettings, rules: Vec<Rule>) -> Self {
        Self { settings, rules }
    }

    /// Empty store with auto-activation off.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enable_auto_activation
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn is_base(&self, rule: &Rule) -> bool {
        rule.name == self.settings.base_rule
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let file: RuleFile = serde_json::from_str(data)?;
        Ok(Self::from_file(file))
    }

    pub fn from_yaml(data: &str) -> Result<Self> {
        let file: RuleFile = serde_yaml::from_str(data)?;
        Ok(Self::from_file(file))
    }

    /// Load from `path`; `.yaml`/`.yml` files are read as YAML, everything else as JSON.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HookError::RulesNotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let is_yaml = path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml");
        if is_yaml {
            Self::from_yaml(&data)
        } else {
            Self::from_json(&data)
        }
    }

    /// Load, degrading to [`RuleSet::disabled`] on any failure.
    pub fn load_or_disabled(path: &Path) -> Self {
        match Self::load(path) {
            Ok(rules) => {
                tracing::debug!(
                    path = %path.display(),
                    rules = rules.rules.len(),
                    enabled = rules.is_enabled(),
                    "loaded skill rules"
                );
                rules
            }
            Err(e) => {
                tracing::error!(path = %path.display(), "failed to load skill rules: {e}");
                Self::disabled()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<RuleWarning> {
        let mut warnings = Vec::new();

        // 1. The base rule should exist when activation is on
        if self.is_enabled() && self.get(&self.settings.base_rule).is_none() {
            warnings.push(RuleWarning {
                level: WarnLevel::Warning,
                rule: None,
                message: format!(
                    "base rule '{}' is not configured; prompts without a trigger match pass through",
                    self.settings.base_rule
                ),
            });
        }

        for rule in &self.rules {
            let is_base = self.is_base(rule);

            // 2. Rules that can never fire
            let untriggered = rule.triggers.as_ref().map_or(true, TriggerSpec::is_empty);
            if untriggered && !is_base {
                warnings.push(RuleWarning {
                    level: WarnLevel::Warning,
                    rule: Some(rule.name.clone()),
                    message: "no prompt triggers; rule never activates".to_string(),
                });
            }

            // 3. Missing priority sorts last
            if rule.priority == Priority::Unspecified {
                warnings.push(RuleWarning {
                    level: WarnLevel::Warning,
                    rule: Some(rule.name.clone()),
                    message: "priority is missing or unrecognised; sorted last".to_string(),
                });
            }

            // 4. Intent patterns must compile
            if let Some(spec) = &rule.triggers {
                for pattern in &spec.intent_patterns {
                    if let Err(e) = trigger::compile_pattern(pattern) {
                        warnings.push(RuleWarning {
                            level: WarnLevel::Error,
                            rule: Some(rule.name.clone()),
                            message: e.to_string(),
                        });
                    }
                }
            }
        }

        warnings
    }
}

impl RuleSet {
    fn from_file(file: RuleFile) -> Self {
        let rules = file
            .rules
            .into_iter()
            .map(|(name, entry)| Rule {
                name,
                priority: entry.priority,
                reminder: entry.reminder,
                triggers: entry.prompt_triggers,
            })
            .collect();
        Self {
            settings: file.global_settings,
            rules,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

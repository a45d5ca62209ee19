//! Value types for the `skill-rules.json` table.
//!
//! Only linker-owned entries round-trip through [`RuleEntry`]; project-owned
//! entries stay raw JSON so unknown fields survive untouched (see `rules`).

use serde::{Deserialize, Serialize};

/// How strongly a skill's guidance is applied once it activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforcement {
    Suggest,
    Require,
    Block,
}

/// Activation priority when several skills match the same prompt or file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

/// Prompt-side activation triggers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTriggers {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, rename = "intentPatterns")]
    pub intent_patterns: Vec<String>,
}

/// File-side activation triggers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTriggers {
    #[serde(default, rename = "pathPatterns")]
    pub path_patterns: Vec<String>,
    #[serde(default, rename = "contentPatterns")]
    pub content_patterns: Vec<String>,
}

/// One skill's activation rule as persisted in the rule file.
///
/// Scalar fields a package never declared are omitted from the JSON rather
/// than written as `null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEntry {
    /// Free-form category, e.g. "domain" or "guidelines".
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub skill_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enforcement: Option<Enforcement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, rename = "promptTriggers")]
    pub prompt_triggers: PromptTriggers,
    #[serde(default, rename = "fileTriggers")]
    pub file_triggers: FileTriggers,
    /// `true` on every entry the linker owns. Entries without it belong to
    /// the project.
    #[serde(default, rename = "_linked")]
    pub linked: bool,
    /// Package that published the skill; only set on linker-owned entries.
    #[serde(default, rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Reserved `_meta` block at the top of the rule file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesMeta {
    pub version: String,
    pub description: String,
}

impl Default for RulesMeta {
    fn default() -> Self {
        Self {
            version: "1.0".into(),
            description: "Skill activation rules".into(),
        }
    }
}

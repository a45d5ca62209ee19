//! Core types for discovered skills.

use std::path::PathBuf;

use {
    armory_config::{Enforcement, FileTriggers, Priority, PromptTriggers, RuleEntry},
    serde::Deserialize,
};

/// Activation metadata from a SKILL.md front matter block.
///
/// Every field is optional; a bare `---\n---` block is a valid skill that
/// simply never auto-activates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillMetadata {
    #[serde(default, rename = "type")]
    pub skill_type: Option<String>,
    #[serde(default)]
    pub enforcement: Option<Enforcement>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default, rename = "intentPatterns")]
    pub intent_patterns: Vec<String>,
    #[serde(default, rename = "pathPatterns")]
    pub path_patterns: Vec<String>,
    #[serde(default, rename = "contentPatterns")]
    pub content_patterns: Vec<String>,
}

impl SkillMetadata {
    /// Build the rule-file entry for this skill, tagged as linked so it can
    /// be refreshed or removed on later runs.
    #[must_use]
    pub fn to_rule_entry(&self, package: &str) -> RuleEntry {
        RuleEntry {
            skill_type: self.skill_type.clone(),
            enforcement: self.enforcement,
            priority: self.priority,
            prompt_triggers: PromptTriggers {
                keywords: self.keywords.clone(),
                intent_patterns: self.intent_patterns.clone(),
            },
            file_triggers: FileTriggers {
                path_patterns: self.path_patterns.clone(),
                content_patterns: self.content_patterns.clone(),
            },
            linked: true,
            source: Some(package.to_string()),
        }
    }
}

/// A skill found under the content root.
#[derive(Debug, Clone)]
pub struct DiscoveredSkill {
    /// Directory name, which doubles as the rule key and link name.
    pub name: String,
    /// Package the skill ships with.
    pub package: String,
    /// Absolute path to the skill directory.
    pub path: PathBuf,
    pub metadata: SkillMetadata,
}

//! Workspace layout, activation-rule storage, and validation.
//!
//! The rule file lives at `.claude/config/skill-rules.json`: top-level keys
//! are skill names plus the reserved `_meta` block. Entries written by the
//! linker carry `_linked: true`; everything else belongs to the project and
//! is never modified or removed by tooling.

pub mod error;
pub mod layout;
pub mod rules;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    layout::WorkspaceLayout,
    rules::{MergeOutcome, RuleStore, RuleTable},
    schema::{Enforcement, FileTriggers, Priority, PromptTriggers, RuleEntry, RulesMeta},
    validate::{Diagnostic, Severity, ValidationResult, validate_workspace},
};

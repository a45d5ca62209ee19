//! Workspace validation engine.
//!
//! Checks the rule file against its schema and the assistant content dirs
//! against the layout conventions, reporting diagnostics instead of failing
//! on first problem.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::{
    layout::{SKILL_FILE, WorkspaceLayout},
    rules::{self, RuleStore},
};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "rules", "skills", "hooks", "agents", "commands"
    pub category: &'static str,
    /// Rule-entry path (e.g. "alpha.enforcement") or workspace-relative file
    /// path, depending on the category.
    pub path: String,
    pub message: String,
}

/// Result of validating a workspace.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub root: PathBuf,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

const VALID_ENFORCEMENT: &[&str] = &["suggest", "require", "block"];
const VALID_PRIORITY: &[&str] = &["low", "medium", "high", "critical"];

/// A SKILL.md longer than this must be split into reference files the skill
/// links to, or it blows the assistant's context on every activation.
const MAX_SKILL_LINES: usize = 500;

// ── Core validation ─────────────────────────────────────────────────────────

/// Validate everything under the workspace: the rule file plus the skills,
/// hooks, agents, and commands directories. Absent pieces are skipped.
#[must_use]
pub fn validate_workspace(layout: &WorkspaceLayout) -> ValidationResult {
    let mut diagnostics = Vec::new();

    check_rules(layout, &mut diagnostics);
    check_skills(layout, &mut diagnostics);
    check_file_extensions(
        layout,
        &layout.hooks_dir(),
        "hooks",
        &["ts", "js"],
        "hooks must be TypeScript or JavaScript (.ts/.js)",
        &mut diagnostics,
    );
    check_agents(layout, &mut diagnostics);
    check_file_extensions(
        layout,
        &layout.commands_dir(),
        "commands",
        &["md"],
        "commands must be markdown (.md)",
        &mut diagnostics,
    );

    ValidationResult {
        diagnostics,
        root: layout.root().to_path_buf(),
    }
}

// ── Rule file ───────────────────────────────────────────────────────────────

fn check_rules(layout: &WorkspaceLayout, diagnostics: &mut Vec<Diagnostic>) {
    let rules_file = layout.rules_file();
    if !rules_file.is_file() {
        diagnostics.push(Diagnostic {
            severity: Severity::Info,
            category: "rules",
            path: relative_display(layout, &rules_file),
            message: "no rule file found; run setup or link first".into(),
        });
        return;
    }

    let store = RuleStore::new(rules_file);
    let table = match store.load() {
        Ok(table) => table,
        Err(e) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                category: "rules",
                path: relative_display(layout, store.path()),
                message: format!("unreadable rule file: {e}"),
            });
            return;
        },
    };

    for (name, entry) in table.skills() {
        let Some(fields) = entry.as_object() else {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                category: "rules",
                path: name.clone(),
                message: "rule entry is not a JSON object".into(),
            });
            continue;
        };

        match fields.get("type").and_then(Value::as_str) {
            Some(t) if !t.trim().is_empty() => {},
            _ => diagnostics.push(Diagnostic {
                severity: Severity::Error,
                category: "rules",
                path: format!("{name}.type"),
                message: "missing required field \"type\"".into(),
            }),
        }

        check_enum_field(name, fields, "enforcement", VALID_ENFORCEMENT, diagnostics);
        check_enum_field(name, fields, "priority", VALID_PRIORITY, diagnostics);

        // A linked entry certifies a symlink under gems/; flag drift.
        if rules::is_linked_entry(entry) {
            let link = layout.gem_link(name);
            match std::fs::symlink_metadata(&link) {
                Ok(meta) if meta.file_type().is_symlink() => {},
                Ok(_) => diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    category: "rules",
                    path: name.clone(),
                    message: format!(
                        "linked entry but {} is not a symlink",
                        relative_display(layout, &link)
                    ),
                }),
                Err(_) => diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    category: "rules",
                    path: name.clone(),
                    message: format!(
                        "linked entry but {} is missing; re-run link",
                        relative_display(layout, &link)
                    ),
                }),
            }
        }
    }
}

/// Flag an enum-ish rule field: invalid values are errors, missing ones only
/// warnings (activation falls back to defaults).
fn check_enum_field(
    skill: &str,
    fields: &Map<String, Value>,
    field: &str,
    valid: &[&str],
    diagnostics: &mut Vec<Diagnostic>,
) {
    match fields.get(field) {
        None | Some(Value::Null) => diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            category: "rules",
            path: format!("{skill}.{field}"),
            message: format!("missing \"{field}\"; activation falls back to defaults"),
        }),
        Some(value) => {
            if !value.as_str().is_some_and(|s| valid.contains(&s)) {
                diagnostics.push(Diagnostic {
                    severity: Severity::Error,
                    category: "rules",
                    path: format!("{skill}.{field}"),
                    message: format!(
                        "invalid {field} {value}; expected one of: {}",
                        valid.join(", ")
                    ),
                });
            }
        },
    }
}

// ── Content directories ─────────────────────────────────────────────────────

fn check_skills(layout: &WorkspaceLayout, diagnostics: &mut Vec<Diagnostic>) {
    let skills_dir = layout.skills_dir();
    if !skills_dir.is_dir() {
        return;
    }

    let mut skill_dirs = Vec::new();
    let Ok(entries) = std::fs::read_dir(&skills_dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let file_name = entry.file_name();
        if file_name == "gems" || file_name == "local" {
            collect_skill_dirs(layout, &path, diagnostics, &mut skill_dirs);
        } else if !is_hidden(&file_name) && path.is_dir() {
            skill_dirs.push(path);
        }
    }

    for dir in skill_dirs {
        let skill_md = dir.join(SKILL_FILE);
        if !skill_md.is_file() {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                category: "skills",
                path: relative_display(layout, &dir),
                message: "skill directory has no SKILL.md".into(),
            });
            continue;
        }
        match std::fs::read_to_string(&skill_md) {
            Ok(content) => {
                let lines = content.lines().count();
                if lines > MAX_SKILL_LINES {
                    diagnostics.push(Diagnostic {
                        severity: Severity::Error,
                        category: "skills",
                        path: relative_display(layout, &skill_md),
                        message: format!(
                            "SKILL.md is {lines} lines (max {MAX_SKILL_LINES}); move detail into reference files"
                        ),
                    });
                }
            },
            Err(e) => diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                category: "skills",
                path: relative_display(layout, &skill_md),
                message: format!("unreadable SKILL.md: {e}"),
            }),
        }
    }
}

/// Children of `gems/` and `local/` are expected to be skill directories
/// (possibly via symlink). Anything else is flagged, not followed.
fn collect_skill_dirs(
    layout: &WorkspaceLayout,
    dir: &Path,
    diagnostics: &mut Vec<Diagnostic>,
    out: &mut Vec<PathBuf>,
) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if is_hidden(&entry.file_name()) {
            continue;
        }
        if path.is_dir() {
            out.push(path);
        } else {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                category: "skills",
                path: relative_display(layout, &path),
                message: "not a skill directory (broken link?)".into(),
            });
        }
    }
}

fn check_agents(layout: &WorkspaceLayout, diagnostics: &mut Vec<Diagnostic>) {
    let agents_dir = layout.agents_dir();
    if !agents_dir.is_dir() {
        return;
    }
    let Ok(entries) = std::fs::read_dir(&agents_dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if is_hidden(&entry.file_name()) || path.is_dir() {
            continue;
        }
        diagnostics.push(Diagnostic {
            severity: Severity::Error,
            category: "agents",
            path: relative_display(layout, &path),
            message: "agents must live in a category subdirectory".into(),
        });
    }
}

fn check_file_extensions(
    layout: &WorkspaceLayout,
    dir: &Path,
    category: &'static str,
    allowed: &[&str],
    message: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if !dir.is_dir() {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if is_hidden(&entry.file_name()) || !path.is_file() {
            continue;
        }
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !allowed.contains(&ext) {
            diagnostics.push(Diagnostic {
                severity: Severity::Error,
                category,
                path: relative_display(layout, &path),
                message: message.to_string(),
            });
        }
    }
}

fn is_hidden(file_name: &std::ffi::OsStr) -> bool {
    file_name.to_string_lossy().starts_with('.')
}

/// Path relative to the workspace root, for human-readable diagnostics.
fn relative_display(layout: &WorkspaceLayout, path: &Path) -> String {
    path.strip_prefix(layout.root())
        .unwrap_or(path)
        .display()
        .to_string()
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> (tempfile::TempDir, WorkspaceLayout) {
        let tmp = tempfile::tempdir().unwrap();
        let layout = WorkspaceLayout::new(tmp.path());
        (tmp, layout)
    }

    fn write_rules(layout: &WorkspaceLayout, json: &str) {
        let path = layout.rules_file();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, json).unwrap();
    }

    fn find<'a>(result: &'a ValidationResult, path: &str) -> Option<&'a Diagnostic> {
        result.diagnostics.iter().find(|d| d.path == path)
    }

    #[test]
    fn empty_workspace_has_no_errors() {
        let (_tmp, layout) = workspace();
        let result = validate_workspace(&layout);
        assert!(!result.has_errors(), "got: {:?}", result.diagnostics);
        assert_eq!(result.count(Severity::Info), 1);
    }

    #[test]
    fn meta_block_is_not_validated_as_a_skill() {
        let (_tmp, layout) = workspace();
        write_rules(
            &layout,
            r#"{"_meta": {"version": "1.0", "description": "rules"}}"#,
        );
        let result = validate_workspace(&layout);
        assert!(!result.has_errors(), "got: {:?}", result.diagnostics);
    }

    #[test]
    fn missing_type_is_error() {
        let (_tmp, layout) = workspace();
        write_rules(
            &layout,
            r#"{"alpha": {"enforcement": "suggest", "priority": "low"}}"#,
        );
        let result = validate_workspace(&layout);
        let d = find(&result, "alpha.type").unwrap();
        assert_eq!(d.severity, Severity::Error);
    }

    #[test]
    fn invalid_enforcement_is_error_missing_is_warning() {
        let (_tmp, layout) = workspace();
        write_rules(
            &layout,
            r#"{
                "bad": {"type": "t", "enforcement": "sometimes", "priority": "low"},
                "sparse": {"type": "t", "priority": "low"}
            }"#,
        );
        let result = validate_workspace(&layout);
        assert_eq!(
            find(&result, "bad.enforcement").unwrap().severity,
            Severity::Error
        );
        assert_eq!(
            find(&result, "sparse.enforcement").unwrap().severity,
            Severity::Warning
        );
    }

    #[test]
    fn invalid_priority_is_error() {
        let (_tmp, layout) = workspace();
        write_rules(
            &layout,
            r#"{"alpha": {"type": "t", "enforcement": "suggest", "priority": "urgent"}}"#,
        );
        let result = validate_workspace(&layout);
        assert_eq!(
            find(&result, "alpha.priority").unwrap().severity,
            Severity::Error
        );
    }

    #[test]
    fn non_object_entry_is_error() {
        let (_tmp, layout) = workspace();
        write_rules(&layout, r#"{"alpha": "not an object"}"#);
        let result = validate_workspace(&layout);
        assert_eq!(find(&result, "alpha").unwrap().severity, Severity::Error);
    }

    #[test]
    fn malformed_rule_file_is_error() {
        let (_tmp, layout) = workspace();
        write_rules(&layout, "{ nope");
        let result = validate_workspace(&layout);
        assert!(result.has_errors());
    }

    #[test]
    fn linked_entry_without_symlink_is_warning() {
        let (_tmp, layout) = workspace();
        write_rules(
            &layout,
            r#"{"alpha": {"type": "t", "enforcement": "suggest", "priority": "low", "_linked": true}}"#,
        );
        let result = validate_workspace(&layout);
        let d = find(&result, "alpha").unwrap();
        assert_eq!(d.severity, Severity::Warning);
        assert!(d.message.contains("missing"));
    }

    #[cfg(unix)]
    #[test]
    fn linked_entry_with_symlink_is_clean() {
        let (_tmp, layout) = workspace();
        write_rules(
            &layout,
            r#"{"alpha": {"type": "t", "enforcement": "suggest", "priority": "low", "_linked": true}}"#,
        );
        let gems = layout.gem_skills_dir();
        std::fs::create_dir_all(&gems).unwrap();
        std::os::unix::fs::symlink("../../../.context/pkg/skills/alpha", gems.join("alpha"))
            .unwrap();
        let result = validate_workspace(&layout);
        assert!(find(&result, "alpha").is_none(), "got: {:?}", result.diagnostics);
    }

    #[test]
    fn skill_dir_without_definition_is_error() {
        let (_tmp, layout) = workspace();
        std::fs::create_dir_all(layout.local_skills_dir().join("half-baked")).unwrap();
        let result = validate_workspace(&layout);
        let d = find(&result, ".claude/skills/local/half-baked").unwrap();
        assert_eq!(d.severity, Severity::Error);
    }

    #[test]
    fn oversized_skill_definition_is_error() {
        let (_tmp, layout) = workspace();
        let dir = layout.local_skills_dir().join("big");
        std::fs::create_dir_all(&dir).unwrap();
        let content = "line\n".repeat(MAX_SKILL_LINES + 1);
        std::fs::write(dir.join(SKILL_FILE), content).unwrap();
        let result = validate_workspace(&layout);
        let d = find(&result, ".claude/skills/local/big/SKILL.md").unwrap();
        assert_eq!(d.severity, Severity::Error);
        assert!(d.message.contains("501"));
    }

    #[test]
    fn hook_extension_checked() {
        let (_tmp, layout) = workspace();
        let hooks = layout.hooks_dir();
        std::fs::create_dir_all(&hooks).unwrap();
        std::fs::write(hooks.join("format.ts"), "export {}").unwrap();
        std::fs::write(hooks.join("deploy.py"), "pass").unwrap();
        let result = validate_workspace(&layout);
        assert!(find(&result, ".claude/hooks/format.ts").is_none());
        assert_eq!(
            find(&result, ".claude/hooks/deploy.py").unwrap().severity,
            Severity::Error
        );
    }

    #[test]
    fn loose_agent_file_is_error() {
        let (_tmp, layout) = workspace();
        let agents = layout.agents_dir();
        std::fs::create_dir_all(agents.join("testing")).unwrap();
        std::fs::write(agents.join("stray.md"), "agent").unwrap();
        std::fs::write(agents.join("testing/runner.md"), "agent").unwrap();
        let result = validate_workspace(&layout);
        assert_eq!(
            find(&result, ".claude/agents/stray.md").unwrap().severity,
            Severity::Error
        );
        assert!(find(&result, ".claude/agents/testing/runner.md").is_none());
    }

    #[test]
    fn command_extension_checked() {
        let (_tmp, layout) = workspace();
        let commands = layout.commands_dir();
        std::fs::create_dir_all(&commands).unwrap();
        std::fs::write(commands.join("review.md"), "# review").unwrap();
        std::fs::write(commands.join("review.sh"), "echo").unwrap();
        let result = validate_workspace(&layout);
        assert!(find(&result, ".claude/commands/review.md").is_none());
        assert_eq!(
            find(&result, ".claude/commands/review.sh").unwrap().severity,
            Severity::Error
        );
    }

    #[test]
    fn dotfiles_are_ignored() {
        let (_tmp, layout) = workspace();
        std::fs::create_dir_all(layout.hooks_dir()).unwrap();
        std::fs::write(layout.hooks_dir().join(".gitkeep"), "").unwrap();
        let result = validate_workspace(&layout);
        assert!(!result.has_errors(), "got: {:?}", result.diagnostics);
    }
}

//! Managed `.gitignore` section.
//!
//! The workspace owns one marker-delimited block in the project `.gitignore`
//! and keeps it current without touching anything the project put there.

use armory_config::WorkspaceLayout;

use crate::error::Result;

pub const SECTION_MARKER: &str = "# Added by armory";

/// Paths the workspace manages and the project should not commit.
pub const MANAGED_ENTRIES: &[&str] = &[
    "/dev/active/",
    "/.context/",
    "/.claude/tmp/",
    "/.claude/skills/gems/",
    "/CLAUDE.md",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitignoreOutcome {
    /// No `.gitignore` existed; one was written.
    Created,
    /// The managed section was appended to an existing file.
    Appended,
    /// A stale managed section was replaced in place.
    Rewritten,
    /// The managed section is already current.
    Unchanged,
}

/// Bring the managed section of the project `.gitignore` up to date.
///
/// The section runs from the marker line to the next blank line; everything
/// outside it belongs to the project and is preserved byte for byte.
pub fn apply_gitignore(layout: &WorkspaceLayout) -> Result<GitignoreOutcome> {
    let path = layout.root().join(".gitignore");
    let section = render_section();

    if !path.exists() {
        std::fs::write(&path, format!("{section}\n"))?;
        return Ok(GitignoreOutcome::Created);
    }

    let content = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = content.lines().collect();

    let Some(start) = lines.iter().position(|line| line.trim() == SECTION_MARKER) else {
        let mut updated = content.clone();
        if !updated.is_empty() && !updated.ends_with('\n') {
            updated.push('\n');
        }
        if !updated.is_empty() && !updated.ends_with("\n\n") {
            updated.push('\n');
        }
        updated.push_str(&section);
        updated.push('\n');
        std::fs::write(&path, updated)?;
        return Ok(GitignoreOutcome::Appended);
    };

    let end = lines[start..]
        .iter()
        .position(|line| line.trim().is_empty())
        .map_or(lines.len(), |offset| start + offset);

    if lines[start..end].join("\n") == section {
        return Ok(GitignoreOutcome::Unchanged);
    }

    let mut updated: Vec<&str> = Vec::new();
    updated.extend(&lines[..start]);
    updated.extend(section.lines());
    updated.extend(&lines[end..]);
    let mut text = updated.join("\n");
    text.push('\n');
    std::fs::write(&path, text)?;
    Ok(GitignoreOutcome::Rewritten)
}

fn render_section() -> String {
    let mut section = String::from(SECTION_MARKER);
    for entry in MANAGED_ENTRIES {
        section.push('\n');
        section.push_str(entry);
    }
    section
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> (tempfile::TempDir, WorkspaceLayout) {
        let tmp = tempfile::tempdir().unwrap();
        let layout = WorkspaceLayout::new(tmp.path());
        (tmp, layout)
    }

    fn read(layout: &WorkspaceLayout) -> String {
        std::fs::read_to_string(layout.root().join(".gitignore")).unwrap()
    }

    #[test]
    fn creates_file_when_absent() {
        let (_tmp, layout) = workspace();
        let outcome = apply_gitignore(&layout).unwrap();
        assert_eq!(outcome, GitignoreOutcome::Created);

        let content = read(&layout);
        assert!(content.starts_with(SECTION_MARKER));
        assert!(content.contains("/.claude/skills/gems/"));
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn appends_after_project_entries() {
        let (_tmp, layout) = workspace();
        std::fs::write(layout.root().join(".gitignore"), "target/\n").unwrap();

        let outcome = apply_gitignore(&layout).unwrap();
        assert_eq!(outcome, GitignoreOutcome::Appended);

        let content = read(&layout);
        assert!(content.starts_with("target/\n\n# Added by armory\n"));
    }

    #[test]
    fn appends_even_without_trailing_newline() {
        let (_tmp, layout) = workspace();
        std::fs::write(layout.root().join(".gitignore"), "target/").unwrap();

        apply_gitignore(&layout).unwrap();
        assert!(read(&layout).starts_with("target/\n\n# Added by armory\n"));
    }

    #[test]
    fn appends_after_trailing_blank_without_extra_gap() {
        let (_tmp, layout) = workspace();
        std::fs::write(layout.root().join(".gitignore"), "target/\n\n").unwrap();

        let outcome = apply_gitignore(&layout).unwrap();
        assert_eq!(outcome, GitignoreOutcome::Appended);

        let content = read(&layout);
        assert!(content.starts_with("target/\n\n# Added by armory\n"));
        assert!(!content.contains("\n\n\n"));
    }

    #[test]
    fn second_run_is_unchanged() {
        let (_tmp, layout) = workspace();
        apply_gitignore(&layout).unwrap();
        let before = read(&layout);

        let outcome = apply_gitignore(&layout).unwrap();
        assert_eq!(outcome, GitignoreOutcome::Unchanged);
        assert_eq!(read(&layout), before);
    }

    #[test]
    fn stale_section_is_replaced_in_place() {
        let (_tmp, layout) = workspace();
        std::fs::write(
            layout.root().join(".gitignore"),
            "# Added by armory\n/old-entry/\n\nnode_modules/\n",
        )
        .unwrap();

        let outcome = apply_gitignore(&layout).unwrap();
        assert_eq!(outcome, GitignoreOutcome::Rewritten);

        let content = read(&layout);
        assert!(!content.contains("/old-entry/"));
        assert!(content.contains("/dev/active/"));
        assert!(content.ends_with("\nnode_modules/\n"));
    }

    #[test]
    fn section_at_end_of_file_is_replaced() {
        let (_tmp, layout) = workspace();
        std::fs::write(
            layout.root().join(".gitignore"),
            "target/\n\n# Added by armory\n/old-entry/\n",
        )
        .unwrap();

        let outcome = apply_gitignore(&layout).unwrap();
        assert_eq!(outcome, GitignoreOutcome::Rewritten);

        let content = read(&layout);
        assert!(content.starts_with("target/\n\n# Added by armory\n/dev/active/\n"));
        assert!(!content.contains("/old-entry/"));
    }
}

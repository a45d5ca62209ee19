//! Workspace skeleton creation.

use std::path::{Path, PathBuf};

use armory_config::{RuleStore, RuleTable, WorkspaceLayout};

use crate::error::Result;

/// Categories that organize agent definitions under `.claude/agents/`.
pub const AGENT_CATEGORIES: &[&str] = &["quality-control", "testing", "planning", "debugging"];

#[derive(Debug, Clone, Default)]
pub struct ScaffoldReport {
    /// Directories created this run, in creation order.
    pub created: Vec<PathBuf>,
    /// Directories that already existed.
    pub skipped: usize,
    /// Whether a fresh rule file was written.
    pub rules_initialized: bool,
}

/// Create the workspace skeleton: the content root, the assistant content
/// directories, and an initial rule file. Idempotent; existing files and
/// directories are never touched.
pub fn scaffold_workspace(layout: &WorkspaceLayout) -> Result<ScaffoldReport> {
    let mut report = ScaffoldReport::default();

    let mut dirs = vec![
        layout.content_root(),
        layout.hooks_dir(),
        layout.local_skills_dir(),
        layout.commands_dir(),
        layout.config_dir(),
    ];
    for category in AGENT_CATEGORIES {
        dirs.push(layout.agents_dir().join(category));
    }
    dirs.push(layout.dev_active_dir());
    dirs.push(layout.dev_completed_dir());

    for dir in dirs {
        ensure_dir(&dir, &mut report)?;
    }
    touch_gitkeep(&layout.dev_active_dir())?;
    touch_gitkeep(&layout.dev_completed_dir())?;

    let store = RuleStore::new(layout.rules_file());
    if !store.path().exists() {
        store.save(&RuleTable::with_default_meta())?;
        report.rules_initialized = true;
    }

    tracing::info!(
        created = report.created.len(),
        skipped = report.skipped,
        "scaffolded workspace"
    );
    Ok(report)
}

fn ensure_dir(dir: &Path, report: &mut ScaffoldReport) -> Result<()> {
    if dir.is_dir() {
        report.skipped += 1;
    } else {
        std::fs::create_dir_all(dir)?;
        report.created.push(dir.to_path_buf());
    }
    Ok(())
}

/// Keeps otherwise-empty directories under version control.
fn touch_gitkeep(dir: &Path) -> Result<()> {
    let marker = dir.join(".gitkeep");
    if !marker.exists() {
        std::fs::write(marker, "")?;
    }
    Ok(())
}

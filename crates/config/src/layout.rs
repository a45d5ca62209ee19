use std::path::{Path, PathBuf};

/// Directory external packages publish skill content into.
pub const CONTENT_ROOT: &str = ".context";
/// Directory the coding assistant reads at runtime.
pub const ASSISTANT_DIR: &str = ".claude";
/// Rule file name under `<assistant dir>/config/`.
pub const RULES_FILE: &str = "skill-rules.json";
/// Definition file that makes a directory a skill.
pub const SKILL_FILE: &str = "SKILL.md";

/// Every path the tool touches, derived from one explicit workspace root.
///
/// Nothing downstream consults the process working directory; callers decide
/// what the root is (the CLI resolves its `--workspace` argument before
/// building one of these).
#[derive(Debug, Clone)]
pub struct WorkspaceLayout {
    root: PathBuf,
}

impl WorkspaceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/.context`: package-published content, one subdir per package.
    #[must_use]
    pub fn content_root(&self) -> PathBuf {
        self.root.join(CONTENT_ROOT)
    }

    /// `<root>/.claude`
    #[must_use]
    pub fn assistant_dir(&self) -> PathBuf {
        self.root.join(ASSISTANT_DIR)
    }

    #[must_use]
    pub fn skills_dir(&self) -> PathBuf {
        self.assistant_dir().join("skills")
    }

    /// `<root>/.claude/skills/gems`: symlinks to package-provided skills.
    #[must_use]
    pub fn gem_skills_dir(&self) -> PathBuf {
        self.skills_dir().join("gems")
    }

    /// `<root>/.claude/skills/local`: project-authored skills.
    #[must_use]
    pub fn local_skills_dir(&self) -> PathBuf {
        self.skills_dir().join("local")
    }

    #[must_use]
    pub fn config_dir(&self) -> PathBuf {
        self.assistant_dir().join("config")
    }

    /// `<root>/.claude/config/skill-rules.json`
    #[must_use]
    pub fn rules_file(&self) -> PathBuf {
        self.config_dir().join(RULES_FILE)
    }

    #[must_use]
    pub fn hooks_dir(&self) -> PathBuf {
        self.assistant_dir().join("hooks")
    }

    #[must_use]
    pub fn agents_dir(&self) -> PathBuf {
        self.assistant_dir().join("agents")
    }

    #[must_use]
    pub fn commands_dir(&self) -> PathBuf {
        self.assistant_dir().join("commands")
    }

    /// `<root>/dev/active`: in-flight design docs.
    #[must_use]
    pub fn dev_active_dir(&self) -> PathBuf {
        self.root.join("dev").join("active")
    }

    /// `<root>/dev/completed`
    #[must_use]
    pub fn dev_completed_dir(&self) -> PathBuf {
        self.root.join("dev").join("completed")
    }

    /// Symlink slot for a linked skill: `<root>/.claude/skills/gems/<name>`.
    #[must_use]
    pub fn gem_link(&self, name: &str) -> PathBuf {
        self.gem_skills_dir().join(name)
    }
}

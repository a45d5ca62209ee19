//! Skill discovery under the workspace content root.
//!
//! Walks exactly two levels: `<content_root>/<package>/skills/<name>/SKILL.md`.
//! Skills that fail to parse are skipped with a warning so one bad package
//! never blocks the rest of the workspace.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use {
    armory_config::{WorkspaceLayout, layout::SKILL_FILE},
    async_trait::async_trait,
};

use crate::{
    error::{Error, Result},
    parse,
    types::{DiscoveredSkill, SkillMetadata},
};

#[async_trait]
pub trait SkillDiscoverer: Send + Sync {
    async fn discover(&self) -> Result<Vec<DiscoveredSkill>>;
}

/// Discovers skills by scanning the content root on disk.
pub struct FsSkillDiscoverer {
    content_root: PathBuf,
}

impl FsSkillDiscoverer {
    #[must_use]
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        Self {
            content_root: content_root.into(),
        }
    }

    #[must_use]
    pub fn for_layout(layout: &WorkspaceLayout) -> Self {
        Self::new(layout.content_root())
    }
}

#[async_trait]
impl SkillDiscoverer for FsSkillDiscoverer {
    /// Scan packages in lexicographic order, skipping dot-directories at
    /// both levels. A missing content root is an error; an empty one yields
    /// an empty list. Skill names collide across packages occasionally; the
    /// later package wins and the loser is logged.
    async fn discover(&self) -> Result<Vec<DiscoveredSkill>> {
        if !self.content_root.is_dir() {
            return Err(Error::content_root_missing(&self.content_root));
        }

        let mut skills: BTreeMap<String, DiscoveredSkill> = BTreeMap::new();
        for package_dir in sorted_dirs(&self.content_root) {
            let package = dir_name(&package_dir);
            let skills_dir = package_dir.join("skills");
            if !skills_dir.is_dir() {
                continue;
            }
            for skill_dir in sorted_dirs(&skills_dir) {
                let Some(metadata) = read_metadata(&skill_dir) else {
                    continue;
                };
                let name = dir_name(&skill_dir);
                let skill = DiscoveredSkill {
                    name: name.clone(),
                    package: package.clone(),
                    path: skill_dir,
                    metadata,
                };
                if let Some(previous) = skills.insert(name.clone(), skill) {
                    tracing::warn!(
                        skill = %name,
                        kept = %package,
                        shadowed = %previous.package,
                        "duplicate skill name across packages"
                    );
                }
            }
        }
        Ok(skills.into_values().collect())
    }
}

fn read_metadata(skill_dir: &Path) -> Option<SkillMetadata> {
    let skill_md = skill_dir.join(SKILL_FILE);
    if !skill_md.is_file() {
        return None;
    }
    let content = match std::fs::read_to_string(&skill_md) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(?skill_md, %e, "failed to read SKILL.md");
            return None;
        },
    };
    match parse::parse_metadata(&content) {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            tracing::warn!(?skill_dir, %e, "skipping skill with malformed front matter");
            None
        },
    }
}

fn sorted_dirs(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(?dir, %e, "failed to read directory");
            return Vec::new();
        },
    };
    let mut dirs: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();
    dirs
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn write_skill(root: &Path, package: &str, name: &str, front: &str) {
        let dir = root.join(package).join("skills").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(SKILL_FILE), format!("---\n{front}---\n# {name}\n")).unwrap();
    }

    #[tokio::test]
    async fn finds_skills_across_packages_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "pkg-b", "zeta", "type: guideline\n");
        write_skill(tmp.path(), "pkg-a", "alpha", "type: guideline\n");

        let found = FsSkillDiscoverer::new(tmp.path()).discover().await.unwrap();
        let names: Vec<_> = found.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["alpha", "zeta"]);
        assert_eq!(found[0].package, "pkg-a");
        assert_eq!(found[0].path, tmp.path().join("pkg-a/skills/alpha"));
    }

    #[tokio::test]
    async fn missing_content_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = FsSkillDiscoverer::new(tmp.path().join("absent"))
            .discover()
            .await;
        assert!(matches!(result, Err(Error::ContentRootMissing { .. })));
    }

    #[tokio::test]
    async fn empty_content_root_finds_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let found = FsSkillDiscoverer::new(tmp.path()).discover().await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn package_without_skills_dir_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("docs-only/guides")).unwrap();
        write_skill(tmp.path(), "pkg-a", "alpha", "type: guideline\n");

        let found = FsSkillDiscoverer::new(tmp.path()).discover().await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn malformed_front_matter_skips_only_that_skill() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "pkg-a", "good", "type: guideline\n");
        let bad = tmp.path().join("pkg-a/skills/bad");
        std::fs::create_dir_all(&bad).unwrap();
        std::fs::write(bad.join(SKILL_FILE), "---\nenforcement: [not, a, string]\n---\n").unwrap();

        let found = FsSkillDiscoverer::new(tmp.path()).discover().await.unwrap();
        let names: Vec<_> = found.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["good"]);
    }

    #[tokio::test]
    async fn skill_dir_without_definition_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "pkg-a", "alpha", "type: guideline\n");
        std::fs::create_dir_all(tmp.path().join("pkg-a/skills/empty")).unwrap();

        let found = FsSkillDiscoverer::new(tmp.path()).discover().await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn dot_directories_are_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "pkg-a", "alpha", "type: guideline\n");
        write_skill(tmp.path(), ".git", "objects", "type: guideline\n");
        write_skill(tmp.path(), "pkg-a", ".draft", "type: guideline\n");

        let found = FsSkillDiscoverer::new(tmp.path()).discover().await.unwrap();
        let names: Vec<_> = found.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["alpha"]);
    }

    #[tokio::test]
    async fn duplicate_name_keeps_later_package() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "pkg-a", "shared", "type: guideline\n");
        write_skill(tmp.path(), "pkg-b", "shared", "type: reference\n");

        let found = FsSkillDiscoverer::new(tmp.path()).discover().await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].package, "pkg-b");
        assert_eq!(found[0].metadata.skill_type.as_deref(), Some("reference"));
    }

    #[tokio::test]
    async fn metadata_fields_flow_through() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(
            tmp.path(),
            "pkg-a",
            "alpha",
            "type: guideline\nenforcement: block\npriority: critical\nkeywords: [api]\n",
        );

        let found = FsSkillDiscoverer::new(tmp.path()).discover().await.unwrap();
        let meta = &found[0].metadata;
        assert_eq!(meta.enforcement, Some(armory_config::Enforcement::Block));
        assert_eq!(meta.priority, Some(armory_config::Priority::Critical));
        assert_eq!(meta.keywords, ["api"]);
    }
}

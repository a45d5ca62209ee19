//! Linking discovered skills into the assistant directory.
//!
//! Each skill gets a relative symlink under `.claude/skills/gems/` plus an
//! activation entry in the workspace rule file. Both sides are idempotent:
//! re-running refreshes stale links and linked rules, leaves everything
//! project-owned alone, and never follows a slot occupied by a real file.

use std::{io::ErrorKind, path::Path};

use armory_config::{MergeOutcome, RuleStore, WorkspaceLayout};

use crate::{
    discover::{FsSkillDiscoverer, SkillDiscoverer},
    error::Result,
    relpath,
    types::DiscoveredSkill,
};

/// What happened to a skill's symlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    /// No link existed; one was created.
    Linked,
    /// The link already pointed at the right target.
    AlreadyLinked,
    /// The link pointed elsewhere and was recreated.
    Relinked,
    /// The slot holds a real file or directory; nothing was touched.
    SkippedConflict,
}

/// What happened to a skill's rule entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStatus {
    Merged,
    KeptProjectRule,
}

#[derive(Debug, Clone)]
pub struct LinkOutcome {
    pub name: String,
    pub package: String,
    pub link: LinkStatus,
    /// `None` when the link was skipped, so no rule was written either.
    pub rule: Option<RuleStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    pub outcomes: Vec<LinkOutcome>,
}

impl LinkReport {
    /// Links created or repointed this run.
    #[must_use]
    pub fn linked(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.link, LinkStatus::Linked | LinkStatus::Relinked))
            .count()
    }

    #[must_use]
    pub fn unchanged(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.link == LinkStatus::AlreadyLinked)
            .count()
    }

    #[must_use]
    pub fn conflicts(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.link == LinkStatus::SkippedConflict)
            .count()
    }

    #[must_use]
    pub fn merged(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.rule == Some(RuleStatus::Merged))
            .count()
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnlinkReport {
    pub links_removed: Vec<String>,
    pub rules_removed: Vec<String>,
}

/// Links and unlinks package skills for one workspace.
pub struct SkillLinker {
    layout: WorkspaceLayout,
}

impl SkillLinker {
    #[must_use]
    pub fn new(layout: WorkspaceLayout) -> Self {
        Self { layout }
    }

    /// Discover skills under the content root and link each one.
    ///
    /// Fails only when the content root itself is missing. No skills at all
    /// is a successful no-op that touches nothing on disk.
    pub async fn link(&self) -> Result<LinkReport> {
        let skills = FsSkillDiscoverer::for_layout(&self.layout)
            .discover()
            .await?;
        if skills.is_empty() {
            return Ok(LinkReport::default());
        }

        let gems_dir = self.layout.gem_skills_dir();
        tokio::fs::create_dir_all(&gems_dir).await?;

        let store = RuleStore::new(self.layout.rules_file());
        let mut table = store.load()?;

        let mut outcomes = Vec::with_capacity(skills.len());
        for skill in &skills {
            let status = ensure_link(&gems_dir, skill).await?;
            let rule = if status == LinkStatus::SkippedConflict {
                None
            } else {
                let entry = skill.metadata.to_rule_entry(&skill.package);
                Some(match table.merge(&skill.name, &entry)? {
                    MergeOutcome::Merged => RuleStatus::Merged,
                    MergeOutcome::KeptProjectRule => RuleStatus::KeptProjectRule,
                })
            };
            outcomes.push(LinkOutcome {
                name: skill.name.clone(),
                package: skill.package.clone(),
                link: status,
                rule,
            });
        }
        store.save(&table)?;

        let report = LinkReport { outcomes };
        tracing::info!(
            linked = report.linked(),
            unchanged = report.unchanged(),
            conflicts = report.conflicts(),
            "linked package skills"
        );
        Ok(report)
    }

    /// Remove every linked skill: symlinks under gems/ and their rule
    /// entries. Project-owned rules and non-symlink slots are left alone,
    /// so unlinking a clean or half-dismantled workspace still succeeds.
    pub async fn unlink(&self) -> Result<UnlinkReport> {
        let store = RuleStore::new(self.layout.rules_file());
        let mut table = store.load()?;
        let linked = table.linked_names();
        if linked.is_empty() {
            return Ok(UnlinkReport::default());
        }

        let mut links_removed = Vec::new();
        for name in &linked {
            let link = self.layout.gem_link(name);
            match tokio::fs::symlink_metadata(&link).await {
                Ok(meta) if meta.file_type().is_symlink() => {
                    tokio::fs::remove_file(&link).await?;
                    links_removed.push(name.clone());
                },
                Ok(_) => {
                    tracing::warn!(
                        skill = %name,
                        path = %link.display(),
                        "not a symlink; leaving in place"
                    );
                },
                Err(_) => {},
            }
        }

        table.unmerge(&linked);
        store.save(&table)?;

        tracing::info!(
            links = links_removed.len(),
            rules = linked.len(),
            "unlinked package skills"
        );
        Ok(UnlinkReport {
            links_removed,
            rules_removed: linked,
        })
    }
}

/// Bring one symlink slot up to date without disturbing anything that is
/// not ours: a real file or directory in the slot wins.
async fn ensure_link(gems_dir: &Path, skill: &DiscoveredSkill) -> Result<LinkStatus> {
    let link_path = gems_dir.join(&skill.name);
    let target = relpath::relative_from(gems_dir, &skill.path);

    match tokio::fs::symlink_metadata(&link_path).await {
        Err(e) if e.kind() == ErrorKind::NotFound => {
            symlink_dir(&target, &link_path).await?;
            Ok(LinkStatus::Linked)
        },
        Err(e) => Err(e.into()),
        Ok(meta) if meta.file_type().is_symlink() => {
            if tokio::fs::read_link(&link_path).await? == target {
                Ok(LinkStatus::AlreadyLinked)
            } else {
                tokio::fs::remove_file(&link_path).await?;
                symlink_dir(&target, &link_path).await?;
                Ok(LinkStatus::Relinked)
            }
        },
        Ok(_) => {
            tracing::warn!(
                skill = %skill.name,
                path = %link_path.display(),
                "slot occupied by a non-symlink; skipping"
            );
            Ok(LinkStatus::SkippedConflict)
        },
    }
}

#[cfg(unix)]
async fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    tokio::fs::symlink(target, link).await
}

#[cfg(windows)]
async fn symlink_dir(target: &Path, link: &Path) -> std::io::Result<()> {
    tokio::fs::symlink_dir(target, link).await
}

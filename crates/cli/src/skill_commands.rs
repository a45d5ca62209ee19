//! Skill linking subcommands.

use {
    armory_config::{RuleStore, WorkspaceLayout},
    armory_skills::{
        Error, FsSkillDiscoverer, LinkStatus, RuleStatus, SkillDiscoverer, SkillLinker,
    },
};

pub async fn handle_link(layout: &WorkspaceLayout) -> anyhow::Result<()> {
    let report = SkillLinker::new(layout.clone()).link().await?;
    if report.outcomes.is_empty() {
        println!(
            "No package skills found under {}.",
            layout.content_root().display()
        );
        return Ok(());
    }

    for outcome in &report.outcomes {
        let status = match outcome.link {
            LinkStatus::Linked => "linked",
            LinkStatus::AlreadyLinked => "up to date",
            LinkStatus::Relinked => "re-linked",
            LinkStatus::SkippedConflict => "skipped (slot occupied)",
        };
        let rule = match outcome.rule {
            Some(RuleStatus::Merged) => "rule merged",
            Some(RuleStatus::KeptProjectRule) => "project rule kept",
            None => "rule untouched",
        };
        println!("  {} ({}) — {status}, {rule}", outcome.name, outcome.package);
    }
    println!(
        "{} linked, {} unchanged, {} conflicts; {} rules merged",
        report.linked(),
        report.unchanged(),
        report.conflicts(),
        report.merged()
    );
    Ok(())
}

pub async fn handle_unlink(layout: &WorkspaceLayout) -> anyhow::Result<()> {
    let report = SkillLinker::new(layout.clone()).unlink().await?;
    if report.rules_removed.is_empty() {
        println!("Nothing linked.");
        return Ok(());
    }
    for name in &report.links_removed {
        println!("  removed {name}");
    }
    println!(
        "{} links removed, {} rules removed",
        report.links_removed.len(),
        report.rules_removed.len()
    );
    Ok(())
}

pub async fn handle_list(layout: &WorkspaceLayout) -> anyhow::Result<()> {
    let skills = match FsSkillDiscoverer::for_layout(layout).discover().await {
        Ok(skills) => skills,
        Err(Error::ContentRootMissing { path }) => {
            println!("No content root at {}; run setup first.", path.display());
            return Ok(());
        },
        Err(e) => return Err(e.into()),
    };
    if skills.is_empty() {
        println!("No skills found.");
        return Ok(());
    }

    let table = RuleStore::new(layout.rules_file()).load()?;
    for skill in &skills {
        let has_link = std::fs::symlink_metadata(layout.gem_link(&skill.name))
            .is_ok_and(|meta| meta.file_type().is_symlink());
        let link_state = if has_link { "linked" } else { "not linked" };
        let rule_state = if table.is_linked(&skill.name) {
            "rule merged"
        } else if table.contains(&skill.name) {
            "project rule"
        } else {
            "no rule"
        };
        println!(
            "  {} [{}] — {}, {}",
            skill.name, skill.package, link_state, rule_state
        );
    }
    Ok(())
}

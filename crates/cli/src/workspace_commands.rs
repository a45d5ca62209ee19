//! Workspace provisioning subcommands.

use std::path::Path;

use {
    armory_config::{Severity, WorkspaceLayout, validate_workspace},
    armory_setup::{GitignoreOutcome, apply_gitignore, scaffold_workspace},
};

pub fn handle_setup(layout: &WorkspaceLayout) -> anyhow::Result<()> {
    let report = scaffold_workspace(layout)?;
    if report.created.is_empty() && !report.rules_initialized {
        println!("Workspace already provisioned.");
        return Ok(());
    }
    for dir in &report.created {
        println!("  created {}", display_relative(layout, dir));
    }
    if report.rules_initialized {
        println!(
            "  initialized {}",
            display_relative(layout, &layout.rules_file())
        );
    }
    Ok(())
}

pub async fn handle_install(layout: &WorkspaceLayout) -> anyhow::Result<()> {
    handle_setup(layout)?;
    crate::skill_commands::handle_link(layout).await?;
    handle_gitignore(layout)
}

pub fn handle_validate(layout: &WorkspaceLayout) -> anyhow::Result<()> {
    let result = validate_workspace(layout);
    for d in &result.diagnostics {
        println!("{}: [{}] {}: {}", d.severity, d.category, d.path, d.message);
    }
    println!(
        "{} errors, {} warnings",
        result.count(Severity::Error),
        result.count(Severity::Warning)
    );
    if result.has_errors() {
        anyhow::bail!("validation failed");
    }
    Ok(())
}

pub fn handle_gitignore(layout: &WorkspaceLayout) -> anyhow::Result<()> {
    let verb = match apply_gitignore(layout)? {
        GitignoreOutcome::Created => "created",
        GitignoreOutcome::Appended => "appended to",
        GitignoreOutcome::Rewritten => "refreshed in",
        GitignoreOutcome::Unchanged => "already current in",
    };
    println!("Managed section {verb} .gitignore");
    Ok(())
}

fn display_relative(layout: &WorkspaceLayout, path: &Path) -> String {
    path.strip_prefix(layout.root())
        .unwrap_or(path)
        .display()
        .to_string()
}

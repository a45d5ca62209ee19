mod skill_commands;
mod workspace_commands;

use std::path::PathBuf;

use {
    armory_config::WorkspaceLayout,
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(
    name = "armory",
    about = "Armory — convention-based workspace provisioning for AI coding assistants"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Workspace root to operate on.
    #[arg(long, global = true, env = "ARMORY_WORKSPACE", default_value = ".")]
    workspace: PathBuf,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the workspace skeleton.
    Setup,
    /// Full provision: setup, link skills, refresh .gitignore.
    Install,
    /// Link package skills and merge their activation rules.
    Link,
    /// Remove linked skills and their activation rules.
    Unlink,
    /// List discovered skills and their link state.
    List,
    /// Check the workspace against its conventions.
    Validate,
    /// Refresh the managed .gitignore section.
    Gitignore,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Resolve the workspace argument against the current directory so layout
/// paths stay absolute even when invoked as `armory --workspace .`.
fn workspace_layout(cli: &Cli) -> anyhow::Result<WorkspaceLayout> {
    let root = if cli.workspace.is_absolute() {
        cli.workspace.clone()
    } else {
        std::env::current_dir()?.join(&cli.workspace)
    };
    Ok(WorkspaceLayout::new(root))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "armory starting");

    let layout = workspace_layout(&cli)?;
    match cli.command {
        Commands::Setup => workspace_commands::handle_setup(&layout),
        Commands::Install => workspace_commands::handle_install(&layout).await,
        Commands::Link => skill_commands::handle_link(&layout).await,
        Commands::Unlink => skill_commands::handle_unlink(&layout).await,
        Commands::List => skill_commands::handle_list(&layout).await,
        Commands::Validate => workspace_commands::handle_validate(&layout),
        Commands::Gitignore => workspace_commands::handle_gitignore(&layout),
    }
}

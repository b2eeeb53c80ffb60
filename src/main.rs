use anyhow::Result;
use clap::Parser;

use doctree::cli::{Cli, Commands};
use doctree::config::{resolve_data_dir, Config};
use doctree::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Usage errors exit here, before anything touches the filesystem
    let cli = Cli::parse();

    let data_dir = resolve_data_dir(cli.command.data_dir())?;
    let config = Config::load(&data_dir)?;

    // The guard MUST be held until program exit to ensure logs are flushed
    let _logging_guard = init_logging(&config.logging, &data_dir, cli.verbose)?;

    tracing::debug!("Using data directory {}", data_dir.display());

    match cli.command {
        Commands::Add { path, project, .. } => {
            doctree::commands::add::run(&path, project, &data_dir, &config).await?;
        }
        Commands::List { .. } => {
            doctree::commands::list::run(&data_dir)?;
        }
        Commands::Fingerprint {
            path,
            include_mtime,
            ..
        } => {
            doctree::commands::fingerprint::run(&path, include_mtime, &config).await?;
        }
    }

    Ok(())
}

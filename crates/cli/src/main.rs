use std::{process::ExitCode, sync::Arc};

use engine::{Engine, JsonFileRepository};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;
mod render;

/// Arguments are checked before the file is read, so a missing subcommand never
/// touches the store. Both a missing subcommand and a file that cannot be
/// loaded exit with status 1.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = args::parse();
    let Some(command) = cli.command else {
        println!("expected 'add' or 'list' subcommands");
        return ExitCode::FAILURE;
    };

    let repo = match JsonFileRepository::open(&cli.file).await {
        Ok(repo) => repo,
        Err(err) => {
            println!("Error loading data: {err}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(path = %repo.path().display(), "expense file loaded");

    let engine = match Engine::builder().repository(Arc::new(repo)).build() {
        Ok(engine) => engine,
        Err(err) => {
            println!("Error loading data: {err}");
            return ExitCode::FAILURE;
        }
    };
    let mut stdout = std::io::stdout().lock();
    if let Err(err) = commands::run(&engine, command, &CancellationToken::new(), &mut stdout).await
    {
        tracing::error!("failed to write output: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

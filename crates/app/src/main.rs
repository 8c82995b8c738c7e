use std::{sync::Arc, time::Duration};

use engine::{Engine, SqlRepository};
use migration::{Migrator, MigratorTrait};
use server::ServerState;
use settings::Database;
use tokio_util::sync::CancellationToken;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expense_tracker={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;
    tracing::info!("database ready");

    let engine = Engine::builder()
        .repository(Arc::new(SqlRepository::new(db)))
        .build()?;
    let shutdown = CancellationToken::new();
    let state = ServerState::new(engine)
        .with_shutdown(shutdown.clone())
        .with_request_timeout(settings.server.request_timeout_secs.map(Duration::from_secs));

    let addr = format!("{}:{}", settings.server.bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for shutdown signal: {err}");
            return;
        }
        tracing::info!("shutting down...");
        shutdown.cancel();
    });

    server::run_with_listener(state, listener).await?;
    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use movie_catalog::{AppState, config::Config, db, populate::CsvSeeder};
use sea_orm::DatabaseConnection;
use tracing::info;

#[derive(Parser)]
#[command(name = "movie-catalog", version, about = "Read-only movie catalog API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the catalog over HTTP (default)
    Serve,

    /// Load the movie CSV into an empty catalog
    Populate {
        /// CSV file to load instead of MOVIES_CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movie_catalog=debug,sqlx=warn".to_string()),
        )
        .init();

    let cli = Cli::parse();
    let config = Arc::new(Config::from_env()?);

    let db = db::connect_and_init(&config.database_url).await?;

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, db.clone()).await,
        Command::Populate { csv } => {
            let path = csv.unwrap_or_else(|| config.movies_csv.clone());
            populate(&db, &path).await
        },
    };

    db.close().await?;
    result
}

async fn serve(config: Arc<Config>, db: DatabaseConnection) -> anyhow::Result<()> {
    let app = movie_catalog::router(AppState::new(config.clone(), db));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, catalog = %config.catalog_path(), "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    info!("shut down");
    Ok(())
}

async fn populate(db: &DatabaseConnection, path: &std::path::Path) -> anyhow::Result<()> {
    let seeder = CsvSeeder::new(db);

    if seeder.is_populated().await? {
        info!("database is already populated, skipping seeding");
        return Ok(());
    }

    let inserted = seeder.seed_file(path).await?;
    info!(inserted, path = %path.display(), "database seeding completed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
    }
}

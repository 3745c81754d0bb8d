use std::{net::SocketAddr, path::PathBuf};

use anyhow::Context;

/// Mount point of the catalog below the API version prefix. Pagination links
/// are expressed relative to the version prefix, so they start here.
pub const CATALOG_MOUNT: &str = "/theater";

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    pub api_prefix: String,
    pub movies_csv: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 =
            std::env::var("PORT").unwrap_or_else(|_| "8000".to_string()).parse().context("PORT")?;

        let testing = std::env::var("ENVIRONMENT").is_ok_and(|env| env == "testing");
        let default_db = if testing { "sqlite::memory:" } else { "sqlite://movies.db?mode=rwc" };
        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| default_db.to_string());

        let api_prefix = std::env::var("API_PREFIX").unwrap_or_else(|_| "/api/v1".to_string());

        let movies_csv = std::env::var("MOVIES_CSV")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("seed_data/imdb_movies.csv"));

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            api_prefix,
            movies_csv,
        })
    }

    /// In-memory configuration used by tests and throwaway runs.
    pub fn in_memory() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            database_url: "sqlite::memory:".to_string(),
            api_prefix: "/api/v1".to_string(),
            movies_csv: PathBuf::from("seed_data/imdb_movies.csv"),
        }
    }

    /// Full path the catalog router is nested under, e.g. `/api/v1/theater`.
    pub fn catalog_path(&self) -> String {
        format!("{}{CATALOG_MOUNT}", self.api_prefix.trim_end_matches('/'))
    }
}

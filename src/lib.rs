pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod models;
pub mod populate;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{catalog::Catalog, config::Config};

pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(config: Arc<Config>, db: sea_orm::DatabaseConnection) -> Arc<Self> {
        Arc::new(Self { config, catalog: Catalog::new(db) })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let catalog_path = state.config.catalog_path();

    Router::new()
        .nest(&catalog_path, routes::movie_routes())
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

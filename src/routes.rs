use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    routing::get,
};
use tracing::debug;

use crate::{
    AppState,
    entities::movies,
    error::{AppError, AppResult, FieldError},
    models::{ListQuery, PageRequest, PageResult, is_digits},
};

pub const NO_MOVIES: &str = "No movies found.";
pub const MOVIE_NOT_FOUND: &str = "Movie with the given ID was not found.";

/// Catalog routes, relative to the catalog mount point.
pub fn movie_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(list_movies))
        .route("/movies/", get(list_movies))
        .route("/movies/{movie_id}", get(get_movie))
        .route("/movies/{movie_id}/", get(get_movie))
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> AppResult<Json<PageResult>> {
    let Query(query) = query.map_err(|rejection| {
        AppError::Validation(vec![FieldError::query_parsing(rejection.body_text())])
    })?;
    let req = PageRequest::from_query(&query)?;

    debug!(page = req.page, per_page = req.per_page, "listing movies");

    state.catalog.list_page(req).await?.map(Json).ok_or(AppError::NotFound(NO_MOVIES))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<movies::Model>> {
    let movie_id = parse_movie_id(&raw_id)?;

    state.catalog.get(movie_id).await?.map(Json).ok_or(AppError::NotFound(MOVIE_NOT_FOUND))
}

fn parse_movie_id(raw: &str) -> AppResult<i64> {
    let trimmed = raw.trim();
    match trimmed.parse() {
        Ok(id) => Ok(id),
        // Wider than 64 bits but still an integer: no row can carry it.
        Err(_) if is_digits(trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed)) => Ok(i64::MAX),
        Err(_) => {
            Err(AppError::Validation(vec![FieldError::int_parsing("path", "movie_id", raw)]))
        },
    }
}

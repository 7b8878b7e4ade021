//! Movie listing handlers
//!
//! Every route here sits behind the session-presence middleware.

use crate::auth::require_session;
use crate::error::AppError;
use crate::movies::{Movie, MOVIE_LIST_LIMIT};
use crate::state::AppState;
use axum::{extract::State, middleware, response::Json, routing::get, Router};

/// Routes mounted under `/api/movies`
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_movies))
        .route("/new", get(new_movie))
        .route_layer(middleware::from_fn_with_state(state, require_session))
}

// GET /api/movies - List up to MOVIE_LIST_LIMIT movies
pub async fn list_movies(State(state): State<AppState>) -> Result<Json<Vec<Movie>>, AppError> {
    let movies = state.movies.list_movies(MOVIE_LIST_LIMIT).await?;
    tracing::debug!(count = movies.len(), "Listed movies");
    Ok(Json(movies))
}

// GET /api/movies/new - Placeholder
pub async fn new_movie() -> &'static str {
    "Not ready yet"
}

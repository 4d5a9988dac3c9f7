pub mod movie;
pub mod search;

use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::models::Movie;
use crate::render::STYLESHEET;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(search::index))
        .route("/search", get(search::search))
        .route("/movie/{id}", get(movie::movie_detail))
        .route("/style.css", get(stylesheet))
        .with_state(state)
}

async fn stylesheet() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], STYLESHEET)
}

/// Log a failed query and degrade to an empty result set. The flag tells
/// the page to show an "unavailable" notice instead of "no matches".
fn or_degraded(result: anyhow::Result<Vec<Movie>>, what: &str) -> (Vec<Movie>, bool) {
    match result {
        Ok(movies) => (movies, false),
        Err(e) => {
            tracing::error!("{what} failed: {e:#}");
            (Vec::new(), true)
        }
    }
}

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use tera::Context;

use crate::api::or_degraded;
use crate::models::{Movie, SearchMode, SearchParams};
use crate::render::render_template;
use crate::search::movies;
use crate::state::AppState;

/// GET / - Empty search form
pub async fn index(State(state): State<AppState>) -> Response {
    let empty: Vec<Movie> = Vec::new();
    let mut context = Context::new();
    context.insert("movies", &empty);
    context.insert("searched_data", "");
    context.insert("mode", "semantic");
    context.insert("searched", &false);
    context.insert("degraded", &false);
    render_template(&state.templates, "search.html", &context, StatusCode::OK)
}

/// GET /search - Filter or semantic search (keyword and hybrid via `mode`)
pub async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let text = params.text();
    let mode = params.resolved_mode();
    let client = &state.http_client;
    let weaviate = &state.config.weaviate;

    let result = match mode {
        SearchMode::Filter => {
            movies::filtered_search(client, weaviate, &text, state.config.filter_result_limit).await
        }
        SearchMode::Semantic => {
            movies::semantic_search(client, weaviate, &text, state.config.result_limit).await
        }
        SearchMode::Keyword => {
            movies::keyword_search(client, weaviate, &text, state.config.result_limit).await
        }
        SearchMode::Hybrid => {
            let alpha = params.alpha_or(movies::DEFAULT_HYBRID_ALPHA);
            movies::hybrid_search(client, weaviate, &text, state.config.result_limit, alpha).await
        }
    };
    let (results, degraded) = or_degraded(result, "Movie search");
    tracing::debug!("{mode:?} search for {text:?} returned {} movies", results.len());

    let mut context = Context::new();
    context.insert("movies", &results);
    context.insert("searched_data", &text);
    context.insert("mode", &mode);
    context.insert("searched", &true);
    context.insert("degraded", &degraded);
    render_template(&state.templates, "search.html", &context, StatusCode::OK)
}

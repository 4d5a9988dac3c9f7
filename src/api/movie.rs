use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use tera::Context;

use crate::api::or_degraded;
use crate::models::Movie;
use crate::render::render_template;
use crate::search::movies;
use crate::state::AppState;

/// GET /movie/{id} - Movie detail plus similar movies
///
/// The recommendation query is seeded with the object id of the record just
/// fetched, so the two calls run sequentially. The seed itself is dropped
/// from the similar list.
pub async fn movie_detail(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let client = &state.http_client;
    let weaviate = &state.config.weaviate;
    let limit = state.config.result_limit;

    let mut context = Context::new();
    context.insert("movie_id", &raw_id);
    context.insert("searched_data", "");
    context.insert("mode", "semantic");

    // Non-numeric ids can never match, so they share the not-found page
    let lookup = match raw_id.trim().parse::<i64>() {
        Ok(movie_id) => movies::get_movie_by_id(client, weaviate, movie_id)
            .await
            .map(|movie| movie.map(|m| (movie_id, m))),
        Err(_) => Ok(None),
    };

    let (movie_id, movie) = match lookup {
        Ok(Some(found)) => found,
        Ok(None) => {
            tracing::info!("Movie {raw_id} not found");
            insert_detail(&mut context, None, &[], false, true);
            return render_template(
                &state.templates,
                "movie_info.html",
                &context,
                StatusCode::NOT_FOUND,
            );
        }
        Err(e) => {
            tracing::error!("Movie lookup for {raw_id} failed: {e:#}");
            insert_detail(&mut context, None, &[], true, false);
            return render_template(&state.templates, "movie_info.html", &context, StatusCode::OK);
        }
    };

    let (related, degraded) = match movie.object_id() {
        Some(object_id) => or_degraded(
            movies::get_recommendations(client, weaviate, object_id, limit).await,
            "Recommendations",
        ),
        None => {
            tracing::warn!("Movie {movie_id} came back without an object id");
            (Vec::new(), false)
        }
    };
    let related = exclude_seed(related, movie_id, limit);

    insert_detail(&mut context, Some(&movie), &related, degraded, false);
    render_template(&state.templates, "movie_info.html", &context, StatusCode::OK)
}

/// Drop the seed movie from its own recommendations and cap the list.
pub fn exclude_seed(related: Vec<Movie>, movie_id: i64, limit: usize) -> Vec<Movie> {
    related
        .into_iter()
        .filter(|m| m.movie_id != Some(movie_id))
        .take(limit)
        .collect()
}

fn insert_detail(
    context: &mut Context,
    movie: Option<&Movie>,
    related: &[Movie],
    degraded: bool,
    not_found: bool,
) {
    context.insert("movie", &movie);
    context.insert("related_movies", related);
    context.insert("degraded", &degraded);
    context.insert("not_found", &not_found);
}

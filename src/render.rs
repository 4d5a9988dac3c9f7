//! Server-side HTML rendering with templates embedded in the binary.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tera::{Context, Tera};

const TPL_BASE: &str = include_str!("templates/base.html");
const TPL_CARD: &str = include_str!("templates/card.html");
const TPL_SEARCH: &str = include_str!("templates/search.html");
const TPL_MOVIE_INFO: &str = include_str!("templates/movie_info.html");

pub const STYLESHEET: &str = include_str!("templates/style.css");

/// Tera instance holding every page template.
pub fn templates() -> anyhow::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", TPL_BASE),
        ("card.html", TPL_CARD),
        ("search.html", TPL_SEARCH),
        ("movie_info.html", TPL_MOVIE_INFO),
    ])?;
    Ok(tera)
}

pub fn render_template(tera: &Tera, name: &str, context: &Context, status: StatusCode) -> Response {
    match tera.render(name, context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            tracing::error!("Template error in {name}: {err:?}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {err}"),
            )
                .into_response()
        }
    }
}

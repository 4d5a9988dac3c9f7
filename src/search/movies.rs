//! Movie queries against the Weaviate class.
//!
//! Every function issues exactly one GraphQL request and returns the raw
//! records in the order the service ranked them. Empty search text means
//! "browse everything" rather than "match nothing".

use anyhow::Result;
use uuid::Uuid;

use crate::config::WeaviateConfig;
use crate::models::Movie;
use crate::search::client::get_objects;
use crate::search::graphql::{Filter, GetQuery};

/// Fields shown on a search result card.
pub const LIST_FIELDS: &[&str] = &["title", "poster_link", "genres", "year", "director", "movie_id"];

/// Fields of the detail page, including the object id used for recommendations.
pub const DETAIL_FIELDS: &[&str] = &[
    "title",
    "poster_link",
    "description",
    "year",
    "director",
    "actors",
    "genres",
    "keywords",
    "movie_id",
    "_additional { id certainty }",
];

pub const RECOMMENDATION_FIELDS: &[&str] = &["title", "genres", "year", "poster_link", "movie_id"];

/// BM25 properties; the title match counts triple.
pub const BM25_PROPERTIES: &[&str] = &[
    "title^3",
    "director",
    "genres",
    "actors",
    "keywords",
    "description",
    "plot",
];

/// Properties OR-matched by the wildcard filter search.
pub const FILTER_PROPERTIES: &[&str] = &["title", "director", "genres", "keywords", "actors"];

/// BM25 needs a term; an empty search falls back to this one.
pub const DEFAULT_KEYWORD_QUERY: &str = "Movie";

pub const DEFAULT_HYBRID_ALPHA: f32 = 0.5;

/// BM25 keyword search ranked by relevance score.
pub async fn keyword_search(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    text: &str,
    limit: usize,
) -> Result<Vec<Movie>> {
    let term = if text.trim().is_empty() {
        DEFAULT_KEYWORD_QUERY
    } else {
        text
    };
    let query = GetQuery::new(&config.class_name)
        .fields(LIST_FIELDS)
        .bm25(term, BM25_PROPERTIES)
        .limit(limit);
    get_objects(client, config, &query).await
}

/// Substring match of `text` on any of [`FILTER_PROPERTIES`].
pub async fn filtered_search(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    text: &str,
    limit: usize,
) -> Result<Vec<Movie>> {
    let query = GetQuery::new(&config.class_name)
        .fields(LIST_FIELDS)
        .where_filter(substring_filter(text))
        .limit(limit);
    get_objects(client, config, &query).await
}

/// Nearest neighbours of the text's embedding; empty text lists records
/// in the service's default order.
pub async fn semantic_search(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    text: &str,
    limit: usize,
) -> Result<Vec<Movie>> {
    let mut query = GetQuery::new(&config.class_name).fields(LIST_FIELDS);
    if !text.trim().is_empty() {
        query = query.near_text(&[text]);
    }
    get_objects(client, config, &query.limit(limit)).await
}

/// Blend of BM25 and vector scores. `alpha` is clamped to `[0, 1]`.
pub async fn hybrid_search(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    text: &str,
    limit: usize,
    alpha: f32,
) -> Result<Vec<Movie>> {
    let mut query = GetQuery::new(&config.class_name).fields(LIST_FIELDS);
    if !text.trim().is_empty() {
        let alpha = if alpha.is_nan() {
            DEFAULT_HYBRID_ALPHA
        } else {
            alpha.clamp(0.0, 1.0)
        };
        query = query.hybrid(text, alpha);
    }
    get_objects(client, config, &query.limit(limit)).await
}

/// All records whose `movie_id` equals `movie_id`.
pub async fn find_movies_by_id(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    movie_id: i64,
) -> Result<Vec<Movie>> {
    let query = GetQuery::new(&config.class_name)
        .fields(DETAIL_FIELDS)
        .where_filter(Filter::EqualNumber {
            path: "movie_id".to_string(),
            value: movie_id as f64,
        });
    get_objects(client, config, &query).await
}

/// The detail record for `movie_id`, or `None` when no object matches.
pub async fn get_movie_by_id(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    movie_id: i64,
) -> Result<Option<Movie>> {
    let movies = find_movies_by_id(client, config, movie_id).await?;
    if movies.len() > 1 {
        tracing::warn!("{} objects share movie_id {movie_id}", movies.len());
    }
    Ok(movies.into_iter().next())
}

/// Movies closest to the object `object_id`. Asks for `limit + 1` records
/// because the seed object is normally its own nearest neighbour.
pub async fn get_recommendations(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    object_id: Uuid,
    limit: usize,
) -> Result<Vec<Movie>> {
    let query = GetQuery::new(&config.class_name)
        .fields(RECOMMENDATION_FIELDS)
        .near_object(object_id)
        .limit(limit.saturating_add(1));
    get_objects(client, config, &query).await
}

/// `*text*` on every filter property; empty text becomes the match-all `*`.
/// `*` and `?` in the text are `Like` wildcards and are removed, so the
/// text always matches literally as a substring.
pub fn substring_filter(text: &str) -> Filter {
    let text: String = text.chars().filter(|c| !matches!(c, '*' | '?')).collect();
    let text = text.trim();
    let pattern = if text.is_empty() {
        "*".to_string()
    } else {
        format!("*{text}*")
    };
    Filter::Or(
        FILTER_PROPERTIES
            .iter()
            .map(|path| Filter::Like {
                path: path.to_string(),
                pattern: pattern.clone(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn config_for(server: &mockito::ServerGuard) -> WeaviateConfig {
        WeaviateConfig {
            url: server.url(),
            api_key: None,
            openai_api_key: None,
            class_name: "Movies".to_string(),
        }
    }

    fn movies_body(titles: &[&str]) -> String {
        let movies: Vec<serde_json::Value> = titles
            .iter()
            .enumerate()
            .map(|(i, t)| serde_json::json!({"title": t, "movie_id": (i + 1) as f64}))
            .collect();
        serde_json::json!({"data": {"Get": {"Movies": movies}}}).to_string()
    }

    #[test]
    fn test_substring_filter_covers_five_fields() {
        match substring_filter("batman") {
            Filter::Or(operands) => {
                assert_eq!(operands.len(), 5);
                assert!(operands.iter().all(|f| matches!(
                    f,
                    Filter::Like { pattern, .. } if pattern == "*batman*"
                )));
            }
            other => panic!("expected Or filter, got {other:?}"),
        }
    }

    #[test]
    fn test_substring_filter_empty_matches_all() {
        match substring_filter("  ") {
            Filter::Or(operands) => assert!(operands
                .iter()
                .all(|f| matches!(f, Filter::Like { pattern, .. } if pattern == "*"))),
            other => panic!("expected Or filter, got {other:?}"),
        }
    }

    #[test]
    fn test_substring_filter_strips_wildcards() {
        match substring_filter("bat*man?") {
            Filter::Or(operands) => assert!(operands
                .iter()
                .all(|f| matches!(f, Filter::Like { pattern, .. } if pattern == "*batman*"))),
            other => panic!("expected Or filter, got {other:?}"),
        }
        match substring_filter(" ** ") {
            Filter::Or(operands) => assert!(operands
                .iter()
                .all(|f| matches!(f, Filter::Like { pattern, .. } if pattern == "*"))),
            other => panic!("expected Or filter, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_filtered_search_sends_like_filter_and_limit() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/graphql")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"valueText: \\"\*batman\*\\""#.to_string()),
                Matcher::Regex("limit: 40".to_string()),
            ]))
            .with_status(200)
            .with_body(movies_body(&["batman begins", "the batman"]))
            .create_async()
            .await;

        let config = config_for(&server);
        let movies = filtered_search(&reqwest::Client::new(), &config, "batman", 40)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(movies.len(), 2);
        assert!(movies.iter().all(|m| m.title.contains("batman")));
    }

    #[tokio::test]
    async fn test_semantic_search_empty_text_lists_without_near_text() {
        let mut server = mockito::Server::new_async().await;
        let listing = server
            .mock("POST", "/v1/graphql")
            .match_body(Matcher::Regex(r"Movies\(limit: 20\)".to_string()))
            .with_status(200)
            .with_body(movies_body(&["a", "b", "c"]))
            .create_async()
            .await;

        let config = config_for(&server);
        let movies = semantic_search(&reqwest::Client::new(), &config, "", 20)
            .await
            .unwrap();

        listing.assert_async().await;
        assert_eq!(movies.len(), 3);
    }

    #[tokio::test]
    async fn test_semantic_search_uses_near_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/graphql")
            .match_body(Matcher::Regex(r#"nearText: \{concepts: \[\\"heist in space\\"\]\}"#.to_string()))
            .with_status(200)
            .with_body(movies_body(&["passengers"]))
            .create_async()
            .await;

        let config = config_for(&server);
        let movies = semantic_search(&reqwest::Client::new(), &config, "heist in space", 20)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(movies[0].title, "passengers");
    }

    #[tokio::test]
    async fn test_keyword_search_defaults_empty_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/graphql")
            .match_body(Matcher::Regex(r#"bm25: \{query: \\"Movie\\", properties: \[\\"title\^3\\""#.to_string()))
            .with_status(200)
            .with_body(movies_body(&["movie 43"]))
            .create_async()
            .await;

        let config = config_for(&server);
        keyword_search(&reqwest::Client::new(), &config, "", 20)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_hybrid_search_clamps_alpha() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/graphql")
            .match_body(Matcher::Regex(r#"hybrid: \{query: \\"robots\\", alpha: 1\}"#.to_string()))
            .with_status(200)
            .with_body(movies_body(&["wall-e"]))
            .create_async()
            .await;

        let config = config_for(&server);
        hybrid_search(&reqwest::Client::new(), &config, "robots", 20, 3.0)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_hybrid_search_empty_text_lists_without_hybrid() {
        let mut server = mockito::Server::new_async().await;
        let listing = server
            .mock("POST", "/v1/graphql")
            .match_body(Matcher::Regex(r"Movies\(limit: 20\)".to_string()))
            .with_status(200)
            .with_body(movies_body(&["a", "b"]))
            .create_async()
            .await;

        let config = config_for(&server);
        let movies = hybrid_search(&reqwest::Client::new(), &config, "  ", 20, 0.7)
            .await
            .unwrap();

        listing.assert_async().await;
        assert_eq!(movies.len(), 2);
    }

    #[tokio::test]
    async fn test_hybrid_search_nan_alpha_uses_default() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/graphql")
            .match_body(Matcher::Regex(r#"hybrid: \{query: \\"robots\\", alpha: 0.5\}"#.to_string()))
            .with_status(200)
            .with_body(movies_body(&["wall-e"]))
            .create_async()
            .await;

        let config = config_for(&server);
        hybrid_search(&reqwest::Client::new(), &config, "robots", 20, f32::NAN)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_movie_by_id_not_found_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/graphql")
            .match_body(Matcher::Regex("valueNumber: 999999".to_string()))
            .with_status(200)
            .with_body(r#"{"data":{"Get":{"Movies":[]}}}"#)
            .create_async()
            .await;

        let config = config_for(&server);
        let movie = get_movie_by_id(&reqwest::Client::new(), &config, 999_999)
            .await
            .unwrap();
        assert!(movie.is_none());
    }

    #[tokio::test]
    async fn test_recommendations_request_one_extra() {
        let mut server = mockito::Server::new_async().await;
        let id = Uuid::parse_str("6a1c43a9-0d3e-4d8c-a4d5-2e2e6b0cf3a1").unwrap();
        let mock = server
            .mock("POST", "/v1/graphql")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(format!(r#"nearObject: \{{id: \\"{id}\\"\}}"#)),
                Matcher::Regex("limit: 21".to_string()),
            ]))
            .with_status(200)
            .with_body(movies_body(&["inception", "interstellar"]))
            .create_async()
            .await;

        let config = config_for(&server);
        let movies = get_recommendations(&reqwest::Client::new(), &config, id, 20)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(movies.len(), 2);
    }

    #[tokio::test]
    async fn test_recommendations_limit_saturates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/graphql")
            .match_body(Matcher::Regex(format!("limit: {}", usize::MAX)))
            .with_status(200)
            .with_body(movies_body(&[]))
            .create_async()
            .await;

        let config = config_for(&server);
        get_recommendations(&reqwest::Client::new(), &config, Uuid::nil(), usize::MAX)
            .await
            .unwrap();
        mock.assert_async().await;
    }
}

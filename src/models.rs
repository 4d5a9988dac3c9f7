use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A movie object as returned by a `Get` query. Which fields are populated
/// depends on the field list the query asked for.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub poster_link: String,
    #[serde(default, deserialize_with = "string_list")]
    pub genres: Vec<String>,
    #[serde(default, deserialize_with = "number_as_int")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub director: String,
    /// Business key of the movie, not the Weaviate object id
    #[serde(default, deserialize_with = "number_as_int")]
    pub movie_id: Option<i64>,
    #[serde(default, deserialize_with = "string_list")]
    pub actors: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub plot: String,
    #[serde(
        rename = "_additional",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional: Option<Additional>,
}

/// `_additional { id certainty }` metadata of an object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Additional {
    /// Weaviate object id, used to seed nearObject queries
    pub id: Uuid,
    #[serde(default)]
    pub certainty: Option<f64>,
}

impl Movie {
    /// Weaviate object id, present only when the query requested `_additional`.
    pub fn object_id(&self) -> Option<Uuid> {
        self.additional.as_ref().map(|a| a.id)
    }
}

/// Which query the search endpoint runs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    Keyword,
    Filter,
    Semantic,
    Hybrid,
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Ok(SearchMode::Keyword),
            "filter" => Ok(SearchMode::Filter),
            "semantic" => Ok(SearchMode::Semantic),
            "hybrid" => Ok(SearchMode::Hybrid),
            other => Err(format!("unknown search mode: {other}")),
        }
    }
}

/// Query string of `GET /search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub searched_data: Option<String>,
    /// Presence alone selects filter mode; the value is ignored.
    #[serde(default)]
    pub filter_search: Option<String>,
    /// Kept as raw text so a bad value falls back instead of rejecting the request.
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub alpha: Option<String>,
}

impl SearchParams {
    /// Search text, trimmed and lower-cased to match the imported data.
    pub fn text(&self) -> String {
        self.searched_data
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase()
    }

    /// A valid `mode` wins; otherwise `filter_search` picks filter mode and
    /// everything else is semantic. Unknown or empty `mode` values are ignored.
    pub fn resolved_mode(&self) -> SearchMode {
        match self.mode.as_deref().and_then(|m| m.parse().ok()) {
            Some(mode) => mode,
            None if self.filter_search.is_some() => SearchMode::Filter,
            None => SearchMode::Semantic,
        }
    }

    /// Hybrid blend weight; missing, empty or non-finite values give `default`.
    pub fn alpha_or(&self, default: f32) -> f32 {
        self.alpha
            .as_deref()
            .and_then(|a| a.trim().parse::<f32>().ok())
            .filter(|a| a.is_finite())
            .unwrap_or(default)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Weaviate `number` properties come back as floats.
fn number_as_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map(|v| v as i64))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawList {
    Joined(String),
    Items(Vec<String>),
}

/// List properties are stored as comma-separated text but may also be arrays.
fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<RawList>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(RawList::Items(items)) => items,
        Some(RawList::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movie_from_weaviate_payload() {
        let movie: Movie = serde_json::from_value(json!({
            "title": "the dark knight",
            "poster_link": "https://example.com/dk.jpg",
            "genres": "Action, Crime,Drama",
            "year": 2008.0,
            "director": "christopher nolan",
            "movie_id": 155.0,
            "_additional": {
                "id": "0b7e1c1a-6f4e-4a38-9d0a-3f3b2b1e9c11",
                "certainty": null
            }
        }))
        .unwrap();

        assert_eq!(movie.genres, vec!["Action", "Crime", "Drama"]);
        assert_eq!(movie.year, Some(2008));
        assert_eq!(movie.movie_id, Some(155));
        assert!(movie.actors.is_empty());
        assert_eq!(
            movie.object_id().unwrap().to_string(),
            "0b7e1c1a-6f4e-4a38-9d0a-3f3b2b1e9c11"
        );
    }

    #[test]
    fn test_movie_tolerates_nulls_and_arrays() {
        let movie: Movie = serde_json::from_value(json!({
            "title": null,
            "actors": ["christian bale", " heath ledger "],
            "plot": null,
            "year": null
        }))
        .unwrap();

        assert_eq!(movie.title, "");
        assert_eq!(movie.actors, vec!["christian bale", "heath ledger"]);
        assert_eq!(movie.year, None);
        assert!(movie.object_id().is_none());
    }

    #[test]
    fn test_search_params_mode_resolution() {
        let filter = SearchParams {
            filter_search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter.resolved_mode(), SearchMode::Filter);

        assert_eq!(SearchParams::default().resolved_mode(), SearchMode::Semantic);

        let explicit = SearchParams {
            filter_search: Some("on".to_string()),
            mode: Some("hybrid".to_string()),
            ..Default::default()
        };
        assert_eq!(explicit.resolved_mode(), SearchMode::Hybrid);
    }

    #[test]
    fn test_bad_mode_falls_back() {
        let bogus = SearchParams {
            mode: Some("bogus".to_string()),
            ..Default::default()
        };
        assert_eq!(bogus.resolved_mode(), SearchMode::Semantic);

        let empty_with_filter = SearchParams {
            mode: Some(String::new()),
            filter_search: Some("on".to_string()),
            ..Default::default()
        };
        assert_eq!(empty_with_filter.resolved_mode(), SearchMode::Filter);
    }

    #[test]
    fn test_alpha_parsing_is_lenient() {
        let with = |alpha: Option<&str>| SearchParams {
            alpha: alpha.map(str::to_string),
            ..Default::default()
        };
        assert_eq!(with(Some("0.25")).alpha_or(0.5), 0.25);
        assert_eq!(with(Some("")).alpha_or(0.5), 0.5);
        assert_eq!(with(Some("lots")).alpha_or(0.5), 0.5);
        assert_eq!(with(Some("NaN")).alpha_or(0.5), 0.5);
        assert_eq!(with(None).alpha_or(0.5), 0.5);
    }

    #[test]
    fn test_search_text_is_lowercased() {
        let params = SearchParams {
            searched_data: Some("  BatMan ".to_string()),
            ..Default::default()
        };
        assert_eq!(params.text(), "batman");
        assert_eq!(SearchParams::default().text(), "");
    }
}

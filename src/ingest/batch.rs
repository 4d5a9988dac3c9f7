use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::WeaviateConfig;
use crate::search::client::authorize;

/// Movies released in or before this year are not imported.
pub const MIN_YEAR: i64 = 1970;

pub const DEFAULT_BATCH_SIZE: usize = 10;

/// One movie of the prepared dataset. Accepts both the snake_case names and
/// the column names of the source CSV export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieImport {
    pub id: i64,
    #[serde(default, alias = "Name")]
    pub name: String,
    #[serde(default, alias = "PosterLink")]
    pub poster_link: String,
    #[serde(default, alias = "Genres")]
    pub genres: String,
    #[serde(default, alias = "Actors")]
    pub actors: String,
    #[serde(default, alias = "Director")]
    pub director: String,
    #[serde(default, alias = "Description")]
    pub description: String,
    #[serde(default)]
    pub year: i64,
    #[serde(default, alias = "Keywords")]
    pub keywords: String,
    #[serde(default, alias = "Plot")]
    pub plot: String,
}

/// Properties of a movie object as stored in the class.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieObject {
    pub movie_id: f64,
    pub title: String,
    pub year: i64,
    pub poster_link: String,
    pub genres: String,
    pub actors: String,
    pub director: String,
    pub description: String,
    pub plot: String,
    pub keywords: String,
}

/// Title, actors and director are stored lower-cased so the substring
/// filter search can match lower-cased input.
pub fn normalize(record: MovieImport) -> Option<MovieObject> {
    if record.year <= MIN_YEAR {
        return None;
    }
    Some(MovieObject {
        movie_id: record.id as f64,
        title: record.name.to_lowercase(),
        year: record.year,
        poster_link: record.poster_link,
        genres: record.genres,
        actors: record.actors.to_lowercase(),
        director: record.director.to_lowercase(),
        description: record.description,
        plot: record.plot,
        keywords: record.keywords,
    })
}

/// Read a JSON Lines file of [`MovieImport`] records.
pub fn read_movies(path: &Path) -> Result<Vec<MovieImport>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::Deserializer::from_reader(BufReader::new(file))
        .into_iter::<MovieImport>()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse movies from {}", path.display()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Normalize and import `records` in batches. Stops at the first failed
/// batch; objects before it stay imported.
pub async fn import_movies(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    class_name: &str,
    records: Vec<MovieImport>,
    batch_size: usize,
) -> Result<ImportSummary> {
    let total = records.len();
    let objects: Vec<MovieObject> = records.into_iter().filter_map(normalize).collect();
    let mut summary = ImportSummary {
        imported: 0,
        skipped: total - objects.len(),
    };

    for chunk in objects.chunks(batch_size.max(1)) {
        send_batch(client, config, class_name, chunk)
            .await
            .with_context(|| format!("Import failed at object {}", summary.imported))?;
        summary.imported += chunk.len();
        tracing::debug!("Imported {}/{}", summary.imported, objects.len());
    }

    Ok(summary)
}

async fn send_batch(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    class_name: &str,
    objects: &[MovieObject],
) -> Result<()> {
    let req = BatchRequest {
        objects: objects
            .iter()
            .map(|properties| BatchObject {
                class: class_name,
                properties,
            })
            .collect(),
    };

    let resp = authorize(client.post(config.batch_objects_url()), config)
        .json(&req)
        .send()
        .await
        .context("Failed to call Weaviate batch API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Weaviate batch API returned {status}: {body}");
    }

    let results: Vec<BatchObjectResult> = resp
        .json()
        .await
        .context("Failed to parse Weaviate batch response")?;

    // Per-object failures come back with a 200 status
    for (i, result) in results.iter().enumerate() {
        let errors = result
            .result
            .as_ref()
            .and_then(|r| r.errors.as_ref())
            .map(|e| e.error.as_slice())
            .unwrap_or_default();
        if let Some(first) = errors.first() {
            anyhow::bail!("Object {i} of batch rejected: {}", first.message);
        }
    }
    Ok(())
}

// ─── Request/Response types ────────────────────────────

#[derive(Serialize)]
struct BatchRequest<'a> {
    objects: Vec<BatchObject<'a>>,
}

#[derive(Serialize)]
struct BatchObject<'a> {
    class: &'a str,
    properties: &'a MovieObject,
}

#[derive(Deserialize)]
struct BatchObjectResult {
    #[serde(default)]
    result: Option<BatchResult>,
}

#[derive(Deserialize)]
struct BatchResult {
    #[serde(default)]
    errors: Option<BatchErrors>,
}

#[derive(Deserialize)]
struct BatchErrors {
    #[serde(default)]
    error: Vec<BatchError>,
}

#[derive(Deserialize)]
struct BatchError {
    message: String,
}

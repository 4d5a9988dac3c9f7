use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::WeaviateConfig;
use crate::search::client::authorize;

/// Class definition for the movie collection. Only the free-text fields
/// (`description`, `plot`, `keywords`) feed the text2vec-openai vectorizer.
pub fn movie_class(class_name: &str) -> Value {
    let skipped = |name: &str, data_type: &str, description: &str| {
        json!({
            "name": name,
            "dataType": [data_type],
            "description": description,
            "moduleConfig": {
                "text2vec-openai": {
                    "skip": true,
                    "vectorizePropertyName": false
                }
            }
        })
    };
    let vectorized = |name: &str, description: &str| {
        json!({
            "name": name,
            "dataType": ["text"],
            "description": description
        })
    };

    json!({
        "class": class_name,
        "description": "A collection of movies since 1970.",
        "vectorizer": "text2vec-openai",
        "vectorIndexConfig": {
            "distance": "cosine"
        },
        "moduleConfig": {
            "text2vec-openai": {
                "vectorizeClassName": false,
                "model": "ada",
                "modelVersion": "002",
                "type": "text"
            }
        },
        "properties": [
            skipped("movie_id", "number", "The id of the movie"),
            skipped("title", "text", "The name of the movie"),
            skipped("year", "number", "The year in which movie was published"),
            skipped("poster_link", "text", "The poster link of the movie"),
            skipped("genres", "text", "The genres of the movie"),
            skipped("actors", "text", "The actors of the movie"),
            skipped("director", "text", "Director of the movie"),
            vectorized("description", "overview of the movie"),
            vectorized("plot", "Plot of the movie from Wikipedia"),
            vectorized("keywords", "main keywords of the movie"),
        ]
    })
}

#[derive(Deserialize)]
struct Schema {
    #[serde(default)]
    classes: Vec<SchemaClass>,
}

#[derive(Deserialize)]
struct SchemaClass {
    class: String,
}

/// Whether `class_name` is already defined on the instance.
pub async fn class_exists(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    class_name: &str,
) -> Result<bool> {
    let resp = authorize(client.get(config.schema_url()), config)
        .send()
        .await
        .context("Failed to fetch Weaviate schema")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Weaviate schema API returned {status}: {body}");
    }

    let schema: Schema = resp
        .json()
        .await
        .context("Failed to parse Weaviate schema")?;
    Ok(schema.classes.iter().any(|c| c.class == class_name))
}

pub async fn delete_class(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    class_name: &str,
) -> Result<()> {
    let url = format!("{}/{class_name}", config.schema_url());
    let resp = authorize(client.delete(&url), config)
        .send()
        .await
        .context("Failed to delete Weaviate class")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Deleting class {class_name} returned {status}: {body}");
    }
    Ok(())
}

pub async fn create_class(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    class_name: &str,
) -> Result<()> {
    let resp = authorize(client.post(config.schema_url()), config)
        .json(&movie_class(class_name))
        .send()
        .await
        .context("Failed to create Weaviate class")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Creating class {class_name} returned {status}: {body}");
    }
    Ok(())
}

/// Drop the class (and its objects) if present, then create it fresh.
pub async fn recreate_class(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    class_name: &str,
) -> Result<()> {
    if class_exists(client, config, class_name).await? {
        tracing::info!("Deleting existing class {class_name}");
        delete_class(client, config, class_name).await?;
    }
    create_class(client, config, class_name).await?;
    tracing::info!("Created class {class_name}");
    Ok(())
}

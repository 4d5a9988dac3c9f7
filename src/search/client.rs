use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::WeaviateConfig;
use crate::search::graphql::GetQuery;

/// Attach the Weaviate bearer token and the OpenAI key the vectorizer module reads.
pub fn authorize(
    mut request: reqwest::RequestBuilder,
    config: &WeaviateConfig,
) -> reqwest::RequestBuilder {
    if let Some(key) = config.api_key.as_deref() {
        request = request.bearer_auth(key);
    }
    if let Some(key) = config.openai_api_key.as_deref() {
        request = request.header("X-OpenAI-Api-Key", key);
    }
    request
}

/// Run a `Get` query and return the objects of its class. A response
/// without data for the class is an empty result, not an error.
pub async fn get_objects<T: DeserializeOwned>(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    query: &GetQuery,
) -> Result<Vec<T>> {
    let document = query.build();
    tracing::debug!("GraphQL query: {document}");

    let body: GraphQlResponse<GetData<T>> = post_graphql(client, config, &document).await?;

    Ok(body
        .data
        .and_then(|mut data| data.get.remove(query.class_name()))
        .flatten()
        .unwrap_or_default())
}

/// Number of objects stored in a class.
pub async fn count_objects(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    class_name: &str,
) -> Result<u64> {
    let document = format!("{{ Aggregate {{ {class_name} {{ meta {{ count }} }} }} }}");
    let body: GraphQlResponse<AggregateData> = post_graphql(client, config, &document).await?;

    let count = body
        .data
        .and_then(|mut data| data.aggregate.remove(class_name))
        .flatten()
        .and_then(|groups| groups.into_iter().next())
        .map(|group| group.meta.count)
        .unwrap_or(0);
    Ok(count)
}

async fn post_graphql<D: DeserializeOwned>(
    client: &reqwest::Client,
    config: &WeaviateConfig,
    document: &str,
) -> Result<GraphQlResponse<D>> {
    let req = GraphQlRequest { query: document };

    let resp = authorize(client.post(config.graphql_url()), config)
        .json(&req)
        .send()
        .await
        .context("Failed to call Weaviate GraphQL API")?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("Weaviate GraphQL API returned {status}: {body}");
    }

    let body: GraphQlResponse<D> = resp
        .json()
        .await
        .context("Failed to parse Weaviate GraphQL response")?;

    // Weaviate reports query errors with a 200 status
    if let Some(errors) = body.errors.as_ref().filter(|e| !e.is_empty()) {
        let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
        anyhow::bail!("Weaviate query failed: {}", messages.join("; "));
    }

    Ok(body)
}

// ─── Request/Response types ────────────────────────────

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "D: DeserializeOwned"))]
struct GraphQlResponse<D> {
    data: Option<D>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct GetData<T> {
    #[serde(rename = "Get", default = "HashMap::new")]
    get: HashMap<String, Option<Vec<T>>>,
}

#[derive(Deserialize)]
struct AggregateData {
    #[serde(rename = "Aggregate", default)]
    aggregate: HashMap<String, Option<Vec<AggregateGroup>>>,
}

#[derive(Deserialize)]
struct AggregateGroup {
    meta: AggregateMeta,
}

#[derive(Deserialize)]
struct AggregateMeta {
    count: u64,
}

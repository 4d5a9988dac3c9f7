use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address
    pub bind_addr: String,
    /// Weaviate connection settings
    pub weaviate: WeaviateConfig,
    /// Maximum records returned by keyword, semantic and hybrid search,
    /// and the size of the recommendation list
    pub result_limit: usize,
    /// Maximum records returned by wildcard filter search
    pub filter_result_limit: usize,
}

/// Connection settings for the hosted Weaviate instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaviateConfig {
    /// Host (e.g. "my-cluster.weaviate.network") or full URL with scheme
    pub url: String,
    /// Weaviate API key, sent as a bearer token
    pub api_key: Option<String>,
    /// OpenAI key forwarded for the text2vec-openai module
    pub openai_api_key: Option<String>,
    /// Name of the class holding the movie objects
    pub class_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{DEFAULT_PORT}"),
            weaviate: WeaviateConfig::default(),
            result_limit: 20,
            filter_result_limit: 40,
        }
    }
}

impl Default for WeaviateConfig {
    fn default() -> Self {
        Self {
            url: "localhost:8080".to_string(),
            api_key: None,
            openai_api_key: None,
            class_name: "Movies".to_string(),
        }
    }
}

const DEFAULT_PORT: u16 = 3000;

/// Upper bound for both configured result limits.
pub const MAX_RESULT_LIMIT: usize = 100;

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. Unset or unparseable
    /// values keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT") {
            if let Ok(p) = port.parse::<u16>() {
                config.bind_addr = format!("0.0.0.0:{p}");
            }
        }
        if let Some(addr) = lookup("MOVIATE_BIND_ADDR") {
            config.bind_addr = addr;
        }

        if let Some(url) = lookup("WEAVIATE_URL") {
            if !url.trim().is_empty() {
                config.weaviate.url = url.trim().to_string();
            }
        }
        config.weaviate.api_key = lookup("WEAVIATE_API_KEY").filter(|k| !k.is_empty());
        config.weaviate.openai_api_key = lookup("OPENAI_API_KEY").filter(|k| !k.is_empty());
        if let Some(class) = lookup("WEAVIATE_CLASS") {
            if !class.is_empty() {
                config.weaviate.class_name = class;
            }
        }

        if let Some(val) = lookup("MOVIATE_RESULT_LIMIT") {
            if let Ok(v) = val.parse::<usize>() {
                if v > 0 {
                    config.result_limit = v.min(MAX_RESULT_LIMIT);
                }
            }
        }
        if let Some(val) = lookup("MOVIATE_FILTER_RESULT_LIMIT") {
            if let Ok(v) = val.parse::<usize>() {
                if v > 0 {
                    config.filter_result_limit = v.min(MAX_RESULT_LIMIT);
                }
            }
        }

        config
    }
}

impl WeaviateConfig {
    /// Base URL of the instance without a trailing slash. Bare hosts get https.
    pub fn base_url(&self) -> String {
        let url = self.url.trim_end_matches('/');
        if url.contains("://") {
            url.to_string()
        } else {
            format!("https://{url}")
        }
    }

    pub fn graphql_url(&self) -> String {
        format!("{}/v1/graphql", self.base_url())
    }

    pub fn schema_url(&self) -> String {
        format!("{}/v1/schema", self.base_url())
    }

    pub fn batch_objects_url(&self) -> String {
        format!("{}/v1/batch/objects", self.base_url())
    }
}

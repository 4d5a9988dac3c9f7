use std::sync::Arc;

use tera::Tera;

use crate::config::Config;
use crate::render;

/// Shared application state. Everything in here is read-only after startup;
/// per-request values travel through handler arguments.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http_client: reqwest::Client,
    pub templates: Arc<Tera>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            http_client: reqwest::Client::builder()
                .user_agent(concat!("moviate/", env!("CARGO_PKG_VERSION")))
                .build()?,
            templates: Arc::new(render::templates()?),
        })
    }
}

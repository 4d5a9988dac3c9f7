use tracing_subscriber::EnvFilter;

use moviate::api;
use moviate::config::Config;
use moviate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Weaviate: {} (class {})",
        config.weaviate.base_url(),
        config.weaviate.class_name
    );
    if config.weaviate.openai_api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; semantic queries will fail");
    }

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config)?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("The app is running on: http://{bind_addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

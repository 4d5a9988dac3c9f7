//! Create the movie class and load a prepared dataset into Weaviate.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use moviate::config::Config;
use moviate::ingest::{batch, schema};
use moviate::search::client::count_objects;

#[derive(Parser, Debug)]
#[command(name = "moviate-import", about = "Import movies into Weaviate")]
struct Args {
    /// JSON Lines file with one movie per line
    #[arg(short, long)]
    file: PathBuf,

    /// Objects per batch request
    #[arg(short, long, default_value_t = batch::DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Append to the existing class instead of recreating it
    #[arg(long)]
    keep_existing: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    let weaviate = &config.weaviate;
    let class_name = weaviate.class_name.as_str();
    let client = reqwest::Client::new();

    let records = batch::read_movies(&args.file)?;
    tracing::info!("Read {} movies from {}", records.len(), args.file.display());

    if args.keep_existing {
        if !schema::class_exists(&client, weaviate, class_name).await? {
            schema::create_class(&client, weaviate, class_name).await?;
        }
    } else {
        schema::recreate_class(&client, weaviate, class_name).await?;
    }

    let summary =
        batch::import_movies(&client, weaviate, class_name, records, args.batch_size).await?;
    tracing::info!(
        "Imported {} movies ({} released in or before {} skipped)",
        summary.imported,
        summary.skipped,
        batch::MIN_YEAR
    );

    let count = count_objects(&client, weaviate, class_name).await?;
    tracing::info!("{class_name} now holds {count} objects");
    Ok(())
}

use anyhow::{bail, Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use post_normalizer::config::Config;
use post_normalizer::output::write_results;
use post_normalizer::{get_normalized_post, ApiClient, NormalizeOptions};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    init_tracing()?;

    let Some(id_or_url) = std::env::args().nth(1) else {
        bail!("usage: post-normalizer <post-id-or-url>");
    };

    // Load and validate configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(
        api_base_url = %config.api_base_url,
        max_quote_depth = config.max_quote_depth,
        "Configuration loaded"
    );

    let client = ApiClient::new(&config).context("Failed to create API client")?;
    let options = NormalizeOptions {
        max_quote_depth: config.max_quote_depth,
    };

    info!(input = %id_or_url, "Fetching post");
    let Some(post) = get_normalized_post(&client, &id_or_url, options)
        .await
        .with_context(|| format!("Failed to fetch post {id_or_url}"))?
    else {
        info!(input = %id_or_url, "Post not found");
        return Ok(());
    };

    let json = serde_json::to_string_pretty(&post).context("Failed to serialize post")?;
    println!("{json}");

    let written = write_results(&config.output_dir, &post).await?;
    info!(
        markdown = %written.markdown.display(),
        json = %written.json.display(),
        "Results written"
    );

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,post_normalizer=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    // Logs go to stderr; stdout carries the post JSON
    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

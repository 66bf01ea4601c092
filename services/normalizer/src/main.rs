use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use normalizer::{Config, Pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging with JSON formatting (configurable via env)
    let use_json = std::env::var("LOG_FORMAT")
        .unwrap_or_else(|_| "json".to_string())
        .eq_ignore_ascii_case("json");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "normalizer=info".into());

    // Logs go to stderr so stdout carries only the records
    if use_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    info!(
        service = "normalizer",
        version = env!("CARGO_PKG_VERSION"),
        log_format = if use_json { "json" } else { "text" },
        "Starting normalizer"
    );

    let mut config = Config::load()?;
    if let Some(path) = std::env::args().nth(1) {
        config.input.path = path;
    }
    info!(
        worker_count = config.pipeline.worker_count,
        input_path = %config.input.path,
        "Configuration loaded"
    );

    let payload = tokio::fs::read(&config.input.path)
        .await
        .with_context(|| format!("Failed to read feed from {}", config.input.path))?;

    let pipeline = Pipeline::new(config.pipeline.clone())?;
    let batch = pipeline.process(&payload).await?;
    let (markets, error) = batch.into_parts();

    // Partial success: records are printed even when some units were skipped
    if let Some(error) = &error {
        for err in error.errors() {
            warn!(code = err.code(), scope = ?err.scope(), "{}", err);
        }
        warn!(
            error_count = error.len(),
            by_code = ?error.count_by_code(),
            "Some events, markets or selections were skipped"
        );
    }

    let rendered = if config.output.pretty {
        serde_json::to_string_pretty(&markets)?
    } else {
        serde_json::to_string(&markets)?
    };
    println!("{}", rendered);

    info!(
        records = markets.len(),
        skipped = error.as_ref().map_or(0, |e| e.len()),
        "Normalizer finished"
    );

    Ok(())
}

use anyhow::Context;
use clap::Parser;
use tracing::info;

use kafka_connect_exporter::{config, server, Config, Exporter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    if config.version {
        print!("{}", config::version_text());
        std::process::exit(2);
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("kafka_connect_exporter=info".parse()?),
        )
        .init();

    let base = config.validate()?;
    let exporter = Exporter::new(base).context("failed to build HTTP client")?;

    info!(scrape_uri = %exporter.base(), "Collecting data from kafka connect");

    let app = server::router(exporter, &config.telemetry_path);

    let listener = tokio::net::TcpListener::bind(&config.listen_address)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_address))?;

    info!(
        "kafka-connect-exporter listening on http://{}{}",
        config.listen_address, config.telemetry_path
    );

    axum::serve(listener, app).await?;
    Ok(())
}

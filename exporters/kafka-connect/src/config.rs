use clap::Parser;
use reqwest::Url;

use crate::error::ConfigError;

pub const PROJECT_URL: &str = "https://github.com/wakeful/kafka_connect_exporter";

#[derive(Debug, Clone, Parser)]
#[command(name = "kafka-connect-exporter", disable_version_flag = true)]
pub struct Config {
    /// Show version and exit
    #[arg(long)]
    pub version: bool,

    /// Address on which to expose metrics
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_address: String,

    /// Path under which to expose metrics
    #[arg(long, env = "TELEMETRY_PATH", default_value = "/metrics")]
    pub telemetry_path: String,

    /// URI on which to scrape kafka connect
    #[arg(long, env = "KAFKA_CONNECT_URL", default_value = "http://127.0.0.1:8080")]
    pub scrape_uri: String,
}

impl Config {
    /// Checks everything that can be checked before serving.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if !self.telemetry_path.starts_with('/') || self.telemetry_path == "/health" {
            return Err(ConfigError::InvalidTelemetryPath(
                self.telemetry_path.clone(),
            ));
        }
        parse_scrape_uri(&self.scrape_uri)
    }
}

/// Parses the Kafka Connect base URI; only `http` and `https` are accepted.
pub fn parse_scrape_uri(uri: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(uri).map_err(|source| ConfigError::InvalidUri {
        uri: uri.to_owned(),
        source,
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_owned())),
    }
}

pub fn version_text() -> String {
    format!(
        "kafka_connect_exporter\n url: {}\n version: {}\n",
        PROJECT_URL,
        env!("CARGO_PKG_VERSION")
    )
}

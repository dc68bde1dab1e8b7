use thiserror::Error;

/// Startup configuration errors. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid scrape uri {uri:?}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    #[error("schema not supported: {0:?} (expected http or https)")]
    UnsupportedScheme(String),

    #[error("invalid telemetry path {0:?}: must start with '/' and not be /health")]
    InvalidTelemetryPath(String),
}

/// Failure of a single request against the Kafka Connect REST API.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("can't read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("can't decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("can't build status url for connector {0:?}")]
    Url(String),
}

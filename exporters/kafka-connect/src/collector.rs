//! One scrape of the Kafka Connect REST API.
//!
//! A cycle lists the connectors, then fetches each connector's status one
//! after the other. A failed listing turns the whole cycle into a single
//! `up = 0` sample; a failed status only drops that connector.

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::api::{ConnectorList, ConnectorStatus};
use crate::error::ScrapeError;
use crate::metrics::Sample;

/// Timeout applied to every request made against Kafka Connect.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct Exporter {
    base: Url,
    client: reqwest::Client,
}

impl Exporter {
    pub fn new(base: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(base, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base, client })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Runs a full collection cycle and returns the samples in emission order.
    pub async fn collect(&self) -> Vec<Sample> {
        let connectors = match self.list_connectors().await {
            Ok(connectors) => connectors,
            Err(e) => {
                error!(error = %e, "Can't scrape kafka connect");
                return vec![Sample::Up(false)];
            }
        };

        let mut samples = Vec::with_capacity(2 + connectors.len() * 2);
        samples.push(Sample::Up(true));
        samples.push(Sample::ConnectorsCount(connectors.len()));

        for name in &connectors {
            let status = match self.connector_status(name).await {
                Ok(status) => status,
                Err(e) => {
                    error!(connector = %name, error = %e, "Can't get connector status");
                    continue;
                }
            };

            samples.push(Sample::connector_running(&status));
            samples.extend(
                status
                    .tasks
                    .iter()
                    .map(|task| Sample::task_state(&status.name, task)),
            );
        }

        debug!(
            connectors = connectors.len(),
            samples = samples.len(),
            "Scrape finished"
        );
        samples
    }

    async fn list_connectors(&self) -> Result<ConnectorList, ScrapeError> {
        self.get_json(self.connectors_url()).await
    }

    async fn connector_status(&self, name: &str) -> Result<ConnectorStatus, ScrapeError> {
        let url = self.status_url(name)?;
        self.get_json(url).await
    }

    fn connectors_url(&self) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("connectors");
        }
        url
    }

    fn status_url(&self, name: &str) -> Result<Url, ScrapeError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| ScrapeError::Url(name.to_owned()))?
            .pop_if_empty()
            .extend(["connectors", name, "status"]);
        Ok(url)
    }

    /// GETs `url` and decodes the body. The body is read to the end (or the
    /// response dropped) before returning, so the connection goes back to the
    /// pool on every path.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ScrapeError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ScrapeError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|source| ScrapeError::Body {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| ScrapeError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

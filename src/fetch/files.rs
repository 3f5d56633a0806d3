// src/fetch/files.rs

use bytes::Bytes;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::error::{IngestError, Result};

/// Result of a single fetch. `NotFound` means the file was never published
/// and is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Found(Bytes),
    NotFound,
}

/// Where trip files come from.
#[allow(async_fn_in_trait)]
pub trait Source {
    async fn fetch(&self, url: &str) -> Result<FetchOutcome>;
}

/// HTTP source with a bounded per-request timeout. Idle connections are not
/// pooled, so every fetch opens and releases its own connection.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()
            .map_err(IngestError::Client)?;
        Ok(Self { client })
    }
}

impl Source for HttpSource {
    async fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        fetch_source(&self.client, url).await
    }
}

/// Download `url` in one attempt. 404 maps to [`FetchOutcome::NotFound`];
/// any other non-success status, transport error or timeout is fatal.
#[instrument(level = "debug", skip(client))]
pub async fn fetch_source(client: &Client, url: &str) -> Result<FetchOutcome> {
    let transport = |source: reqwest::Error| IngestError::Transport {
        url: url.to_string(),
        source,
    };

    let resp = client.get(url).send().await.map_err(transport)?;
    let status = resp.status();
    if status == StatusCode::NOT_FOUND {
        debug!(%status, "source not published");
        return Ok(FetchOutcome::NotFound);
    }
    if !status.is_success() {
        return Err(IngestError::FetchStatus {
            url: url.to_string(),
            status,
        });
    }

    let bytes = resp.bytes().await.map_err(transport)?;
    debug!(len = bytes.len(), "downloaded");
    Ok(FetchOutcome::Found(bytes))
}

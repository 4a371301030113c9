use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::errors::{ArchiveError, ArchiveResult};
use crate::config::ArchiveConfig;

/// Body returned by the archive collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveReport {
    pub archived_count: u64,
}

/// The side-effecting call protected by the guard
#[async_trait]
pub trait ArchiveTrigger: Send + Sync {
    async fn trigger(&self) -> ArchiveResult<ArchiveReport>;
}

/// Calls the archive endpoint with an empty POST
pub struct HttpArchiveTrigger {
    http_client: Client,
    url: String,
}

impl HttpArchiveTrigger {
    pub fn new(config: &ArchiveConfig) -> ArchiveResult<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            url: config.trigger_url.clone(),
        })
    }
}

#[async_trait]
impl ArchiveTrigger for HttpArchiveTrigger {
    async fn trigger(&self) -> ArchiveResult<ArchiveReport> {
        let response = self.http_client.post(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ArchiveError::Status { status, body });
        }

        response
            .json::<ArchiveReport>()
            .await
            .map_err(|e| ArchiveError::MalformedResponse(e.to_string()))
    }
}

//! Tip retrieval from the upstream tips API.

use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::error::FetchError;

/// A single tip as served by the tips API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tip {
    #[serde(rename = "tip")]
    pub text: String,
    pub number: i64,
}

/// Envelope returned by the tips API.
#[derive(Debug, Deserialize)]
pub struct TipsEnvelope {
    pub tips: Vec<Tip>,
}

impl TipsEnvelope {
    /// Take the first tip, dropping the rest.
    pub fn into_first(self) -> Option<Tip> {
        self.tips.into_iter().next()
    }
}

/// Client for the tips API.
#[derive(Clone)]
pub struct TipsClient {
    client: Client,
    url: String,
}

impl TipsClient {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }

    /// Fetch one tip with a single GET request.
    ///
    /// Dropping the returned future aborts the request.
    pub async fn fetch_tip(&self) -> Result<Tip, FetchError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Transport)?;

        info!(
            url = %self.url,
            status_code = resp.status().as_u16(),
            "tips_fetch_response"
        );

        let envelope: TipsEnvelope = resp.json().await.map_err(FetchError::Decode)?;
        let available = envelope.tips.len();

        let tip = envelope.into_first().ok_or(FetchError::Empty)?;

        info!(
            tip_number = tip.number,
            tips_available = available,
            "tips_fetch_complete"
        );

        Ok(tip)
    }
}

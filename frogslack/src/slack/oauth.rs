//! OAuth v2 code exchange for the app install flow.

use reqwest::Client;
use serde::Deserialize;
use tracing::info;

use crate::error::ExchangeError;

/// Decoded `oauth.v2.access` response.
///
/// Only the fields needed to report the outcome are kept. The access token
/// is never decoded, so it cannot end up in logs.
#[derive(Debug, Default, Deserialize)]
struct AccessResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    app_id: String,
    #[serde(default)]
    error: String,
    #[serde(default)]
    team: Team,
}

#[derive(Debug, Default, Deserialize)]
struct Team {
    #[serde(default)]
    id: String,
}

/// Outcome of a token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallResult {
    pub ok: bool,
    pub app_id: String,
    pub error: String,
    pub team_id: String,
}

impl From<AccessResponse> for InstallResult {
    fn from(resp: AccessResponse) -> Self {
        Self {
            ok: resp.ok,
            app_id: resp.app_id,
            error: resp.error,
            team_id: resp.team.id,
        }
    }
}

/// Client for the Slack token endpoint.
#[derive(Clone)]
pub struct OAuthClient {
    client: Client,
    access_url: String,
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

impl OAuthClient {
    pub fn new(
        client: Client,
        access_url: String,
        client_id: String,
        client_secret: String,
        redirect_uri: String,
    ) -> Self {
        Self {
            client,
            access_url,
            client_id,
            client_secret,
            redirect_uri,
        }
    }

    /// Exchange a one-time authorization code for an installation.
    ///
    /// Succeeds only when the endpoint answers with `"ok": true`.
    pub async fn exchange_code(&self, code: &str) -> Result<InstallResult, ExchangeError> {
        let form = [
            ("code", code),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];

        let resp = self
            .client
            .post(&self.access_url)
            .form(&form)
            .send()
            .await
            .map_err(ExchangeError::Transport)?;

        let status = resp.status().as_u16();
        let body = resp.bytes().await.map_err(ExchangeError::Transport)?;

        info!(
            status_code = status,
            body_length = body.len(),
            "oauth_access_response"
        );

        let decoded: AccessResponse =
            serde_json::from_slice(&body).map_err(ExchangeError::Decode)?;
        let result = InstallResult::from(decoded);

        info!(
            ok = result.ok,
            app_id = %result.app_id,
            team_id = %result.team_id,
            error = %result.error,
            "oauth_access_decoded"
        );

        if !result.ok {
            return Err(ExchangeError::Rejected(result.error));
        }

        Ok(result)
    }
}

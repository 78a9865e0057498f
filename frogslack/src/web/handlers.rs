//! Endpoint handlers.
//!
//! Every failure is answered with a well-formed body and a 200 status.
//! Slack shows whatever we send back, so errors become apology text.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Form, Query, State},
    http::HeaderMap,
    Json,
};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::error::ExchangeError;
use crate::slack::{verify_request, InstallResult, OAuthClient, SlashCommand};
use crate::tips::TipsClient;
use crate::web::reply::Reply;
use crate::Config;

/// Reply when the request cannot be read or is not from Slack.
pub const NO_TIPS: &str = "SORRY, NO TIPS RIGHT NOW.";

/// Reply when the tips API has nothing for us.
pub const NO_TIPS_COME_BACK: &str = "SORRY, NO TIPS RIGHT NOW. COME BACK.";

pub const INSTALL_OK: &str = "it's fine.";
pub const INSTALL_FAILED: &str = "dang";

/// Largest slash command body we are willing to buffer.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tips: TipsClient,
    pub oauth: OAuthClient,
}

impl AppState {
    /// Build state with one HTTP client shared by all outbound calls.
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: Config, client: Client) -> Self {
        let tips = TipsClient::new(client.clone(), config.tips_api_url.clone());
        let oauth = OAuthClient::new(
            client,
            config.oauth_access_url.clone(),
            config.client_id.clone(),
            config.client_secret.clone(),
            config.redirect_uri.clone(),
        );

        Self {
            config: Arc::new(config),
            tips,
            oauth,
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Slash Command
// =============================================================================

/// Slash command endpoint.
///
/// This endpoint:
/// 1. Buffers the raw body
/// 2. Verifies the Slack signature over it
/// 3. Fetches one tip
/// 4. Replies in channel with the tip text
///
/// The outbound fetch lives inside this future, so a dropped request
/// aborts it.
pub async fn croak(State(state): State<AppState>, headers: HeaderMap, body: Body) -> Reply {
    let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(b) => b,
        Err(e) => {
            error!(error = %e, "croak_body_read_failed");
            return Reply::ephemeral(NO_TIPS);
        }
    };

    // verify_request logs the rejection reason
    if verify_request(
        state.config.signing_secret.as_deref(),
        &headers,
        &body,
        state.config.signature_max_age,
    )
    .is_err()
    {
        return Reply::ephemeral(NO_TIPS);
    }

    let command = SlashCommand::from_body(&body).unwrap_or_else(|e| {
        warn!(error = %e, "croak_command_decode_failed");
        SlashCommand::default()
    });

    info!(
        team_id = %command.team_id,
        user_id = %command.user_id,
        channel_id = %command.channel_id,
        command = %command.command,
        "croak_received"
    );

    match state.tips.fetch_tip().await {
        Ok(tip) => {
            info!(
                team_id = %command.team_id,
                tip_number = tip.number,
                "croak_tip_sent"
            );
            Reply::in_channel(tip.text)
        }
        Err(e) => {
            error!(
                error = %e,
                team_id = %command.team_id,
                tips_api_url = %state.config.tips_api_url,
                "croak_tip_fetch_failed"
            );
            Reply::ephemeral(NO_TIPS_COME_BACK)
        }
    }
}

// =============================================================================
// Install Callback
// =============================================================================

/// Parameters of the OAuth redirect.
///
/// Slack sends `code` on approval and `error` when the user cancels.
#[derive(Debug, Default, Deserialize)]
pub struct InstallParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Install callback with parameters in the query string.
pub async fn install(
    State(state): State<AppState>,
    params: Option<Query<InstallParams>>,
) -> &'static str {
    let params = params.map(|Query(p)| p).unwrap_or_default();
    complete_install(&state, params).await
}

/// Install callback with parameters in a form body.
pub async fn install_form(
    State(state): State<AppState>,
    params: Option<Form<InstallParams>>,
) -> &'static str {
    let params = params.map(|Form(p)| p).unwrap_or_default();
    complete_install(&state, params).await
}

async fn complete_install(state: &AppState, params: InstallParams) -> &'static str {
    match exchange(state, params).await {
        Ok(result) => {
            info!(
                app_id = %result.app_id,
                team_id = %result.team_id,
                "install_complete"
            );
            INSTALL_OK
        }
        Err(e) => {
            error!(error = %e, "install_failed");
            INSTALL_FAILED
        }
    }
}

async fn exchange(state: &AppState, params: InstallParams) -> Result<InstallResult, ExchangeError> {
    if let Some(reason) = params.error.filter(|e| !e.is_empty()) {
        return Err(ExchangeError::Denied(reason));
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or(ExchangeError::MissingCode)?;

    state.oauth.exchange_code(&code).await
}

//! Slash command reply payloads.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Who gets to see a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseType {
    /// Visible to the whole channel
    #[serde(rename = "in_channel")]
    InChannel,
    /// Visible only to the user who ran the command
    #[serde(rename = "ephemeral")]
    Ephemeral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub text: String,
}

/// JSON body Slack expects in answer to a slash command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub response_type: ResponseType,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Reply {
    pub fn in_channel(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::InChannel,
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Ephemeral,
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, text: impl Into<String>) -> Self {
        self.attachments.push(Attachment { text: text.into() });
        self
    }
}

/// Always 200 with `Content-Type: application/json`.
///
/// A serialization failure is logged and yields an empty body rather than
/// an error status.
impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let body = match serde_json::to_vec(&self) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(error = %e, reply = ?self, "reply_encode_failed");
                Vec::new()
            }
        };

        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

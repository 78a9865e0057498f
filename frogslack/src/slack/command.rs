//! Slash command form payload.

use serde::Deserialize;

/// Fields of a slash command invocation used for log context.
///
/// Slack sends more fields than these; unknown ones are ignored and
/// missing ones default to empty.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SlashCommand {
    #[serde(default)]
    pub team_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub text: String,
}

impl SlashCommand {
    /// Decode a URL-encoded slash command body.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_urlencoded::de::Error> {
        serde_urlencoded::from_bytes(body)
    }
}

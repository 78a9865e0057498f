//! Slack platform plumbing: request signing, slash command payloads and
//! the OAuth install exchange.

pub mod command;
pub mod oauth;
pub mod signature;

pub use command::SlashCommand;
pub use oauth::{InstallResult, OAuthClient};
pub use signature::{compute_signature, verify_request, SIGNATURE_HEADER, TIMESTAMP_HEADER};

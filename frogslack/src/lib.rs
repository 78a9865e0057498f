//! FrogSlack - a Slack slash command that answers with frog tips.
//!
//! The library holds everything the `frogslack` binary serves:
//! - `slack`: request signing, slash command payloads, OAuth install exchange
//! - `tips`: client for the upstream tips API
//! - `web`: axum handlers and reply formatting
//!
//! ## Request Flow
//!
//! ```text
//! Slack → /croak → verify signature → fetch tip → JSON reply
//! Slack → /install → exchange code → plain text reply
//! ```

pub mod config;
pub mod error;
pub mod slack;
pub mod tips;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use error::{ExchangeError, FetchError, VerificationError};
pub use tips::{Tip, TipsClient, TipsEnvelope};
pub use web::{router, AppState, Reply, ResponseType};

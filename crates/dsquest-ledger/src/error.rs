//! Ledger client error types.

use thiserror::Error;

/// Text shown to the player for any failed request.
pub const NETWORK_ERROR_TOAST: &str = "Network Error";

/// Errors that can occur when talking to the game backend.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The backend could not be reached or the request did not complete.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with an error status.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl LedgerError {
    /// The toast text for this failure. The game never shows backend
    /// details to the player.
    pub fn toast(&self) -> &'static str {
        NETWORK_ERROR_TOAST
    }
}

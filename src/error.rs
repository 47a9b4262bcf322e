//! Error definitions shared by every subsystem of the client.

use thiserror::Error;

/// Errors that can occur while building, submitting or locating messages.
#[derive(Debug, Error)]
pub enum MessageError {
    /// Malformed key material, mnemonic, or hex input.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Content could not be encoded, or a response could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Transport-level failure (connection, timeout, unexpected HTTP status).
    #[error("Network error: {0}")]
    Network(String),

    /// A lookup returned zero or several results, or a search was exhausted.
    #[error("Message not found: {0}")]
    NotFound(String),

    /// The signature does not recover to the expected sender.
    #[error("Invalid signature: expected {expected}, recovered {recovered}")]
    SignatureInvalid { expected: String, recovered: String },

    /// Inline content does not hash to the advertised item hash.
    #[error("Item hash mismatch: message carries {expected}, content hashes to {actual}")]
    HashMismatch { expected: String, actual: String },

    /// Confirmation was not observed within the wait budget.
    #[error("Message {hash} not confirmed after {waited_secs} seconds")]
    Timeout { hash: String, waited_secs: u64 },

    /// Local file access failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MessageError {
    fn from(e: serde_json::Error) -> Self {
        MessageError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for MessageError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            MessageError::Serialization(e.to_string())
        } else {
            MessageError::Network(e.to_string())
        }
    }
}

/// Result type for message operations.
pub type MessageResult<T> = Result<T, MessageError>;

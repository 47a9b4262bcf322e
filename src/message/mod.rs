//! Envelope model.
//!
//! # Data Flow
//! ```text
//! content (any Serialize)
//!     → envelope.rs (serialize once, SHA-256, sign)
//!     → Message (immutable after build)
//!     → client subsystem (submit, fetch, search, confirm)
//! ```

pub mod envelope;
pub mod types;

pub use envelope::{content_hash, unix_time, Message};
pub use types::{Chain, Confirmation, ItemType, MessageStatus, MessageType};

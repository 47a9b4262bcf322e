//! Client library for a decentralized message network.
//!
//! # Architecture Overview
//!
//! ```text
//!   content (aggregate, post, program, instance, forget, store)
//!       │
//!       ▼
//!   ┌──────────┐    ┌──────────┐    ┌──────────────────────────────┐
//!   │ message  │───▶│ signing  │───▶│ client                        │
//!   │ envelope │    │ account  │    │  broadcast (HTTP)             │
//!   │ + hash   │    │ + EIP-191│    │  search (paginated lookup)    │
//!   └──────────┘    └──────────┘    │  confirmation (poll loop)     │
//!                                   │  facade (account + channel)   │
//!                                   └──────────────────────────────┘
//!
//!   Cross-cutting: config (TOML), observability (tracing, metrics), error
//! ```
//!
//! Envelopes are serialized once, hashed with SHA-256 and signed with an
//! Ethereum personal-message signature over `chain\nsender\ntype\nitem_hash`.

pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod message;
pub mod observability;
pub mod signing;

pub use client::{MessageClient, MessageSource};
pub use config::ClientConfig;
pub use error::{MessageError, MessageResult};
pub use message::{Message, MessageType};
pub use signing::Account;

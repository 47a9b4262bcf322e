//! Typed message payloads.
//!
//! Envelopes treat content as opaque; these types only exist so callers can
//! publish well-formed payloads. Each payload knows its message kind and lets
//! the client stamp the sender address and creation time.

pub mod machine;

use serde::{Deserialize, Serialize};

use crate::message::types::{ItemType, MessageType};

pub use machine::{InstanceContent, ProgramContent};

/// A payload that can be published as the content of an envelope.
pub trait MessageContent: Serialize {
    /// Message kind the payload is published under.
    const MESSAGE_TYPE: MessageType;

    /// Record the publishing account and creation time.
    fn stamp(&mut self, address: &str, time: f64);
}

/// Content that references another item by hash.
///
/// This is the hash carried *inside* the payload, distinct from the
/// envelope's own `item_hash`.
pub trait InnerItemHash {
    fn inner_item_hash(&self) -> &str;
}

/// Minimal view of any payload exposing an `item_hash` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemHashRef {
    pub item_hash: String,
}

impl InnerItemHash for ItemHashRef {
    fn inner_item_hash(&self) -> &str {
        &self.item_hash
    }
}

/// Key/value aggregate owned by an address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateContent<T = serde_json::Value> {
    pub key: String,
    pub address: String,
    pub time: f64,
    pub content: T,
}

impl<T: Serialize> MessageContent for AggregateContent<T> {
    const MESSAGE_TYPE: MessageType = MessageType::Aggregate;

    fn stamp(&mut self, address: &str, time: f64) {
        self.address = address.to_string();
        self.time = time;
    }
}

/// Free-form post; `ref` links amendments to the original post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostContent<T = serde_json::Value> {
    #[serde(rename = "type")]
    pub post_type: String,
    pub address: String,
    pub time: f64,
    pub content: T,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl<T: Serialize> MessageContent for PostContent<T> {
    const MESSAGE_TYPE: MessageType = MessageType::Post;

    fn stamp(&mut self, address: &str, time: f64) {
        self.address = address.to_string();
        self.time = time;
    }
}

/// Soft-delete request for previously published messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgetContent {
    pub address: String,
    pub time: f64,
    pub hashes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MessageContent for ForgetContent {
    const MESSAGE_TYPE: MessageType = MessageType::Forget;

    fn stamp(&mut self, address: &str, time: f64) {
        self.address = address.to_string();
        self.time = time;
    }
}

/// Announcement of a stored file, referenced by its content hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreContent {
    pub address: String,
    pub time: f64,
    pub item_type: ItemType,
    pub item_hash: String,
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl MessageContent for StoreContent {
    const MESSAGE_TYPE: MessageType = MessageType::Store;

    fn stamp(&mut self, address: &str, time: f64) {
        self.address = address.to_string();
        self.time = time;
    }
}

impl InnerItemHash for StoreContent {
    fn inner_item_hash(&self) -> &str {
        &self.item_hash
    }
}

//! Request and response bodies of the network API.

use serde::{Deserialize, Serialize};

use crate::message::types::{MessageStatus, MessageType};
use crate::message::Message;

/// Query filters for `GET /api/v0/messages.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    pub hashes: Vec<String>,
    pub addresses: Vec<String>,
    pub channels: Vec<String>,
    pub message_types: Vec<MessageType>,
}

impl MessageFilter {
    /// Filter selecting a single message by its envelope hash.
    pub fn by_hash(hash: &str) -> Self {
        Self {
            hashes: vec![hash.to_string()],
            ..Self::default()
        }
    }

    /// Filter selecting one kind of message published by `address` in `channel`.
    pub fn owned(address: &str, channel: &str, message_type: MessageType) -> Self {
        Self {
            hashes: Vec::new(),
            addresses: vec![address.to_string()],
            channels: vec![channel.to_string()],
            message_types: vec![message_type],
        }
    }

    /// Encode as query pairs. List filters become repeated parameters.
    pub fn query_pairs(&self, page: u64, size: u64) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", page.to_string()), ("size", size.to_string())];
        pairs.extend(self.hashes.iter().map(|h| ("hashes", h.clone())));
        pairs.extend(self.addresses.iter().map(|a| ("addresses", a.clone())));
        pairs.extend(self.channels.iter().map(|c| ("channels", c.clone())));
        pairs.extend(self.message_types.iter().map(|t| ("msgTypes", t.as_str().to_string())));
        pairs
    }
}

/// One page of messages with its pagination counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetMessagesResponse {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub pagination_per_page: u64,
    #[serde(default)]
    pub pagination_page: u64,
    #[serde(default)]
    pub pagination_total: u64,
    #[serde(default)]
    pub pagination_item: String,
}

impl GetMessagesResponse {
    /// Items left after this page, clipped to zero.
    pub fn remaining(&self) -> u64 {
        remaining_items(self.pagination_total, self.pagination_page, self.pagination_per_page)
    }
}

/// `total - page * per_page`, clipped to zero.
pub fn remaining_items(total: u64, page: u64, per_page: u64) -> u64 {
    total.saturating_sub(page.saturating_mul(per_page))
}

/// Body of `POST /api/v0/messages` and of the upload `metadata` field.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastRequest<'a> {
    pub message: &'a Message,
    pub sync: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationStatus {
    pub status: MessageStatus,
    #[serde(default)]
    pub failed: Vec<String>,
}

/// Acceptance status returned when a message is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub publication_status: PublicationStatus,
    #[serde(default)]
    pub message_status: Option<MessageStatus>,
}

impl MessageResponse {
    /// Whether the network rejected the message.
    pub fn is_rejected(&self) -> bool {
        self.message_status == Some(MessageStatus::Rejected)
            || self.publication_status.status == MessageStatus::Rejected
    }
}

/// Result of `POST /api/v0/storage/add_file`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFileResponse {
    pub hash: String,
    pub status: MessageStatus,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPeriod {
    pub start_timestamp: String,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationNode {
    pub node_id: String,
    pub url: String,
    #[serde(default)]
    pub ipv6: Option<String>,
    #[serde(default)]
    pub supports_ipv6: bool,
}

/// Where the scheduler placed an instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerAllocation {
    pub vm_hash: String,
    pub vm_type: String,
    #[serde(default)]
    pub vm_ipv6: Option<String>,
    pub period: AllocationPeriod,
    pub node: AllocationNode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs_repeat_list_filters() {
        let filter = MessageFilter {
            hashes: vec!["a".into(), "b".into()],
            addresses: vec!["0x1".into()],
            channels: vec!["TEST".into()],
            message_types: vec![MessageType::Store, MessageType::Post],
        };
        let pairs = filter.query_pairs(3, 50);

        assert_eq!(pairs[0], ("page", "3".to_string()));
        assert_eq!(pairs[1], ("size", "50".to_string()));
        assert_eq!(pairs.iter().filter(|(k, _)| *k == "hashes").count(), 2);
        assert!(pairs.contains(&("msgTypes", "STORE".to_string())));
        assert!(pairs.contains(&("msgTypes", "POST".to_string())));
    }

    #[test]
    fn test_remaining_never_negative() {
        assert_eq!(remaining_items(120, 1, 50), 70);
        assert_eq!(remaining_items(120, 3, 50), 0);
        assert_eq!(remaining_items(0, 1, 50), 0);
        assert_eq!(remaining_items(10, u64::MAX, u64::MAX), 0);
    }

    #[test]
    fn test_message_response_parse() {
        let raw = json!({
            "publication_status": {"status": "success", "failed": []},
            "message_status": "pending"
        });
        let response: MessageResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(response.message_status, Some(MessageStatus::Pending));
        assert!(!response.is_rejected());

        let raw = json!({"publication_status": {"status": "rejected", "failed": ["p2p"]}});
        let response: MessageResponse = serde_json::from_value(raw).unwrap();
        assert!(response.is_rejected());
        assert_eq!(response.publication_status.failed, vec!["p2p".to_string()]);
    }

    #[test]
    fn test_allocation_parse() {
        let raw = json!({
            "vm_hash": "abc",
            "vm_type": "instance",
            "vm_ipv6": "2a01:240::1",
            "period": {"start_timestamp": "2024-01-01T00:00:00Z", "duration_seconds": 3600.0},
            "node": {"node_id": "n1", "url": "https://crn.example", "ipv6": "2a01:240::", "supports_ipv6": true}
        });
        let allocation: SchedulerAllocation = serde_json::from_value(raw).unwrap();
        assert_eq!(allocation.node.url, "https://crn.example");
        assert!(allocation.node.supports_ipv6);
        assert_eq!(allocation.period.duration_seconds, 3600.0);
    }
}

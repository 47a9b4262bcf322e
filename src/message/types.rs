//! Wire-level enums and records of the message network.
//!
//! Every string value here is part of the public wire contract and must
//! serialize byte-for-byte as shown.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of content an envelope carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    Aggregate,
    Forget,
    Program,
    Post,
    Store,
    Instance,
}

impl MessageType {
    /// All message kinds, in wire order.
    pub const ALL: [MessageType; 6] = [
        MessageType::Aggregate,
        MessageType::Forget,
        MessageType::Program,
        MessageType::Post,
        MessageType::Store,
        MessageType::Instance,
    ];

    /// Wire representation (e.g. `"AGGREGATE"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Aggregate => "AGGREGATE",
            MessageType::Forget => "FORGET",
            MessageType::Program => "PROGRAM",
            MessageType::Post => "POST",
            MessageType::Store => "STORE",
            MessageType::Instance => "INSTANCE",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MessageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown message type '{}'", s))
    }
}

/// Chain the sender's key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Chain {
    #[default]
    #[serde(rename = "ETH")]
    Ethereum,
}

impl Chain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Ethereum => "ETH",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the content of an envelope (or of a store payload) is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    /// Content embedded in `item_content`.
    #[default]
    Inline,
    /// Content held by the network storage engine.
    Storage,
    /// Content pinned on IPFS.
    Ipfs,
}

/// Processing status reported by the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Success,
    Pending,
    Processed,
    Rejected,
    Forgotten,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Success => "success",
            MessageStatus::Pending => "pending",
            MessageStatus::Processed => "processed",
            MessageStatus::Rejected => "rejected",
            MessageStatus::Forgotten => "forgotten",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Network-side attestation that a message was anchored on a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    pub chain: Chain,
    pub hash: String,
    pub height: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_type_wire_names() {
        assert_eq!(serde_json::to_string(&MessageType::Aggregate).unwrap(), "\"AGGREGATE\"");
        assert_eq!(serde_json::to_string(&MessageType::Instance).unwrap(), "\"INSTANCE\"");
        for t in MessageType::ALL {
            assert_eq!(serde_json::to_string(&t).unwrap(), format!("\"{}\"", t));
        }
    }

    #[test]
    fn test_message_type_from_str() {
        assert_eq!("post".parse::<MessageType>().unwrap(), MessageType::Post);
        assert_eq!("STORE".parse::<MessageType>().unwrap(), MessageType::Store);
        assert!("bogus".parse::<MessageType>().is_err());
    }

    #[test]
    fn test_chain_and_item_type() {
        assert_eq!(serde_json::to_string(&Chain::Ethereum).unwrap(), "\"ETH\"");
        assert_eq!(serde_json::to_string(&ItemType::Ipfs).unwrap(), "\"ipfs\"");
        let status: MessageStatus = serde_json::from_str("\"processed\"").unwrap();
        assert_eq!(status, MessageStatus::Processed);
    }
}

//! Signed, content-addressed envelopes.
//!
//! # Responsibilities
//! - Serialize arbitrary content exactly once
//! - Hash the serialized string (SHA-256) into `item_hash`
//! - Sign the envelope and check both invariants on received envelopes

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

use alloy::primitives::hex;

use crate::error::{MessageError, MessageResult};
use crate::message::types::{Chain, Confirmation, ItemType, MessageType};
use crate::signing::{signer, Account};

/// A signed envelope as submitted to and returned by the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub chain: Chain,
    pub sender: String,
    pub time: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub channel: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub signature: String,

    pub item_hash: String,
    pub item_type: ItemType,
    /// Serialized content; present for inline envelopes only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_content: Option<String>,

    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub confirmations: Vec<Confirmation>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub confirmed: bool,
}

impl Message {
    /// Build and sign an inline envelope around `content`.
    ///
    /// The content is serialized once; the same string is hashed and stored
    /// in `item_content`.
    pub fn build<C: Serialize + ?Sized>(
        account: &Account,
        channel: &str,
        message_type: MessageType,
        content: &C,
        time: f64,
    ) -> MessageResult<Self> {
        let item_content = serde_json::to_string(content)?;
        let item_hash = content_hash(item_content.as_bytes());
        let sender = account.address_string();

        let signature = signer::sign(account, Chain::Ethereum, &sender, message_type, &item_hash)?;

        tracing::debug!(
            item_hash = %item_hash,
            message_type = %message_type,
            channel = channel,
            "Envelope built"
        );

        Ok(Self {
            message_type,
            chain: Chain::Ethereum,
            sender,
            time,
            channel: channel.to_string(),
            signature,
            item_hash,
            item_type: ItemType::Inline,
            item_content: Some(item_content),
            confirmations: Vec::new(),
            confirmed: false,
        })
    }

    /// The payload covered by the signature.
    pub fn verification_payload(&self) -> String {
        signer::verification_payload(self.chain, &self.sender, self.message_type, &self.item_hash)
    }

    /// Check that the signature recovers to `sender`.
    pub fn verify_signature(&self) -> MessageResult<()> {
        signer::verify(
            &self.signature,
            self.chain,
            &self.sender,
            self.message_type,
            &self.item_hash,
        )
    }

    /// Check that inline content hashes to `item_hash`.
    ///
    /// Non-inline envelopes reference external content and always pass.
    pub fn verify_item_hash(&self) -> MessageResult<()> {
        if self.item_type != ItemType::Inline {
            return Ok(());
        }

        let content = self.item_content.as_deref().ok_or_else(|| {
            MessageError::Serialization(format!("Inline message {} has no content", self.item_hash))
        })?;

        let actual = content_hash(content.as_bytes());
        if !actual.eq_ignore_ascii_case(&self.item_hash) {
            return Err(MessageError::HashMismatch {
                expected: self.item_hash.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Check both envelope invariants.
    pub fn verify(&self) -> MessageResult<()> {
        self.verify_item_hash()?;
        self.verify_signature()
    }

    /// Parse the inline content as `T`.
    pub fn decode_content<T: DeserializeOwned>(&self) -> MessageResult<T> {
        let content = self.item_content.as_deref().ok_or_else(|| {
            MessageError::Serialization(format!("Message {} has no inline content", self.item_hash))
        })?;
        Ok(serde_json::from_str(content)?)
    }
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Current Unix time in seconds, with millisecond precision.
pub fn unix_time() -> f64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    millis as f64 / 1000.0
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

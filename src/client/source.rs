//! Read access to the message index.
//!
//! Search and confirmation polling only need to read pages of messages, so
//! they are written against this trait rather than the HTTP client.

use async_trait::async_trait;

use crate::client::types::{GetMessagesResponse, MessageFilter};
use crate::error::{MessageError, MessageResult};
use crate::message::Message;

/// Page size used for hash lookups. Larger than one so duplicates are seen.
pub const HASH_LOOKUP_PAGE_SIZE: u64 = 20;

#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetch one page of messages matching `filter`.
    async fn get_messages(
        &self,
        filter: &MessageFilter,
        page: u64,
        size: u64,
    ) -> MessageResult<GetMessagesResponse>;

    /// Fetch the single message whose envelope hash is `hash`.
    async fn get_message_by_hash(&self, hash: &str) -> MessageResult<Message> {
        let response = self
            .get_messages(&MessageFilter::by_hash(hash), 1, HASH_LOOKUP_PAGE_SIZE)
            .await?;
        single_message(hash, response)
    }
}

/// Exactly one message, or [`MessageError::NotFound`].
pub fn single_message(hash: &str, response: GetMessagesResponse) -> MessageResult<Message> {
    let mut messages = response.messages;
    match messages.len() {
        1 => Ok(messages.remove(0)),
        count => Err(MessageError::NotFound(format!(
            "hash {} matched {} messages",
            hash, count
        ))),
    }
}

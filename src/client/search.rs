//! Locate a message by the hash carried inside its content.
//!
//! The caller knows the hash embedded in a payload (for example the hash of
//! an uploaded file) but not the envelope hash. Pages of messages matching a
//! filter are scanned in order until a payload's `item_hash` matches.
//!
//! # Termination
//! `page` strictly increases and `remaining = total - page * per_page` is
//! clipped at zero, so the scan stops after at most `ceil(total / per_page)`
//! pages and never requests the same page twice.

use serde::de::DeserializeOwned;

use crate::client::source::MessageSource;
use crate::client::types::{remaining_items, MessageFilter};
use crate::content::{InnerItemHash, ItemHashRef};
use crate::error::{MessageError, MessageResult};
use crate::message::Message;
use crate::observability::metrics;

/// Exhaustive paginated scan over a filtered message set.
pub struct PaginatedSearch<'a, S: ?Sized> {
    source: &'a S,
    filter: MessageFilter,
    page_size: u64,
}

impl<'a, S: MessageSource + ?Sized> PaginatedSearch<'a, S> {
    pub fn new(source: &'a S, filter: MessageFilter, page_size: u64) -> Self {
        Self {
            source,
            filter,
            page_size: page_size.max(1),
        }
    }

    /// Find the first message whose content carries `item_hash == target`.
    pub async fn find_by_inner_hash(&self, target: &str) -> MessageResult<Message> {
        self.find::<ItemHashRef>(target).await
    }

    /// Like [`find_by_inner_hash`](Self::find_by_inner_hash), parsing content as `C`.
    ///
    /// Messages whose content does not parse as `C` are skipped.
    pub async fn find<C>(&self, target: &str) -> MessageResult<Message>
    where
        C: DeserializeOwned + InnerItemHash,
    {
        let mut page = 1u64;

        loop {
            let response = self
                .source
                .get_messages(&self.filter, page, self.page_size)
                .await?;
            metrics::record_search_page();

            let per_page = if response.pagination_per_page > 0 {
                response.pagination_per_page
            } else {
                self.page_size
            };
            let remaining = remaining_items(response.pagination_total, page, per_page);
            let exhausted = remaining == 0 || response.messages.is_empty();

            tracing::debug!(
                page = page,
                fetched = response.messages.len(),
                remaining = remaining,
                "Scanned message page"
            );

            if let Some(found) = response
                .messages
                .into_iter()
                .find(|message| inner_hash_matches::<C>(message, target))
            {
                tracing::debug!(item_hash = %found.item_hash, page = page, "Found message by inner hash");
                return Ok(found);
            }

            if exhausted {
                break;
            }
            page += 1;
        }

        Err(MessageError::NotFound(format!(
            "no message with inner item hash {} after {} page(s)",
            target, page
        )))
    }
}

fn inner_hash_matches<C>(message: &Message, target: &str) -> bool
where
    C: DeserializeOwned + InnerItemHash,
{
    let Some(raw) = message.item_content.as_deref() else {
        return false;
    };

    match serde_json::from_str::<C>(raw) {
        Ok(content) => content.inner_item_hash() == target,
        Err(e) => {
            tracing::debug!(item_hash = %message.item_hash, error = %e, "Skipping unparseable content");
            false
        }
    }
}

//! In-memory message index for unit tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::client::source::MessageSource;
use crate::client::types::{GetMessagesResponse, MessageFilter};
use crate::error::{MessageError, MessageResult};
use crate::message::Message;

/// Paginates a fixed list of messages.
#[derive(Default)]
pub struct MemorySource {
    pub messages: Vec<Message>,
    confirm_from_call: Option<u64>,
    latency: Option<Duration>,
    fail: bool,
    calls: AtomicU64,
    pages: Mutex<Vec<u64>>,
}

impl MemorySource {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }

    /// Fail every call with a network error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Report messages as confirmed starting from this call number (1-based).
    pub fn confirming_from(mut self, call: u64) -> Self {
        self.confirm_from_call = Some(call);
        self
    }

    /// Delay every call by `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn pages(&self) -> Vec<u64> {
        self.pages.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSource for MemorySource {
    async fn get_messages(
        &self,
        filter: &MessageFilter,
        page: u64,
        size: u64,
    ) -> MessageResult<GetMessagesResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.pages.lock().unwrap().push(page);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if self.fail {
            return Err(MessageError::Network("connection refused".to_string()));
        }

        let confirmed = self.confirm_from_call.is_some_and(|from| call >= from);
        let matching: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| filter.hashes.is_empty() || filter.hashes.contains(&m.item_hash))
            .cloned()
            .map(|mut m| {
                m.confirmed = m.confirmed || confirmed;
                m
            })
            .collect();

        let start = ((page.saturating_sub(1)) * size) as usize;
        let messages = matching.iter().skip(start).take(size as usize).cloned().collect();

        Ok(GetMessagesResponse {
            messages,
            pagination_per_page: size,
            pagination_page: page,
            pagination_total: matching.len() as u64,
            pagination_item: "messages".to_string(),
        })
    }
}

//! Confirmation monitoring.
//!
//! # States
//! ```text
//! Pending → Confirmed: fetched message reports `confirmed = true`
//! Pending → TimedOut:  elapsed time since the first fetch exceeds the timeout
//! Pending → Pending:   sleep `interval`, fetch again
//! ```
//!
//! The first fetch happens before any sleep, so an already confirmed message
//! returns immediately. Elapsed time is measured from the end of the first
//! fetch. A failed fetch aborts the wait as a network error; nothing is retried.

use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::client::source::MessageSource;
use crate::error::{MessageError, MessageResult};
use crate::message::Message;
use crate::observability::metrics;

/// State of a confirmation wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Not confirmed yet, still within the wait budget.
    Pending,
    /// The network reports the message as confirmed.
    Confirmed,
    /// The wait budget elapsed without confirmation.
    TimedOut,
}

impl PollState {
    /// State reached after a fetch.
    pub fn after_fetch(confirmed: bool, elapsed: Duration, timeout: Duration) -> Self {
        if confirmed {
            PollState::Confirmed
        } else if elapsed > timeout {
            PollState::TimedOut
        } else {
            PollState::Pending
        }
    }
}

/// Polls a message by hash until it is confirmed.
pub struct ConfirmationPoller<'a, S: ?Sized> {
    source: &'a S,
    timeout: Duration,
    interval: Duration,
}

impl<'a, S: MessageSource + ?Sized> ConfirmationPoller<'a, S> {
    /// Create a poller.
    ///
    /// # Arguments
    /// * `timeout` - Maximum time to wait after the first fetch
    /// * `interval` - Delay between fetches
    pub fn new(source: &'a S, timeout: Duration, interval: Duration) -> Self {
        Self {
            source,
            timeout,
            interval,
        }
    }

    /// Wait until the message with envelope hash `hash` is confirmed.
    ///
    /// Returns the confirmed message, or [`MessageError::Timeout`].
    pub async fn wait_for_confirmation(&self, hash: &str) -> MessageResult<Message> {
        let mut started: Option<Instant> = None;
        let mut attempts = 0u32;

        loop {
            let message = self
                .source
                .get_message_by_hash(hash)
                .await
                .map_err(|e| fetch_error(hash, e))?;
            attempts += 1;
            metrics::record_confirmation_poll();

            let elapsed = started.get_or_insert_with(Instant::now).elapsed();
            match PollState::after_fetch(message.confirmed, elapsed, self.timeout) {
                PollState::Confirmed => {
                    tracing::info!(
                        hash = %hash,
                        attempts = attempts,
                        confirmations = message.confirmations.len(),
                        "Message confirmed"
                    );
                    return Ok(message);
                }
                PollState::TimedOut => {
                    tracing::warn!(hash = %hash, attempts = attempts, "Message confirmation timed out");
                    return Err(MessageError::Timeout {
                        hash: hash.to_string(),
                        waited_secs: elapsed.as_secs(),
                    });
                }
                PollState::Pending => {
                    tracing::debug!(hash = %hash, attempts = attempts, "Message pending");
                    sleep(self.interval).await;
                }
            }
        }
    }
}

fn fetch_error(hash: &str, error: MessageError) -> MessageError {
    tracing::warn!(hash = %hash, error = %error, "Confirmation fetch failed");
    match error {
        MessageError::Network(_) => error,
        other => MessageError::Network(format!("Fetching {} failed: {}", hash, other)),
    }
}

//! Account-bound client.
//!
//! Binds an [`Account`] and a channel to a [`BroadcastClient`] and exposes the
//! per-kind operations: publish content, forget, store files, list and locate
//! messages, wait for confirmations and look up instance allocations.

use serde::Serialize;
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;

use crate::client::broadcast::BroadcastClient;
use crate::client::confirmation::ConfirmationPoller;
use crate::client::search::PaginatedSearch;
use crate::client::source::MessageSource;
use crate::client::types::{GetMessagesResponse, MessageFilter, MessageResponse, SchedulerAllocation, StoreFileResponse};
use crate::config::schema::ClientConfig;
use crate::content::{
    AggregateContent, ForgetContent, InstanceContent, MessageContent, PostContent, ProgramContent,
    StoreContent,
};
use crate::error::{MessageError, MessageResult};
use crate::message::types::{ItemType, MessageType};
use crate::message::{content_hash, unix_time, Message};
use crate::signing::Account;

/// A file stored on the network and the message announcing it.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// The STORE message as indexed by the network.
    pub message: Message,
    /// Upload result, including the storage hash of the file.
    pub upload: StoreFileResponse,
}

/// Client bound to one account and channel.
#[derive(Debug, Clone)]
pub struct MessageClient {
    account: Account,
    channel: String,
    network: BroadcastClient,
    page_size: u64,
    confirmation_timeout: Duration,
    confirmation_interval: Duration,
    store_settle: Duration,
}

impl MessageClient {
    /// Create a client from configuration.
    pub fn new(account: Account, config: &ClientConfig) -> MessageResult<Self> {
        let network = BroadcastClient::new(&config.api)?;

        tracing::info!(
            address = %account.address_string(),
            channel = %config.account.channel,
            api_url = %network.api_url(),
            "Message client initialized"
        );

        Ok(Self {
            account,
            channel: config.account.channel.clone(),
            network,
            page_size: config.search.page_size,
            confirmation_timeout: Duration::from_secs(config.confirmation.timeout_secs),
            confirmation_interval: Duration::from_secs(config.confirmation.interval_secs),
            store_settle: Duration::from_secs(config.storage.settle_secs),
        })
    }

    /// Use another channel for subsequent operations.
    pub fn with_channel(mut self, channel: &str) -> Self {
        self.channel = channel.to_string();
        self
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn network(&self) -> &BroadcastClient {
        &self.network
    }

    /// Publish a payload under its own message kind.
    ///
    /// The payload's address and time are overwritten with the account
    /// address and the current time, which is also the envelope time.
    pub async fn publish<C: MessageContent>(
        &self,
        mut content: C,
    ) -> MessageResult<(Message, MessageResponse)> {
        let now = unix_time();
        content.stamp(&self.account.address_string(), now);
        self.send(C::MESSAGE_TYPE, &content, now).await
    }

    /// Build, sign and submit arbitrary content without waiting for acceptance.
    pub async fn send<C: Serialize + ?Sized>(
        &self,
        message_type: MessageType,
        content: &C,
        time: f64,
    ) -> MessageResult<(Message, MessageResponse)> {
        let message = Message::build(&self.account, &self.channel, message_type, content, time)?;
        let response = self.network.submit(&message, false).await?;
        Ok((message, response))
    }

    pub async fn create_aggregate<T: Serialize>(
        &self,
        aggregate: AggregateContent<T>,
    ) -> MessageResult<(Message, MessageResponse)> {
        self.publish(aggregate).await
    }

    pub async fn create_post<T: Serialize>(
        &self,
        post: PostContent<T>,
    ) -> MessageResult<(Message, MessageResponse)> {
        self.publish(post).await
    }

    pub async fn create_program(
        &self,
        program: ProgramContent,
    ) -> MessageResult<(Message, MessageResponse)> {
        self.publish(program).await
    }

    pub async fn create_instance(
        &self,
        instance: InstanceContent,
    ) -> MessageResult<(Message, MessageResponse)> {
        self.publish(instance).await
    }

    /// Soft-delete a message by publishing a FORGET message referencing it.
    pub async fn forget(
        &self,
        hash: &str,
        reason: Option<String>,
    ) -> MessageResult<(Message, MessageResponse)> {
        self.publish(ForgetContent {
            address: String::new(),
            time: 0.0,
            hashes: vec![hash.to_string()],
            reason,
        })
        .await
    }

    /// Upload a file and return the STORE message the network indexed for it.
    ///
    /// After the upload the client waits for the configured settle delay,
    /// then locates the announcing message by the file's storage hash.
    pub async fn store_file(&self, path: &Path) -> MessageResult<StoredFile> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| MessageError::Decode(format!("Invalid file name: {}", path.display())))?
            .to_string();

        let now = unix_time();
        let content = StoreContent {
            address: self.account.address_string(),
            time: now,
            item_type: ItemType::Storage,
            item_hash: content_hash(&bytes),
            reference: None,
        };
        let message = Message::build(&self.account, &self.channel, MessageType::Store, &content, now)?;

        let upload = self.network.upload_file(&message, &file_name, bytes).await?;

        if !self.store_settle.is_zero() {
            tracing::debug!(settle_secs = self.store_settle.as_secs(), "Waiting for store message to be indexed");
            sleep(self.store_settle).await;
        }

        let message = self.find_by_item_hash(MessageType::Store, &upload.hash).await?;
        Ok(StoredFile { message, upload })
    }

    /// One page of this account's messages of a kind in the bound channel.
    pub async fn messages(
        &self,
        message_type: MessageType,
        page: u64,
        size: u64,
    ) -> MessageResult<GetMessagesResponse> {
        self.network
            .get_messages(&self.owned_filter(message_type), page, size)
            .await
    }

    /// Locate this account's message of a kind whose content carries `hash`.
    pub async fn find_by_item_hash(
        &self,
        message_type: MessageType,
        hash: &str,
    ) -> MessageResult<Message> {
        PaginatedSearch::new(&self.network, self.owned_filter(message_type), self.page_size)
            .find_by_inner_hash(hash)
            .await
    }

    /// Fetch a message by its envelope hash.
    pub async fn message_by_hash(&self, hash: &str) -> MessageResult<Message> {
        self.network.get_message_by_hash(hash).await
    }

    /// Wait for a message to be confirmed, using the configured budget.
    pub async fn wait_for_confirmation(&self, hash: &str) -> MessageResult<Message> {
        ConfirmationPoller::new(&self.network, self.confirmation_timeout, self.confirmation_interval)
            .wait_for_confirmation(hash)
            .await
    }

    /// Scheduler allocation of an instance.
    pub async fn instance_allocation(&self, hash: &str) -> MessageResult<SchedulerAllocation> {
        self.network.get_allocation(hash).await
    }

    fn owned_filter(&self, message_type: MessageType) -> MessageFilter {
        MessageFilter::owned(&self.account.address_string(), &self.channel, message_type)
    }
}

//! Network client subsystem.
//!
//! # Data Flow
//! ```text
//! Message (signed envelope)
//!     → broadcast.rs (submit, upload, query over HTTP)
//!     → confirmation.rs (poll by hash until confirmed or timed out)
//!     → search.rs (scan pages to locate a message by inner content hash)
//!
//! facade.rs binds an account and channel on top of all three.
//! ```
//!
//! # Constraints
//! - No retries: failures are returned to the caller as typed errors
//! - No background tasks; every call completes its round trips before returning
//! - The HTTP connection pool is the only state shared between calls

pub mod broadcast;
pub mod confirmation;
pub mod facade;
pub mod search;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use broadcast::BroadcastClient;
pub use confirmation::{ConfirmationPoller, PollState};
pub use facade::{MessageClient, StoredFile};
pub use search::PaginatedSearch;
pub use source::MessageSource;
pub use types::{GetMessagesResponse, MessageFilter, MessageResponse, SchedulerAllocation};

//! Key management and envelope signatures.
//!
//! # Data Flow
//! ```text
//! private key / mnemonic / environment
//!     → account.rs (key loading, address derivation)
//!     → signer.rs (verification payload, EIP-191 digest, recoverable signature)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - Signing is pure: the key never leaves the `Account`

pub mod account;
pub mod signer;

pub use account::Account;

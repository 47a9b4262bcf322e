//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! client subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters via the metrics facade)
//!
//! Consumers:
//!     → stderr (fmt layer, filtered by RUST_LOG or config)
//!     → whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a subscriber or recorder itself; the binary does
//! - Metrics are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

//! Run lifecycle.
//!
//! # Data Flow
//! ```text
//! generate.rs:
//!     lock.rs (exclusive flock on <nginx-out>.lock)
//!     → config::load_config → routing::synthesize
//!     → output.rs (atomic write: registry, then nginx config)
//!     → lock released on drop
//! ```
//!
//! # Design Decisions
//! - One run is one full regeneration; no state survives between runs
//! - Concurrent runs are serialized, last writer renders the latest input
//! - Writes are atomic renames, never in-place truncation

pub mod generate;
pub mod lock;
pub mod output;

pub use generate::{run, GenerateOptions, GenerateReport};

//! Route synthesis subsystem.
//!
//! # Data Flow
//! ```text
//! ProxyConfig.apps (validated, input order)
//!     → strategy.rs (explicit override or keyword auto-detection)
//!     → token.rs (percent-encode the shared secret)
//!     → route.rs (RouteBlock: prefix, upstream, headers, timeouts)
//!     → synthesizer.rs (render config text + registry)
//! ```
//!
//! # Design Decisions
//! - Route blocks are plain data, rendering lives in `render`
//! - Strategy is an enum carrying its own fields; adding one is additive
//! - Deterministic: same input always yields the same routes, in input order

pub mod route;
pub mod strategy;
pub mod synthesizer;
pub mod token;

pub use route::RouteBlock;
pub use strategy::{Strategy, StrategyKind};
pub use synthesizer::{synthesize, Synthesis};
pub use token::EncodedToken;

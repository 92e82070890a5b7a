//! Output rendering.
//!
//! The two artifacts are produced here and nowhere else:
//! - `nginx.rs`: nginx configuration text from `RouteBlock`s
//! - `registry.rs`: landing page registry JSON
//!
//! `writer.rs` owns nginx quoting and regex escaping, so the rest of the
//! crate deals only in plain values.

pub mod nginx;
pub mod registry;
pub mod writer;

pub use nginx::render_config;
pub use registry::{AppRegistry, AppRegistryEntry};

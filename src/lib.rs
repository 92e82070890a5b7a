//! Multi-app reverse proxy configuration generator.
//!
//! Turns a declarative list of backend apps into an nginx configuration that
//! exposes each app under its own path prefix on one front door, plus the
//! app registry the landing page renders.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod render;
pub mod rewrite;
pub mod routing;
pub mod stores;

pub use config::schema::ProxyConfig;
pub use error::{Error, Result};
pub use routing::{synthesize, Synthesis};

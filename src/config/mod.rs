//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! input document (YAML / JSON / TOML)
//!     → loader.rs (read & deserialize into ProxyDocument)
//!     → validation.rs (required keys, paths, urls, collisions)
//!     → ProxyConfig (validated, immutable)
//!     → routing::synthesize
//!
//! INGRESS_ENTRY
//!     → ingress.rs (Ingress, log level selection)
//! ```
//!
//! # Design Decisions
//! - Config is read fresh on every run; nothing is cached between runs
//! - All optional fields have defaults to allow minimal documents
//! - Validation separates syntactic (serde) from semantic checks

pub mod ingress;
pub mod loader;
pub mod schema;
pub mod validation;

pub use ingress::Ingress;
pub use loader::{load_config, ConfigError};
pub use schema::{
    AppDescriptor, AppEntry, GlobalSettings, ProxyConfig, ProxyDocument, RewriteMode,
    ServerSettings,
};
pub use validation::{validate_document, validate_ingress, ValidationError};

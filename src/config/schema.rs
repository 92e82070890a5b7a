//! Configuration schema definitions.
//!
//! Two layers live here. [`ProxyDocument`] is the raw input document exactly
//! as the UI or the user wrote it: every field is optional so that a missing
//! key can be reported by name instead of surfacing as a generic parse error.
//! [`ProxyConfig`] is the validated form produced by
//! [`crate::config::validation`], and is the only thing the synthesizer sees.

use serde::{Deserialize, Serialize};

use crate::config::ingress::Ingress;

/// Root of the input document.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyDocument {
    /// Applications to expose behind the front door.
    pub apps: Vec<AppEntry>,

    /// Debug mode: verbose nginx error log, forwarded to the landing page.
    pub debug: bool,

    /// Front door settings. Optional, every field has a default.
    pub server: ServerSettings,
}

/// One application entry as written in the input document.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppEntry {
    pub name: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub logo: Option<String>,
    pub category: Option<String>,
    pub path: Option<String>,
    pub token: Option<String>,

    /// Explicit strategy override. Absent means auto-detect from the name.
    #[serde(alias = "rewriteMode", alias = "rewrite_mode")]
    pub rewrite: Option<bool>,
}

/// Settings of the shared front door.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerSettings {
    /// Internal port the generated server block listens on.
    pub listen_port: u16,

    /// DNS resolver used by nginx to resolve upstream host names.
    pub resolver: String,

    /// The only address allowed to reach app routes.
    pub trusted_gateway: String,

    /// Directory holding the landing page, its static files and the registry.
    pub web_root: String,

    /// File name of the registry document under `web_root`.
    pub registry_file: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen_port: 8099,
            resolver: "172.30.32.3".to_string(),
            trusted_gateway: "172.30.32.2".to_string(),
            web_root: "/app".to_string(),
            registry_file: "apps.json".to_string(),
        }
    }
}

/// Tri-state strategy override carried by a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewriteMode {
    /// Decide from the application name.
    #[default]
    Auto,
    /// Always use the rewrite strategy.
    Enabled,
    /// Always use the transparent strategy.
    Disabled,
}

impl From<Option<bool>> for RewriteMode {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => RewriteMode::Enabled,
            Some(false) => RewriteMode::Disabled,
            None => RewriteMode::Auto,
        }
    }
}

/// A validated application descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDescriptor {
    pub name: String,
    pub url: String,
    pub description: String,
    pub icon: String,
    pub logo: String,
    pub category: String,
    /// Path prefix without trailing slash, e.g. `/grafana`.
    pub path: String,
    /// Raw shared secret. Never empty when present.
    pub token: Option<String>,
    pub rewrite: RewriteMode,
}

/// Validated configuration, ready for synthesis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProxyConfig {
    pub apps: Vec<AppDescriptor>,
    pub debug: bool,
    pub server: ServerSettings,
}

/// Run-wide settings that are not per app.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlobalSettings {
    pub debug: bool,
    pub ingress: Ingress,
}

impl GlobalSettings {
    pub fn new(debug: bool, ingress: Ingress) -> Self {
        Self { debug, ingress }
    }
}

/// Default category for entries that do not name one.
pub const DEFAULT_CATEGORY: &str = "default";

/// Path prefix derived from an application name: `"My App"` becomes `/my-app`.
pub fn default_path(name: &str) -> String {
    format!("/{}", name.to_lowercase().replace(' ', "-"))
}

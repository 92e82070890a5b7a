//! Base-path handling behind an ingress gateway.
//!
//! When an upstream gateway serves this front door under its own prefix, it
//! strips that prefix before forwarding, so the internal base path stays
//! root. The entry value is only forwarded to backends.

/// Ingress entry used when none is supplied.
pub const ROOT_ENTRY: &str = "/";

/// Externally supplied ingress entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingress {
    entry: String,
}

impl Ingress {
    /// An empty value is treated as the root entry.
    pub fn new(entry: impl Into<String>) -> Self {
        let entry = entry.into();
        let entry = if entry.trim().is_empty() {
            ROOT_ENTRY.to_string()
        } else {
            entry
        };
        Self { entry }
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// True when an upstream gateway strips a prefix before traffic arrives.
    pub fn is_active(&self) -> bool {
        self.entry != ROOT_ENTRY
    }

    /// Internal base path. Always root, the gateway already stripped its prefix.
    pub fn base_path(&self) -> &'static str {
        ""
    }
}

impl Default for Ingress {
    fn default() -> Self {
        Self::new(ROOT_ENTRY)
    }
}

/// nginx error log level for the given debug flag.
pub fn error_log_level(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "warn"
    }
}

//! Configuration validation.
//!
//! # Responsibilities
//! - Turn raw entries into descriptors, failing fast on a missing required key
//! - Normalize and check path prefixes
//! - Check upstream URL syntax (never reachability)
//! - Detect colliding path prefixes, including the front door's own routes
//!
//! # Design Decisions
//! - A missing `name` or `url` aborts at the first offending entry
//! - All other problems are collected and returned together
//! - Validation is a pure function: ProxyDocument → Result<ProxyConfig, ConfigError>

use std::collections::HashMap;

use thiserror::Error;
use url::Url;

use crate::config::ingress::Ingress;
use crate::config::loader::ConfigError;
use crate::config::schema::{
    default_path, AppDescriptor, AppEntry, ProxyConfig, ProxyDocument, ServerSettings,
    DEFAULT_CATEGORY,
};

/// Characters that would break out of an unquoted nginx argument or start a variable.
const BARE_WORD_FORBIDDEN: &[char] = &[';', '{', '}', '\'', '"', '$', '\\', '#'];

/// Paths are always quoted when rendered, so only variable expansion and
/// line structure are at risk.
fn path_char_allowed(c: char) -> bool {
    c != '$' && !c.is_whitespace() && !c.is_control()
}

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("app `{app}` has invalid path `{path}`: {reason}")]
    InvalidPath {
        app: String,
        path: String,
        reason: &'static str,
    },

    #[error("app `{app}` has invalid url `{url}`: {reason}")]
    InvalidUrl {
        app: String,
        url: String,
        reason: String,
    },

    #[error("path `{path}` is used by both `{first}` and `{second}`")]
    DuplicatePath {
        path: String,
        first: String,
        second: String,
    },

    #[error("app `{app}` uses reserved path `{path}`")]
    ReservedPath { app: String, path: String },

    #[error("ingress entry `{entry}` is invalid: {reason}")]
    InvalidIngress { entry: String, reason: &'static str },

    #[error("server.{field} is invalid: {reason}")]
    InvalidServer {
        field: &'static str,
        reason: &'static str,
    },
}

/// Validate a raw document and produce the configuration used for synthesis.
pub fn validate_document(document: &ProxyDocument) -> Result<ProxyConfig, ConfigError> {
    let apps = document
        .apps
        .iter()
        .enumerate()
        .map(|(index, entry)| descriptor_from_entry(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let mut errors = Vec::new();
    validate_server(&document.server, &mut errors);
    for app in &apps {
        validate_path(app, &mut errors);
        validate_url(app, &mut errors);
    }
    validate_unique_paths(&apps, &document.server, &mut errors);

    if !errors.is_empty() {
        return Err(ConfigError::Invalid(errors));
    }

    Ok(ProxyConfig {
        apps,
        debug: document.debug,
        server: document.server.clone(),
    })
}

/// Check the externally supplied ingress entry before it reaches nginx.
pub fn validate_ingress(ingress: &Ingress) -> Result<(), ConfigError> {
    let entry = ingress.entry();
    let reason = if !entry.starts_with('/') {
        Some("must start with `/`")
    } else if !entry.chars().all(path_char_allowed) {
        Some("must be a plain path")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::Invalid(vec![ValidationError::InvalidIngress {
            entry: entry.to_string(),
            reason,
        }])),
        None => Ok(()),
    }
}

fn required<'a>(
    value: &'a Option<String>,
    index: usize,
    key: &'static str,
) -> Result<&'a str, ConfigError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::KeyMissing { index, key })
}

/// Build a descriptor from one raw entry, applying defaults.
pub fn descriptor_from_entry(
    index: usize,
    entry: &AppEntry,
) -> Result<AppDescriptor, ConfigError> {
    let name = required(&entry.name, index, "name")?;
    let url = required(&entry.url, index, "url")?;

    let path = match entry.path.as_deref() {
        Some(explicit) => normalize_path(explicit),
        None => default_path(name),
    };

    Ok(AppDescriptor {
        name: name.to_string(),
        url: url.to_string(),
        description: entry.description.clone().unwrap_or_default(),
        icon: entry.icon.clone().unwrap_or_default(),
        logo: entry.logo.clone().unwrap_or_default(),
        category: entry
            .category
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        path,
        token: entry.token.clone().filter(|t| !t.is_empty()),
        rewrite: entry.rewrite.into(),
    })
}

/// Strip trailing slashes so `/grafana/` and `/grafana` name the same prefix.
/// A bare `/` stays `/`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

fn validate_path(app: &AppDescriptor, errors: &mut Vec<ValidationError>) {
    let reason = if !app.path.starts_with('/') {
        Some("must start with `/`")
    } else if !app.path.chars().all(path_char_allowed) {
        Some("must not contain whitespace, control characters or `$`")
    } else {
        None
    };

    if let Some(reason) = reason {
        errors.push(ValidationError::InvalidPath {
            app: app.name.clone(),
            path: app.path.clone(),
            reason,
        });
    }
}

fn validate_url(app: &AppDescriptor, errors: &mut Vec<ValidationError>) {
    let invalid = |reason: String| ValidationError::InvalidUrl {
        app: app.name.clone(),
        url: app.url.clone(),
        reason,
    };

    match Url::parse(&app.url) {
        Ok(parsed) => {
            if !matches!(parsed.scheme(), "http" | "https") {
                errors.push(invalid(format!("unsupported scheme `{}`", parsed.scheme())));
            } else if parsed.host_str().is_none() {
                errors.push(invalid("missing host".to_string()));
            } else if app.url.contains('$') {
                errors.push(invalid("must not contain `$`".to_string()));
            }
        }
        Err(e) => errors.push(invalid(e.to_string())),
    }
}

/// Paths served by the front door itself.
fn reserved_paths(server: &ServerSettings) -> Vec<String> {
    vec![
        "/".to_string(),
        "/static".to_string(),
        format!("/{}", server.registry_file),
    ]
}

fn validate_unique_paths(
    apps: &[AppDescriptor],
    server: &ServerSettings,
    errors: &mut Vec<ValidationError>,
) {
    let reserved = reserved_paths(server);
    let mut seen: HashMap<&str, &str> = HashMap::new();

    for app in apps {
        if reserved.iter().any(|r| r == &app.path) {
            errors.push(ValidationError::ReservedPath {
                app: app.name.clone(),
                path: app.path.clone(),
            });
            continue;
        }

        if let Some(first) = seen.get(app.path.as_str()) {
            errors.push(ValidationError::DuplicatePath {
                path: app.path.clone(),
                first: first.to_string(),
                second: app.name.clone(),
            });
        } else {
            seen.insert(&app.path, &app.name);
        }
    }
}

fn validate_server(server: &ServerSettings, errors: &mut Vec<ValidationError>) {
    let bare_word = |value: &str| {
        !value.is_empty()
            && !value.chars().any(char::is_whitespace)
            && !value.contains(BARE_WORD_FORBIDDEN)
    };

    if server.listen_port == 0 {
        errors.push(ValidationError::InvalidServer {
            field: "listen_port",
            reason: "must be non-zero",
        });
    }
    if !bare_word(&server.resolver) {
        errors.push(ValidationError::InvalidServer {
            field: "resolver",
            reason: "must be a single address",
        });
    }
    if !bare_word(&server.trusted_gateway) {
        errors.push(ValidationError::InvalidServer {
            field: "trusted_gateway",
            reason: "must be a single address",
        });
    }
    if !server.web_root.starts_with('/') || !bare_word(&server.web_root) {
        errors.push(ValidationError::InvalidServer {
            field: "web_root",
            reason: "must be an absolute directory",
        });
    }
    if !bare_word(&server.registry_file) || server.registry_file.contains('/') {
        errors.push(ValidationError::InvalidServer {
            field: "registry_file",
            reason: "must be a plain file name",
        });
    }
}

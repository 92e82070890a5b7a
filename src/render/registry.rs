//! Application registry consumed by the landing page.

use serde::{Deserialize, Serialize};

use crate::config::schema::{AppDescriptor, ProxyConfig};

/// One tile on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRegistryEntry {
    pub name: String,
    pub url: String,
    pub description: String,
    pub icon: String,
    pub logo: String,
    pub category: String,
    pub path: String,
    pub debug: bool,
}

impl AppRegistryEntry {
    pub fn from_app(app: &AppDescriptor, debug: bool) -> Self {
        Self {
            name: app.name.clone(),
            url: app.url.clone(),
            description: app.description.clone(),
            icon: app.icon.clone(),
            logo: app.logo.clone(),
            category: app.category.clone(),
            path: app.path.clone(),
            debug,
        }
    }
}

/// The registry document: `{ "apps": [...], "debug": bool }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRegistry {
    pub apps: Vec<AppRegistryEntry>,
    pub debug: bool,
}

impl AppRegistry {
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            apps: config
                .apps
                .iter()
                .map(|app| AppRegistryEntry::from_app(app, config.debug))
                .collect(),
            debug: config.debug,
        }
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }
}

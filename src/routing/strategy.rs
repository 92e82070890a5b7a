//! Routing strategy selection.
//!
//! # Strategies
//! - Rewrite: strip the prefix explicitly, rewrite bodies, add an asset route
//! - Transparent: rely on `proxy_pass <url>/` and rewrite redirects only
//!
//! # Design Decisions
//! - An explicit override always wins
//! - Auto-detection is a fixed, case-insensitive keyword match on the name
//! - Each variant carries its own data so renderers never branch on flags

use crate::config::schema::RewriteMode;
use crate::rewrite::{content_rules, SubstitutionRule, REWRITTEN_CONTENT_TYPES};

/// Name fragments of apps known to need full rewriting.
pub const REWRITE_KEYWORDS: &[&str] = &["zwave", "zwavejs", "zigbee2mqtt", "z2m"];

/// Asset directories served through the secondary rewrite route.
pub const ASSET_DIRS: &[&str] = &["static", "css", "js", "fonts", "img", "images"];

/// Cache lifetime of the asset route.
pub const ASSET_CACHE: &str = "1h";

/// Which strategy an app resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Rewrite,
    Transparent,
}

/// True if the name contains one of the rewrite keywords.
pub fn name_needs_rewrite(name: &str) -> bool {
    let lower = name.to_lowercase();
    REWRITE_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Resolve the strategy for an app. Total and deterministic.
pub fn resolve(mode: RewriteMode, name: &str) -> StrategyKind {
    let rewrite = match mode {
        RewriteMode::Enabled => true,
        RewriteMode::Disabled => false,
        RewriteMode::Auto => name_needs_rewrite(name),
    };

    if rewrite {
        StrategyKind::Rewrite
    } else {
        StrategyKind::Transparent
    }
}

/// The secondary route for static assets under a rewritten prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoute {
    pub dirs: Vec<String>,
    pub cache: String,
}

/// A backend redirect target mapped back under the app prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectRule {
    pub from: String,
    pub to: String,
}

/// Strategy-specific part of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Rewrite {
        content_types: Vec<String>,
        rules: Vec<SubstitutionRule>,
        assets: AssetRoute,
    },
    Transparent {
        redirects: Vec<RedirectRule>,
    },
}

impl Strategy {
    /// Build the strategy data for `kind` under `prefix`.
    pub fn for_prefix(kind: StrategyKind, prefix: &str) -> Self {
        match kind {
            StrategyKind::Rewrite => Strategy::Rewrite {
                content_types: REWRITTEN_CONTENT_TYPES.iter().map(|t| t.to_string()).collect(),
                rules: content_rules(prefix),
                assets: AssetRoute {
                    dirs: ASSET_DIRS.iter().map(|d| d.to_string()).collect(),
                    cache: ASSET_CACHE.to_string(),
                },
            },
            StrategyKind::Transparent => {
                let to = format!("{prefix}/");
                Strategy::Transparent {
                    redirects: ["/", "http://$host/", "https://$host/"]
                        .into_iter()
                        .map(|from| RedirectRule {
                            from: from.to_string(),
                            to: to.clone(),
                        })
                        .collect(),
                }
            }
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Strategy::Rewrite { .. } => StrategyKind::Rewrite,
            Strategy::Transparent { .. } => StrategyKind::Transparent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_detection() {
        assert!(name_needs_rewrite("Zigbee2MQTT"));
        assert!(name_needs_rewrite("ZWaveJS UI"));
        assert!(name_needs_rewrite("my-z2m"));
        assert!(!name_needs_rewrite("Grafana"));
        assert!(!name_needs_rewrite("Z-Wave JS UI"));
    }

    #[test]
    fn test_explicit_mode_wins() {
        assert_eq!(resolve(RewriteMode::Disabled, "Zigbee2MQTT"), StrategyKind::Transparent);
        assert_eq!(resolve(RewriteMode::Enabled, "Grafana"), StrategyKind::Rewrite);
        assert_eq!(resolve(RewriteMode::Auto, "zwave"), StrategyKind::Rewrite);
        assert_eq!(resolve(RewriteMode::Auto, "Grafana"), StrategyKind::Transparent);
    }

    #[test]
    fn test_transparent_redirects() {
        let strategy = Strategy::for_prefix(StrategyKind::Transparent, "/grafana");
        match strategy {
            Strategy::Transparent { redirects } => {
                let froms: Vec<&str> = redirects.iter().map(|r| r.from.as_str()).collect();
                assert_eq!(froms, vec!["/", "http://$host/", "https://$host/"]);
                assert!(redirects.iter().all(|r| r.to == "/grafana/"));
            }
            other => panic!("expected transparent, got {:?}", other),
        }
    }

    #[test]
    fn test_rewrite_carries_rules_and_assets() {
        let strategy = Strategy::for_prefix(StrategyKind::Rewrite, "/z2m");
        assert_eq!(strategy.kind(), StrategyKind::Rewrite);
        if let Strategy::Rewrite { rules, assets, content_types } = strategy {
            assert_eq!(rules.len(), 9);
            assert_eq!(assets.dirs.len(), 6);
            assert_eq!(assets.cache, "1h");
            assert!(content_types.contains(&"application/json".to_string()));
        }
    }
}

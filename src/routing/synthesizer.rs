//! Configuration synthesis.
//!
//! Pure: a validated [`ProxyConfig`] and the ingress entry in, both artifacts
//! out. No files are touched, so identical input always yields identical
//! output.

use crate::config::ingress::Ingress;
use crate::config::schema::{GlobalSettings, ProxyConfig};
use crate::render::{render_config, AppRegistry};
use crate::routing::route::RouteBlock;
use crate::routing::strategy::StrategyKind;

/// Result of one synthesis pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub routes: Vec<RouteBlock>,
    pub config_text: String,
    pub registry: AppRegistry,
}

impl Synthesis {
    /// Number of apps routed through the rewrite strategy.
    pub fn rewrite_count(&self) -> usize {
        self.routes
            .iter()
            .filter(|r| r.kind() == StrategyKind::Rewrite)
            .count()
    }
}

/// Build the route blocks for every app, in input order.
pub fn plan_routes(config: &ProxyConfig, settings: &GlobalSettings) -> Vec<RouteBlock> {
    config
        .apps
        .iter()
        .map(|app| {
            let route = RouteBlock::for_app(app, &settings.ingress, &config.server.trusted_gateway);
            tracing::debug!(
                app = %app.name,
                path = %route.prefix,
                upstream = %route.upstream,
                strategy = ?route.kind(),
                token = route.token.is_some(),
                "Route planned"
            );
            route
        })
        .collect()
}

/// Synthesize the nginx configuration and the app registry.
pub fn synthesize(config: &ProxyConfig, ingress: &Ingress) -> Synthesis {
    let settings = GlobalSettings::new(config.debug, ingress.clone());
    let routes = plan_routes(config, &settings);
    let config_text = render_config(&routes, &settings, &config.server);

    Synthesis {
        registry: AppRegistry::from_config(config),
        config_text,
        routes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{AppEntry, ProxyDocument};
    use crate::config::validation::validate_document;

    fn entry(name: &str, url: &str) -> AppEntry {
        AppEntry {
            name: Some(name.to_string()),
            url: Some(url.to_string()),
            ..Default::default()
        }
    }

    fn config(apps: Vec<AppEntry>) -> ProxyConfig {
        validate_document(&ProxyDocument {
            apps,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_routes_follow_input_order() {
        let cfg = config(vec![
            entry("Grafana", "http://a:1"),
            entry("Zigbee2MQTT", "http://b:2"),
            entry("Node RED", "http://c:3"),
        ]);
        let synthesis = synthesize(&cfg, &Ingress::default());

        let prefixes: Vec<&str> = synthesis.routes.iter().map(|r| r.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["/grafana", "/zigbee2mqtt", "/node-red"]);
        assert_eq!(synthesis.rewrite_count(), 1);

        let grafana = synthesis.config_text.find("location /grafana/").unwrap();
        let zigbee = synthesis.config_text.find("location /zigbee2mqtt/").unwrap();
        let node_red = synthesis.config_text.find("location /node-red/").unwrap();
        assert!(grafana < zigbee && zigbee < node_red);
    }

    #[test]
    fn test_explicit_override() {
        let mut zigbee = entry("Zigbee2MQTT", "http://b:2");
        zigbee.rewrite = Some(false);
        let synthesis = synthesize(&config(vec![zigbee]), &Ingress::default());

        assert_eq!(synthesis.rewrite_count(), 0);
        assert!(synthesis.config_text.contains("proxy_redirect / /zigbee2mqtt/;"));
    }

    #[test]
    fn test_idempotent() {
        let cfg = config(vec![entry("Grafana", "http://a:1"), entry("z2m", "http://b:2")]);
        let ingress = Ingress::new("/api/hassio_ingress/x");
        assert_eq!(synthesize(&cfg, &ingress), synthesize(&cfg, &ingress));
    }

    #[test]
    fn test_empty_config_still_renders_front_door() {
        let synthesis = synthesize(&ProxyConfig::default(), &Ingress::default());
        assert!(synthesis.routes.is_empty());
        assert!(synthesis.registry.apps.is_empty());
        assert!(synthesis.config_text.contains("location = / {"));
    }
}

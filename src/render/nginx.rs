//! nginx configuration rendering.
//!
//! # Layout
//! ```text
//! events { ... }
//! http {
//!     globals, resolver, logs, gzip, ingress map
//!     server {
//!         landing page      (location = /)
//!         registry document (location = /apps.json)
//!         static assets     (location /static/)
//!         per app:
//!             rewrite      → location <p>/ + location ~ ^<p>/(static|...)/
//!             transparent  → location <p>/
//!     }
//! }
//! ```

use crate::config::ingress::error_log_level;
use crate::config::schema::{GlobalSettings, ServerSettings};
use crate::render::writer::{arg, quote, regex_escape, NginxWriter};
use crate::routing::route::RouteBlock;
use crate::rewrite::SubstitutionRule;
use crate::routing::strategy::{AssetRoute, RedirectRule, Strategy};

const GZIP_TYPES: &[&str] = &[
    "text/plain",
    "text/css",
    "application/json",
    "application/javascript",
    "text/xml",
    "application/xml",
];

/// Render the complete configuration for `routes`.
pub fn render_config(
    routes: &[RouteBlock],
    settings: &GlobalSettings,
    server: &ServerSettings,
) -> String {
    let mut w = NginxWriter::new();

    w.block("events", None::<&str>, |w| {
        w.directive("worker_connections", ["1024"]);
    });
    w.blank();

    w.block("http", None::<&str>, |w| {
        render_http_globals(w, settings, server);
        w.blank();
        w.block("server", None::<&str>, |w| {
            w.directive("listen", [server.listen_port.to_string()]);
            w.directive("server_name", ["_"]);
            w.blank();

            if settings.ingress.is_active() {
                w.comment("ingress: the gateway strips its prefix, serve from root");
            }
            w.directive("set", ["$base_path".to_string(), quote(settings.ingress.base_path())]);
            w.blank();

            render_front_door(w, server);

            for route in routes {
                w.blank();
                match &route.strategy {
                    Strategy::Rewrite {
                        content_types,
                        rules,
                        assets,
                    } => {
                        render_rewrite(w, route, content_types, rules);
                        w.blank();
                        render_assets(w, route, assets);
                    }
                    Strategy::Transparent { redirects } => {
                        render_transparent(w, route, redirects);
                    }
                }
            }
        });
    });

    w.finish()
}

fn render_http_globals(w: &mut NginxWriter, settings: &GlobalSettings, server: &ServerSettings) {
    w.directive("include", ["/etc/nginx/mime.types"]);
    w.directive("default_type", ["application/octet-stream"]);
    w.blank();

    w.directive("resolver", [server.resolver.as_str(), "valid=10s"]);
    w.directive("resolver_timeout", ["5s"]);
    w.blank();

    w.directive("access_log", ["/var/log/nginx/access.log"]);
    w.directive(
        "error_log",
        ["/var/log/nginx/error.log", error_log_level(settings.debug)],
    );
    w.blank();

    w.directive("sendfile", ["on"]);
    w.directive("tcp_nopush", ["on"]);
    w.directive("tcp_nodelay", ["on"]);
    w.directive("keepalive_timeout", ["65"]);
    w.directive("types_hash_max_size", ["2048"]);
    w.blank();

    w.directive("gzip", ["on"]);
    w.directive("gzip_vary", ["on"]);
    w.directive("gzip_types", GZIP_TYPES);
    w.blank();

    // the gateway's per-request header wins; the configured entry fills in when absent
    w.block("map", ["$http_x_ingress_path", "$ingress_path"], |w| {
        w.directive("\"\"", [quote(settings.ingress.entry())]);
        w.directive("default", ["$http_x_ingress_path"]);
    });
}

fn render_front_door(w: &mut NginxWriter, server: &ServerSettings) {
    let root = server.web_root.trim_end_matches('/');

    w.comment("landing page");
    w.block("location", ["=", "/"], |w| {
        w.directive("alias", [format!("{root}/")]);
        w.directive("try_files", ["/index.html", "=404"]);
    });
    w.blank();

    let registry = format!("/{}", server.registry_file);
    w.block("location", ["=", registry.as_str()], |w| {
        w.directive("alias", [format!("{root}{registry}")]);
        w.directive("default_type", ["application/json"]);
        w.directive("add_header", ["Access-Control-Allow-Origin", "*"]);
        w.directive(
            "add_header",
            ["Cache-Control".to_string(), quote("no-cache, no-store, must-revalidate")],
        );
    });
    w.blank();

    w.block("location", ["/static/"], |w| {
        w.directive("alias", [format!("{root}/static/")]);
    });
}

fn render_access(w: &mut NginxWriter, route: &RouteBlock) {
    w.directive("allow", [route.allow.as_str()]);
    w.directive("deny", ["all"]);
}

fn render_upstream_tls(w: &mut NginxWriter) {
    // self-signed upstream certificates are common
    w.directive("proxy_ssl_verify", ["off"]);
    w.directive("proxy_ssl_server_name", ["on"]);
}

fn render_headers(w: &mut NginxWriter, route: &RouteBlock) {
    for h in &route.request_headers {
        w.directive("proxy_set_header", [arg(&h.name), arg(&h.value)]);
    }
}

fn render_response_headers(w: &mut NginxWriter, route: &RouteBlock) {
    for h in &route.response_headers {
        w.directive("add_header", [arg(&h.name), arg(&h.value)]);
    }
}

fn render_timeouts(w: &mut NginxWriter, route: &RouteBlock) {
    let t = route.timeouts;
    w.directive("proxy_read_timeout", [t.read_secs.to_string()]);
    w.directive("proxy_send_timeout", [t.send_secs.to_string()]);
    if let Some(connect) = t.connect_secs {
        w.directive("proxy_connect_timeout", [connect.to_string()]);
    }
}

fn strip_prefix(w: &mut NginxWriter, route: &RouteBlock) {
    let pattern = format!("^{}/(.*)", regex_escape(&route.prefix));
    w.directive("rewrite", [arg(&pattern), "/$1".into(), "break".into()]);
}

fn render_rewrite(
    w: &mut NginxWriter,
    route: &RouteBlock,
    content_types: &[String],
    rules: &[SubstitutionRule],
) {
    w.comment(&format!("{} (rewrite)", route.app_name));
    let location = format!("{}/", route.prefix);
    w.block("location", [arg(&location)], |w| {
        render_access(w, route);
        w.blank();

        if let Some(token) = &route.token {
            w.directive("set", ["$token".to_string(), quote(token.as_str())]);
            w.directive("set", ["$args", "$args&token=$token"]);
            w.blank();
        }

        strip_prefix(w, route);
        w.directive("proxy_pass", [arg(&route.upstream)]);
        w.directive("proxy_http_version", ["1.1"]);
        w.blank();

        render_upstream_tls(w);
        w.blank();

        render_headers(w, route);
        w.blank();

        w.directive("proxy_redirect", ["off"]);
        w.directive("proxy_buffering", ["off"]);
        w.blank();

        render_response_headers(w, route);
        w.blank();

        render_timeouts(w, route);
        w.blank();

        w.directive("sub_filter_types", content_types);
        w.directive("sub_filter_once", ["off"]);
        for rule in rules {
            w.directive("sub_filter", [quote(&rule.pattern), quote(&rule.replacement)]);
        }
    });
}

fn render_assets(w: &mut NginxWriter, route: &RouteBlock, assets: &AssetRoute) {
    w.comment(&format!("{} static assets", route.app_name));
    let pattern = format!("^{}/({})/", regex_escape(&route.prefix), assets.dirs.join("|"));
    w.block("location", ["~".to_string(), arg(&pattern).into_owned()], |w| {
        strip_prefix(w, route);
        w.directive("proxy_pass", [arg(&route.upstream)]);
        render_upstream_tls(w);
        w.directive("proxy_set_header", ["Host", "$host"]);
        w.directive("proxy_cache_valid", ["200", assets.cache.as_str()]);
        w.directive("expires", [assets.cache.as_str()]);
    });
}

fn render_transparent(w: &mut NginxWriter, route: &RouteBlock, redirects: &[RedirectRule]) {
    w.comment(&route.app_name);
    let location = format!("{}/", route.prefix);
    w.block("location", [arg(&location)], |w| {
        render_access(w, route);
        w.blank();

        if let Some(token) = &route.token {
            // `&` only when the request already carries a query string
            w.directive("set", ["$suffix", "\"\""]);
            w.block("if", ["($args", "!=", "\"\")"], |w| {
                w.directive("set", ["$suffix", "\"&\""]);
            });
            w.directive("set", ["$token".to_string(), quote(token.as_str())]);
            w.directive("set", ["$args", "$args${suffix}token=$token"]);
            w.blank();
        }

        w.directive("proxy_pass", [arg(&format!("{}/", route.upstream)).into_owned()]);
        w.directive("proxy_http_version", ["1.1"]);
        w.blank();

        render_upstream_tls(w);
        w.blank();

        render_headers(w, route);
        w.blank();

        for r in redirects {
            w.directive("proxy_redirect", [arg(&r.from), arg(&r.to)]);
        }
        w.blank();

        render_response_headers(w, route);
        w.blank();

        render_timeouts(w, route);
    });
}

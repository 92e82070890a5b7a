//! Per-app route blocks.
//!
//! A [`RouteBlock`] is the typed description of everything the front door
//! does for one app. It holds no nginx syntax; `render::nginx` turns it into
//! one location (transparent) or two (rewrite).

use crate::config::ingress::Ingress;
use crate::config::schema::AppDescriptor;
use crate::routing::strategy::{resolve, Strategy, StrategyKind};
use crate::routing::token::EncodedToken;

/// Long-lived streaming and WebSocket connections.
pub const STREAM_TIMEOUT_SECS: u64 = 86_400;

/// Connect timeout for rewritten upstreams.
pub const REWRITE_CONNECT_TIMEOUT_SECS: u64 = 240;

/// A header set on the upstream request or the downstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Proxy timeouts in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub read_secs: u64,
    pub send_secs: u64,
    pub connect_secs: Option<u64>,
}

/// Everything needed to render the routes of one app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteBlock {
    pub app_name: String,
    /// Path prefix without trailing slash.
    pub prefix: String,
    /// Upstream origin without trailing slash.
    pub upstream: String,
    /// The only client address allowed through.
    pub allow: String,
    pub strategy: Strategy,
    pub token: Option<EncodedToken>,
    pub request_headers: Vec<Header>,
    pub response_headers: Vec<Header>,
    pub timeouts: Timeouts,
}

impl RouteBlock {
    /// Build the route for one validated app.
    pub fn for_app(app: &AppDescriptor, ingress: &Ingress, trusted_gateway: &str) -> Self {
        let kind = resolve(app.rewrite, &app.name);
        let prefix = app.path.clone();

        Self {
            app_name: app.name.clone(),
            upstream: app.url.trim_end_matches('/').to_string(),
            allow: trusted_gateway.to_string(),
            strategy: Strategy::for_prefix(kind, &prefix),
            token: app.token.as_deref().and_then(EncodedToken::encode),
            request_headers: request_headers(kind, &prefix, ingress),
            response_headers: no_cache_headers(),
            timeouts: timeouts(kind),
            prefix,
        }
    }

    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }
}

fn request_headers(kind: StrategyKind, prefix: &str, ingress: &Ingress) -> Vec<Header> {
    let mut headers = vec![
        Header::new("Upgrade", "$http_upgrade"),
        Header::new("Connection", "upgrade"),
        Header::new("Host", "$host"),
        Header::new("X-Real-IP", "$remote_addr"),
        Header::new("X-Forwarded-For", "$proxy_add_x_forwarded_for"),
        Header::new("X-Forwarded-Proto", "$scheme"),
    ];

    match kind {
        StrategyKind::Rewrite => {
            headers.push(Header::new("X-External-Path", prefix));
            // sub_filter cannot see into compressed bodies
            headers.push(Header::new("Accept-Encoding", ""));
            if ingress.is_active() {
                headers.push(Header::new("X-Ingress-Path", "$ingress_path"));
            }
        }
        StrategyKind::Transparent => {
            headers.push(Header::new("X-Ingress-Path", "$ingress_path"));
        }
    }

    headers
}

fn no_cache_headers() -> Vec<Header> {
    vec![
        Header::new(
            "Cache-Control",
            "no-store, no-cache, must-revalidate, proxy-revalidate, max-age=0",
        ),
        Header::new("Pragma", "no-cache"),
        Header::new("Expires", "0"),
    ]
}

fn timeouts(kind: StrategyKind) -> Timeouts {
    Timeouts {
        read_secs: STREAM_TIMEOUT_SECS,
        send_secs: STREAM_TIMEOUT_SECS,
        connect_secs: match kind {
            StrategyKind::Rewrite => Some(REWRITE_CONNECT_TIMEOUT_SECS),
            StrategyKind::Transparent => None,
        },
    }
}

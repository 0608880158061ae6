use std::sync::Arc;

use crate::config::ProxyConfig;
use crate::upstream::Upstream;

/// Shared state available to all handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<Upstream>,
    pub config: Arc<ProxyConfig>,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> Self {
        let upstream = Upstream::new(reqwest::Client::new(), config.upstream_url.clone());
        Self {
            upstream: Arc::new(upstream),
            config: Arc::new(config),
        }
    }
}

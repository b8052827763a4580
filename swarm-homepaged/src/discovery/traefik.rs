use std::time::Duration;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use shared::protocol::{DEFAULT_CATEGORY, INTERNAL_ROUTER_PREFIX};
use shared::types::ServiceRecord;
use crate::config::TraefikConfig;
use crate::discovery::{labels, ServiceSource, SourceOutcome};

/// One entry of Traefik's `GET /api/http/routers` response.
#[derive(Debug, Deserialize)]
pub struct RouterInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rule: String,
    #[serde(default)]
    pub tls: bool,
}

/// Fallback discovery source: the reverse proxy's active router table.
/// Records carry routing metadata only; name and scheme come from the
/// router, description and icon stay empty.
pub struct TraefikSource {
    client: reqwest::Client,
    routers_url: String,
}

impl TraefikSource {
    pub fn new(config: &TraefikConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build Traefik HTTP client")?;

        Ok(Self {
            client,
            routers_url: format!("{}/http/routers", config.api_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl ServiceSource for TraefikSource {
    fn name(&self) -> &'static str {
        "traefik"
    }

    async fn poll(&self) -> SourceOutcome {
        let response = match self
            .client
            .get(&self.routers_url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Could not fetch services from Traefik API: {}", e);
                return SourceOutcome::Degraded(e.to_string());
            }
        };

        let routers: Vec<RouterInfo> = match response.json().await {
            Ok(routers) => routers,
            Err(e) => {
                tracing::warn!("Malformed Traefik router response: {}", e);
                return SourceOutcome::Degraded(e.to_string());
            }
        };

        let records: Vec<ServiceRecord> = routers.iter().filter_map(router_to_record).collect();

        tracing::info!("Found {} services from Traefik API", records.len());
        SourceOutcome::Available(records)
    }
}

/// Convert one router into a catalog record. Administrative routers and
/// routers without a Host matcher yield nothing.
fn router_to_record(router: &RouterInfo) -> Option<ServiceRecord> {
    if router.name.starts_with(INTERNAL_ROUTER_PREFIX) {
        return None;
    }

    let hostname = labels::parse_host_rule(&router.rule)?;
    let scheme = if router.tls { "https" } else { "http" };

    // Router names carry a provider suffix like "myapp@docker"; strip it.
    let name = if router.name.is_empty() {
        hostname.clone()
    } else {
        router
            .name
            .split('@')
            .next()
            .unwrap_or(router.name.as_str())
            .to_string()
    };

    Some(ServiceRecord {
        name,
        url: format!("{}://{}", scheme, hostname),
        description: String::new(),
        icon: String::new(),
        category: DEFAULT_CATEGORY.to_string(),
    })
}

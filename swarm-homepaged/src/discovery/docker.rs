use async_trait::async_trait;
use bollard::container::ListContainersOptions;
use bollard::{Docker, API_DEFAULT_VERSION};
use crate::config::DockerConfig;
use crate::discovery::{labels, ServiceSource, SourceOutcome};

/// Primary discovery source: running containers and their labels, read from
/// the Docker management socket.
pub struct DockerSource {
    client: Option<Docker>,
}

impl DockerSource {
    /// Connect once at startup and verify with a ping. A failed connection
    /// leaves the source degraded; polls then report zero results rather
    /// than retrying the connection per cycle.
    pub async fn connect(config: &DockerConfig) -> Self {
        let client = match Docker::connect_with_unix(
            &config.socket,
            config.timeout_secs,
            API_DEFAULT_VERSION,
        ) {
            Ok(client) => match client.ping().await {
                Ok(_) => {
                    tracing::info!("Docker client initialized successfully");
                    Some(client)
                }
                Err(e) => {
                    tracing::error!("Failed to reach Docker at {}: {}", config.socket, e);
                    None
                }
            },
            Err(e) => {
                tracing::error!("Failed to initialize Docker client: {}", e);
                None
            }
        };

        Self { client }
    }
}

#[async_trait]
impl ServiceSource for DockerSource {
    fn name(&self) -> &'static str {
        "docker"
    }

    async fn poll(&self) -> SourceOutcome {
        let Some(client) = &self.client else {
            tracing::warn!("Docker client not available");
            return SourceOutcome::Degraded("Docker client not available".to_string());
        };

        let containers = match client
            .list_containers(Some(ListContainersOptions::<String>::default()))
            .await
        {
            Ok(containers) => containers,
            Err(e) => {
                tracing::error!("Error listing containers: {}", e);
                return SourceOutcome::Degraded(e.to_string());
            }
        };

        tracing::debug!("Found {} containers to review", containers.len());

        let mut records = Vec::new();
        for container in containers {
            let name = container
                .names
                .as_deref()
                .and_then(|names| names.first())
                .map(|name| name.trim_start_matches('/').to_string())
                .or(container.id)
                .unwrap_or_default();

            let labels = container.labels.unwrap_or_default();
            if let Some(record) = labels::extract_service(&name, &labels) {
                records.push(record);
            }
        }

        tracing::info!("Found {} services from Docker", records.len());
        SourceOutcome::Available(records)
    }
}

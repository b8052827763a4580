use std::path::Path;
use serde::Deserialize;
use anyhow::{Context, Result};

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub docker: DockerConfig,
    #[serde(default)]
    pub traefik: TraefikConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DockerConfig {
    /// Docker management socket, e.g. "unix:///var/run/docker.sock"
    #[serde(default = "default_docker_socket")]
    pub socket: String,
    #[serde(default = "default_docker_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraefikConfig {
    /// Base URL of the Traefik administrative API
    #[serde(default = "default_traefik_api_url")]
    pub api_url: String,
    #[serde(default = "default_traefik_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_docker_socket() -> String {
    "unix:///var/run/docker.sock".to_string()
}

fn default_docker_timeout() -> u64 {
    30
}

fn default_traefik_api_url() -> String {
    "http://traefik:8080/api".to_string()
}

fn default_traefik_timeout() -> u64 {
    5
}

fn default_listen() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            socket: default_docker_socket(),
            timeout_secs: default_docker_timeout(),
        }
    }
}

impl Default for TraefikConfig {
    fn default() -> Self {
        Self {
            api_url: default_traefik_api_url(),
            timeout_secs: default_traefik_timeout(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load from the given file if present, otherwise start from defaults.
    /// Environment overrides are applied either way.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let config = Self::load(path)?;
            tracing::info!("Loaded config from {}", path.display());
            config
        } else {
            tracing::info!("No config file at {}, using defaults", path.display());
            Config::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply the environment overrides honored by the daemon:
    /// DOCKER_SOCKET, TRAEFIK_API_URL and PORT.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    fn apply_env_with(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(socket) = get("DOCKER_SOCKET") {
            self.docker.socket = socket;
        }
        if let Some(api_url) = get("TRAEFIK_API_URL") {
            self.traefik.api_url = api_url;
        }
        if let Some(port) = get("PORT") {
            if port.parse::<u16>().is_ok() {
                self.api.listen = format!("0.0.0.0:{}", port);
            } else {
                tracing::warn!("Ignoring invalid PORT value: {}", port);
            }
        }
    }
}

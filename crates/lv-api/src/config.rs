//! API server configuration.

use serde::Deserialize;

/// Top-level API server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Listen address (e.g., "0.0.0.0").
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Path to the retrieval TOML config (LV_CONFIG). Defaults apply when unset.
    #[serde(default)]
    pub config_path: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl ApiConfig {
    /// Load config from environment variables (`LV_HOST`, `LV_PORT`, `LV_CONFIG`).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(host) = lookup("LV_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("LV_PORT") {
            config.port = port
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid LV_PORT '{port}': {e}"))?;
        }
        config.config_path = lookup("LV_CONFIG").filter(|p| !p.is_empty());
        Ok(config)
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            config_path: None,
        }
    }
}

use anyhow::Result;
use fs_err as fs;
use serde::Deserialize;
use std::io;
use std::path::Path;

use crate::errors::KilnError;
use crate::optimize_client::OptimizeMethod;

pub const DEFAULT_CONFIG_PATH: &str = "kiln.toml";

/// Contents of `kiln.toml`. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KilnConfig {
    #[serde(default)]
    pub optimize: OptimizeSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OptimizeSettings {
    pub host: String,
    pub port: u16,
    pub method: OptimizeMethod,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OptimizeSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            method: OptimizeMethod::Auto,
            timeout_secs: 30,
        }
    }
}

impl KilnConfig {
    /// Load `path`; a missing file means defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = match fs::read_to_string(path) {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(KilnError::Config(e.to_string()).into()),
        };
        Self::parse(&data)
            .map_err(|e| KilnError::Config(format!("{}: {e}", path.display())).into())
    }

    pub fn parse(data: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(data)
    }
}

impl OptimizeSettings {
    /// Apply `KILN_HOST` / `KILN_PORT` on top of the file values.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(host) = std::env::var("KILN_HOST") {
            if !host.trim().is_empty() {
                self.host = host.trim().to_string();
            }
        }
        if let Ok(port) = std::env::var("KILN_PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| KilnError::Config(format!("KILN_PORT is not a port: {port}")))?;
        }
        Ok(self)
    }
}

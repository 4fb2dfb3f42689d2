use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{RadioError, Result};

/// Main configuration structure for Wave Radio
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// External extraction tool configuration
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// IP address to bind (e.g., "0.0.0.0" or "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on; the `PORT` environment variable takes precedence
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Resolve the socket address to bind
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| RadioError::Config(format!("Invalid listen address: {e}")))
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Extraction tool configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    /// Executable name or path; bare names are resolved on `PATH`
    #[serde(default = "default_program")]
    pub program: PathBuf,
    /// Arguments placed before the per-request ones (e.g. `["-m", "yt_dlp"]`
    /// when `program` is a Python interpreter)
    #[serde(default)]
    pub leading_args: Vec<String>,
    /// Audio format used when a request doesn't name one
    #[serde(default = "default_format")]
    pub default_format: String,
    /// Maximum bytes read from the tool's stdout per relayed chunk
    #[serde(default = "default_relay_chunk_bytes")]
    pub relay_chunk_bytes: usize,
    /// How long the tool may keep running after closing stdout before it is
    /// killed
    #[serde(default = "default_exit_grace_ms")]
    pub exit_grace_ms: u64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            leading_args: Vec::new(),
            default_format: default_format(),
            relay_chunk_bytes: default_relay_chunk_bytes(),
            exit_grace_ms: default_exit_grace_ms(),
        }
    }
}

impl ExtractorConfig {
    pub fn exit_grace(&self) -> Duration {
        Duration::from_millis(self.exit_grace_ms)
    }
}

fn default_program() -> PathBuf {
    PathBuf::from("yt-dlp")
}

fn default_format() -> String {
    "mp3".to_string()
}

fn default_relay_chunk_bytes() -> usize {
    16 * 1024
}

fn default_exit_grace_ms() -> u64 {
    5_000
}

impl Config {
    /// Load configuration from an explicit path, or from the first default
    /// location that exists, falling back to built-in defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_path {
            tracing::info!("Loading config from: {}", path.display());
            return Self::from_file(path);
        }

        let default_paths = [
            dirs::home_dir().map(|h| h.join(".wave-radio").join("config.toml")),
            dirs::config_dir().map(|c| c.join("wave-radio").join("config.toml")),
            Some(PathBuf::from("config.toml")),
        ];

        for path in default_paths.iter().flatten() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read and parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RadioError::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| RadioError::Config(format!("Failed to parse config: {e}")))
    }

    /// Apply the value of the `PORT` environment variable, if set.
    ///
    /// An unset or empty value leaves the configured port untouched.
    pub fn apply_port_env(&mut self, value: Option<&str>) -> Result<()> {
        let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        self.server.port = raw
            .parse()
            .map_err(|e| RadioError::Config(format!("Invalid PORT '{raw}': {e}")))?;
        Ok(())
    }
}

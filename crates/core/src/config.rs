//! Layered configuration for the HomeValue estimation service.
//!
//! Configuration is loaded in layers with increasing priority:
//! 1. Compiled-in defaults (local bind address, bundled artifact path)
//! 2. TOML configuration file (if provided)
//! 3. Environment variable overrides (prefix `HV_`, nested with `__`,
//!    e.g. `HV_SERVER__PORT=9090`)

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

// ── Default value functions ────────────────────────────────────────────

/// Default bind address: all interfaces.
fn default_bind() -> String {
    "0.0.0.0".to_string()
}

/// Default HTTP port: 8080.
fn default_port() -> u16 {
    8080
}

/// Default model artifact path, relative to the working directory.
fn default_artifact() -> PathBuf {
    PathBuf::from("models/pricing.json")
}

// ── Configuration structs ──────────────────────────────────────────────

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Trained model artifact settings.
    #[serde(default)]
    pub model: ModelConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the listener to.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// TCP port for the HTTP API.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Trained model artifact configuration.
///
/// The artifact is produced by the offline training pipeline and loaded
/// once at startup. A missing artifact degrades the service (every
/// prediction returns a structured error) but does not prevent startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Path to the JSON model artifact.
    #[serde(default = "default_artifact")]
    pub artifact: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Emit machine-readable JSON logs instead of pretty console output.
    #[serde(default)]
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            artifact: default_artifact(),
        }
    }
}

impl AppConfig {
    /// Load configuration using layered sources.
    ///
    /// 1. Compiled-in defaults.
    /// 2. TOML file at `config_path` (if `Some`).
    /// 3. Environment variable overrides with prefix `HV_` and `__` as the
    ///    nesting separator (e.g. `HV_MODEL__ARTIFACT=/srv/pricing.json`).
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("server.bind", default_bind())?
            .set_default("server.port", default_port() as i64)?
            .set_default(
                "model.artifact",
                default_artifact().to_string_lossy().to_string(),
            )?
            .set_default("logging.json", false)?;

        if let Some(path) = config_path {
            let path_str = path.to_str().context("config path is not valid UTF-8")?;
            builder = builder.add_source(File::with_name(path_str).required(true));
        }

        // The prefix separator must be set explicitly to `_` because the
        // `config` crate defaults it to the nesting separator when one is
        // provided. Without this, `HV_SERVER__PORT` would be matched
        // against prefix `hv__` instead of `hv_`.
        builder = builder.add_source(
            Environment::with_prefix("HV")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let cfg: AppConfig = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize()
            .context("failed to deserialize configuration")?;

        cfg.validate()?;

        Ok(cfg)
    }

    /// Validate configuration invariants.
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            bail!("server.port must be non-zero");
        }
        if self.model.artifact.as_os_str().is_empty() {
            bail!("model.artifact must not be empty");
        }
        Ok(())
    }
}

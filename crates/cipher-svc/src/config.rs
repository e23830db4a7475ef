//! Configuration loading and validation for the cipher service.
//!
//! Values come from environment variables, optionally layered over a TOML file
//! named by `CIPHER_SVC_CONFIG_FILE`; environment variables win. The process
//! exits with a clear error message if the result is invalid.

use anyhow::{Context, Result};
use config::{builder::DefaultState, ConfigBuilder, FileFormat};
use dualcipher::{Algorithm, KeyMaterial, PassthroughPolicy};
use serde::Deserialize;

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_FILE_VAR: &str = "CIPHER_SVC_CONFIG_FILE";

/// Validated service configuration.
///
/// `Debug` output never contains key bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// AEAD algorithm shared by both keys.
    #[serde(default)]
    pub cipher_algorithm: Algorithm,

    /// Key used to encrypt new values. Empty disables encryption.
    #[serde(default)]
    pub encryption_key: KeyMaterial,

    /// Previous key, kept to read values written before a rotation.
    #[serde(default)]
    pub encryption_old_key: KeyMaterial,

    /// Whether single-key states pass undecryptable values through.
    #[serde(default)]
    pub passthrough: PassthroughPolicy,

    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_log_level() -> String {
    "info".into()
}

/// Path of the optional configuration file, if `CIPHER_SVC_CONFIG_FILE` is set.
pub fn config_file_from_env() -> Option<String> {
    std::env::var(CONFIG_FILE_VAR)
        .ok()
        .filter(|path| !path.trim().is_empty())
}

impl Config {
    /// Load and validate configuration from `file` (if any) and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, a value cannot be parsed,
    /// or validation fails.
    pub fn load(file: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::new(path, FileFormat::Toml));
        }
        Self::from_builder(builder.add_source(config::Environment::default()))
    }

    /// Build and validate from an already assembled set of sources.
    pub(crate) fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let cfg = builder
            .build()
            .context("failed to build configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        if self.encryption_key.is_empty() && self.encryption_old_key.is_empty() {
            anyhow::bail!("at least one of ENCRYPTION_KEY or ENCRYPTION_OLD_KEY must be set");
        }
        if self.listen_port == 0 {
            anyhow::bail!("LISTEN_PORT must be > 0");
        }
        if self.log_level.trim().is_empty() {
            anyhow::bail!("LOG_LEVEL must not be empty");
        }
        Ok(())
    }
}

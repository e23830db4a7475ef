//! Cipher construction from configuration, and hot reload on `SIGHUP`.
//!
//! # Lifecycle
//!
//! 1. At startup, [`build_cipher`] turns the loaded [`Config`] into a cipher
//!    that seeds the [`CipherStore`].
//! 2. [`reload_task`] waits for `SIGHUP`, reloads configuration, builds a new
//!    cipher and swaps it in. Only the key settings take effect on reload.
//! 3. A reload that fails for any reason leaves the previous cipher in place.
//!
//! Key bytes never reach a log line; only fingerprints do.

pub mod store;

pub use store::CipherStore;

use anyhow::{Context, Result};
use dualcipher::{CipherBuilder, HexCipher};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{info, warn};

use crate::config::Config;

/// Build the text cipher described by `cfg`.
///
/// # Errors
///
/// Returns an error if no key is configured or a key has the wrong length.
pub fn build_cipher(cfg: &Config) -> Result<HexCipher> {
    CipherBuilder::new(cfg.cipher_algorithm)
        .primary(cfg.encryption_key.clone())
        .secondary(cfg.encryption_old_key.clone())
        .passthrough(cfg.passthrough)
        .build_hex()
        .context("failed to build cipher from key configuration")
}

/// Reload configuration from `config_file` and the environment, then swap a
/// freshly built cipher into `store`.
///
/// Blocking: reads the configuration file.
///
/// # Errors
///
/// Returns an error if configuration is invalid; `store` is left untouched.
pub fn reload(store: &CipherStore, config_file: Option<&str>) -> Result<()> {
    let cfg = Config::load(config_file).context("failed to reload configuration")?;
    apply(store, &cfg)
}

/// Swap the cipher described by `cfg` into `store`.
fn apply(store: &CipherStore, cfg: &Config) -> Result<()> {
    let cipher = build_cipher(cfg)?;
    store.replace(cipher);
    Ok(())
}

/// Spawn a background task that reloads the cipher on every `SIGHUP`.
pub fn reload_task(store: CipherStore, config_file: Option<String>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut hangup = match signal(SignalKind::hangup()) {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGHUP; key reload disabled");
                return;
            }
        };
        while hangup.recv().await.is_some() {
            let (target, file) = (store.clone(), config_file.clone());
            let outcome = tokio::task::spawn_blocking(move || reload(&target, file.as_deref()))
                .await
                .context("reload task did not complete")
                .and_then(|r| r);
            match outcome {
                Ok(()) => {
                    let current = store.current();
                    info!(
                        mode = %current.cipher().mode(),
                        primary_key_id = current.cipher().primary_key_id().unwrap_or("-"),
                        secondary_key_id = current.cipher().secondary_key_id().unwrap_or("-"),
                        "cipher reloaded"
                    );
                }
                Err(e) => warn!(error = %format!("{e:#}"), "cipher reload failed; retaining previous cipher"),
            }
        }
    })
}

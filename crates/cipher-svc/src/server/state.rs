//! Shared application state injected into every Axum handler.

use crate::keys::CipherStore;

/// Application state shared across all request handlers.
///
/// Cheap to clone: the store is `Arc`-backed.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Swappable reference to the active cipher.
    pub ciphers: CipherStore,
}

impl AppState {
    /// Create a new [`AppState`] around `ciphers`.
    pub fn new(ciphers: CipherStore) -> Self {
        Self { ciphers }
    }
}

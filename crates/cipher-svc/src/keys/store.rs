//! [`CipherStore`]: lock-free holder for the active cipher.

use std::sync::Arc;

use arc_swap::ArcSwap;
use dualcipher::HexCipher;

/// Shared, swappable reference to the active [`HexCipher`].
///
/// Readers take a snapshot with [`CipherStore::current`] and keep using it for
/// the whole request even if a reload swaps in a new cipher meanwhile.
#[derive(Clone, Debug)]
pub struct CipherStore {
    inner: Arc<ArcSwap<HexCipher>>,
}

impl CipherStore {
    /// Create a store seeded with `cipher`.
    pub fn new(cipher: HexCipher) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(cipher)),
        }
    }

    /// Snapshot of the active cipher. Lock-free; safe on the hot path.
    pub fn current(&self) -> Arc<HexCipher> {
        self.inner.load_full()
    }

    /// Atomically replace the active cipher.
    pub fn replace(&self, cipher: HexCipher) {
        self.inner.store(Arc::new(cipher));
    }
}

//! Cipher construction from zero, one or two keys.

use tracing::info;

use crate::aead::AeadHandle;
use crate::algorithm::Algorithm;
use crate::dual::{DualKeyCipher, KeySet, PassthroughPolicy};
use crate::error::CipherError;
use crate::key::{KeyMaterial, KeySlot};
use crate::text::HexCipher;

/// Builder for [`DualKeyCipher`] and [`HexCipher`].
///
/// Empty keys count as "not configured".
#[derive(Debug, Clone, Default)]
pub struct CipherBuilder {
    algorithm: Algorithm,
    primary: KeyMaterial,
    secondary: KeyMaterial,
    policy: PassthroughPolicy,
}

impl CipherBuilder {
    /// Start a builder for `algorithm` with no keys and the tolerant policy.
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..Self::default()
        }
    }

    /// Key that seals new writes.
    pub fn primary(mut self, key: impl Into<KeyMaterial>) -> Self {
        self.primary = key.into();
        self
    }

    /// Previous key, only used to open older records.
    pub fn secondary(mut self, key: impl Into<KeyMaterial>) -> Self {
        self.secondary = key.into();
        self
    }

    /// Passthrough policy for single-key states.
    pub fn passthrough(mut self, policy: PassthroughPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Build the byte-level cipher.
    ///
    /// # Errors
    ///
    /// - [`CipherError::NoKeysProvided`] if both keys are empty.
    /// - [`CipherError::InvalidKeyMaterial`] if a non-empty key has the wrong length.
    pub fn build(self) -> Result<DualKeyCipher, CipherError> {
        let primary = handle(self.algorithm, KeySlot::Primary, &self.primary)?;
        let secondary = handle(self.algorithm, KeySlot::Secondary, &self.secondary)?;
        let keys = KeySet::from_parts(primary, secondary).ok_or(CipherError::NoKeysProvided)?;

        let cipher = DualKeyCipher::from_parts(
            self.algorithm,
            keys,
            self.policy,
            self.primary.fingerprint(),
            self.secondary.fingerprint(),
        );
        info!(
            algorithm = %cipher.algorithm(),
            mode = %cipher.mode(),
            policy = ?cipher.policy(),
            primary_key_id = cipher.primary_key_id().unwrap_or("-"),
            secondary_key_id = cipher.secondary_key_id().unwrap_or("-"),
            "cipher constructed"
        );
        Ok(cipher)
    }

    /// Build the hex text façade.
    pub fn build_hex(self) -> Result<HexCipher, CipherError> {
        self.build().map(HexCipher::new)
    }
}

fn handle(
    algorithm: Algorithm,
    slot: KeySlot,
    key: &KeyMaterial,
) -> Result<Option<AeadHandle>, CipherError> {
    if key.is_empty() {
        return Ok(None);
    }
    AeadHandle::new(algorithm, slot, key.expose()).map(Some)
}

/// Build a [`DualKeyCipher`] from raw key bytes; an empty slice means "absent".
pub fn construct(
    algorithm: Algorithm,
    primary: &[u8],
    secondary: &[u8],
) -> Result<DualKeyCipher, CipherError> {
    CipherBuilder::new(algorithm)
        .primary(primary)
        .secondary(secondary)
        .build()
}

/// Build a [`HexCipher`] from string keys; an empty string means "not configured".
///
/// `key` seals new writes; `old_key` only opens older records.
pub fn new_cipher(algorithm: Algorithm, key: &str, old_key: &str) -> Result<HexCipher, CipherError> {
    CipherBuilder::new(algorithm)
        .primary(key)
        .secondary(old_key)
        .build_hex()
}

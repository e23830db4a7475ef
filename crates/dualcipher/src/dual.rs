//! Dual-key cipher: encrypt under the primary key, decrypt across a rotation.
//!
//! # Blob format
//!
//! ```text
//! nonce (Algorithm::nonce_size bytes) || ciphertext || tag (16 bytes)
//! ```
//!
//! # Decrypt decision table
//!
//! | keys      | on authentication failure                     |
//! |-----------|-----------------------------------------------|
//! | primary   | blob returned unchanged (pre-encryption data) |
//! | secondary | blob returned unchanged (encryption disabled) |
//! | both      | [`CipherError::AuthenticationFailed`]         |
//!
//! The passthrough rows apply only under [`PassthroughPolicy::Tolerant`].

use std::fmt;

use aes_gcm::aead::{
    rand_core::{CryptoRng, RngCore},
    OsRng,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aead::AeadHandle;
use crate::algorithm::Algorithm;
use crate::error::CipherError;

/// How unauthenticatable or undecodable input is treated in single-key states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassthroughPolicy {
    /// Single-key states hand back input they cannot open, and a cipher with
    /// no primary key stores plaintext as-is.
    #[default]
    Tolerant,
    /// Every failure is an error, whatever keys are configured.
    Strict,
}

/// Which keys a cipher holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyMode {
    /// Primary only: encrypting, no rotation in progress.
    Encrypting,
    /// Primary and secondary: rotating from the secondary to the primary.
    Rotating,
    /// Secondary only: encryption switched off, old records still readable.
    DecryptOnly,
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyMode::Encrypting => "encrypting",
            KeyMode::Rotating => "rotating",
            KeyMode::DecryptOnly => "decrypt-only",
        })
    }
}

/// The configured keys. At least one is always present.
#[derive(Debug)]
pub(crate) enum KeySet {
    Primary(AeadHandle),
    Rotating {
        primary: AeadHandle,
        secondary: AeadHandle,
    },
    Secondary(AeadHandle),
}

impl KeySet {
    /// Assemble from optional handles; `None` when both are absent.
    pub(crate) fn from_parts(
        primary: Option<AeadHandle>,
        secondary: Option<AeadHandle>,
    ) -> Option<Self> {
        match (primary, secondary) {
            (Some(primary), Some(secondary)) => Some(Self::Rotating { primary, secondary }),
            (Some(primary), None) => Some(Self::Primary(primary)),
            (None, Some(secondary)) => Some(Self::Secondary(secondary)),
            (None, None) => None,
        }
    }

    fn mode(&self) -> KeyMode {
        match self {
            Self::Primary(_) => KeyMode::Encrypting,
            Self::Rotating { .. } => KeyMode::Rotating,
            Self::Secondary(_) => KeyMode::DecryptOnly,
        }
    }

    fn primary(&self) -> Option<&AeadHandle> {
        match self {
            Self::Primary(p) | Self::Rotating { primary: p, .. } => Some(p),
            Self::Secondary(_) => None,
        }
    }
}

/// Result of opening a blob before the passthrough is materialised.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Opened {
    /// A configured key authenticated the blob.
    Plaintext(Vec<u8>),
    /// No key could open it and the key state allows handing the input back.
    Passthrough,
}

/// AEAD cipher holding an optional primary and an optional secondary key.
///
/// Immutable after construction and safe to share across threads; a key
/// change means building a new instance and swapping it in.
#[derive(Debug)]
pub struct DualKeyCipher {
    algorithm: Algorithm,
    keys: KeySet,
    policy: PassthroughPolicy,
    primary_key_id: Option<String>,
    secondary_key_id: Option<String>,
}

impl DualKeyCipher {
    pub(crate) fn from_parts(
        algorithm: Algorithm,
        keys: KeySet,
        policy: PassthroughPolicy,
        primary_key_id: Option<String>,
        secondary_key_id: Option<String>,
    ) -> Self {
        Self {
            algorithm,
            keys,
            policy,
            primary_key_id,
            secondary_key_id,
        }
    }

    /// Algorithm shared by both keys.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Nonce prefix length of every blob.
    pub fn nonce_size(&self) -> usize {
        self.algorithm.nonce_size()
    }

    /// Which keys are configured.
    pub fn mode(&self) -> KeyMode {
        self.keys.mode()
    }

    /// Passthrough policy in force.
    pub fn policy(&self) -> PassthroughPolicy {
        self.policy
    }

    /// Fingerprint of the primary key, if configured.
    pub fn primary_key_id(&self) -> Option<&str> {
        self.primary_key_id.as_deref()
    }

    /// Fingerprint of the secondary key, if configured.
    pub fn secondary_key_id(&self) -> Option<&str> {
        self.secondary_key_id.as_deref()
    }

    /// Encrypt `plaintext` under the primary key with a fresh OS-random nonce.
    ///
    /// # Errors
    ///
    /// - [`CipherError::EncryptionDisabled`] if no primary key is configured.
    /// - [`CipherError::EntropyUnavailable`] if the OS RNG fails.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.encrypt_with_rng(&mut OsRng, plaintext)
    }

    /// Encrypt `plaintext` drawing the nonce from `rng`.
    ///
    /// Returns `nonce || ciphertext || tag`.
    pub fn encrypt_with_rng<R>(&self, rng: &mut R, plaintext: &[u8]) -> Result<Vec<u8>, CipherError>
    where
        R: RngCore + CryptoRng,
    {
        let primary = self.keys.primary().ok_or(CipherError::EncryptionDisabled)?;

        let mut blob = vec![0u8; self.nonce_size()];
        rng.try_fill_bytes(&mut blob)
            .map_err(|_| CipherError::EntropyUnavailable)?;

        let sealed = primary.seal(&blob, plaintext)?;
        blob.extend_from_slice(&sealed);
        Ok(blob)
    }

    /// Decrypt a `nonce || ciphertext || tag` blob.
    ///
    /// In single-key states under [`PassthroughPolicy::Tolerant`] a blob that
    /// fails authentication is returned unchanged.
    ///
    /// # Errors
    ///
    /// - [`CipherError::MalformedInput`] if the blob is shorter than the nonce.
    /// - [`CipherError::AuthenticationFailed`] if no key opens the blob and no
    ///   passthrough applies.
    pub fn decrypt(&self, blob: &[u8]) -> Result<Vec<u8>, CipherError> {
        match self.open(blob)? {
            Opened::Plaintext(plaintext) => Ok(plaintext),
            Opened::Passthrough => Ok(blob.to_vec()),
        }
    }

    pub(crate) fn open(&self, blob: &[u8]) -> Result<Opened, CipherError> {
        let nonce_size = self.nonce_size();
        if blob.len() < nonce_size {
            return Err(CipherError::MalformedInput {
                len: blob.len(),
                nonce_size,
            });
        }
        let (nonce, body) = blob.split_at(nonce_size);

        match &self.keys {
            KeySet::Primary(key) | KeySet::Secondary(key) => match key.open(nonce, body) {
                Some(plaintext) => Ok(Opened::Plaintext(plaintext)),
                None => self.passthrough("authentication failed"),
            },
            KeySet::Rotating { primary, secondary } => primary
                .open(nonce, body)
                .or_else(|| secondary.open(nonce, body))
                .map(Opened::Plaintext)
                .ok_or(CipherError::AuthenticationFailed),
        }
    }

    /// Single-key fallback: hand the input back, or fail under `Strict`.
    fn passthrough(&self, reason: &'static str) -> Result<Opened, CipherError> {
        match self.policy {
            PassthroughPolicy::Tolerant => {
                debug!(mode = %self.mode(), reason, "passing input through unchanged");
                Ok(Opened::Passthrough)
            }
            PassthroughPolicy::Strict => Err(CipherError::AuthenticationFailed),
        }
    }
}

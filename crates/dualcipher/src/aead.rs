//! Single-key AEAD handle over the supported primitives.
//!
//! **Do NOT call `seal` twice with the same nonce under one key.** Both GCM and
//! Poly1305 lose confidentiality and authenticity on nonce reuse; callers draw
//! a fresh random nonce per seal.

use std::fmt;

use aes_gcm::{
    aead::{generic_array::GenericArray, Aead, KeyInit},
    Aes256Gcm,
};
use chacha20poly1305::XChaCha20Poly1305;

use crate::algorithm::Algorithm;
use crate::error::CipherError;
use crate::key::KeySlot;

/// Opaque AEAD capability bound to one key and one algorithm.
pub enum AeadHandle {
    /// AES-256-GCM, 12-byte nonce.
    Aes256Gcm(Box<Aes256Gcm>),
    /// XChaCha20-Poly1305, 24-byte nonce.
    XChaCha20Poly1305(Box<XChaCha20Poly1305>),
}

impl AeadHandle {
    /// Build a handle for `algorithm` from raw `key` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyMaterial`] if `key` is not exactly
    /// [`Algorithm::key_size`] bytes.
    pub fn new(algorithm: Algorithm, slot: KeySlot, key: &[u8]) -> Result<Self, CipherError> {
        let invalid = || CipherError::InvalidKeyMaterial {
            slot,
            expected: algorithm.key_size(),
            actual: key.len(),
        };
        if key.len() != algorithm.key_size() {
            return Err(invalid());
        }
        match algorithm {
            Algorithm::Aes256Gcm => Aes256Gcm::new_from_slice(key)
                .map(|c| Self::Aes256Gcm(Box::new(c)))
                .map_err(|_| invalid()),
            Algorithm::XChaCha20Poly1305 => XChaCha20Poly1305::new_from_slice(key)
                .map(|c| Self::XChaCha20Poly1305(Box::new(c)))
                .map_err(|_| invalid()),
        }
    }

    /// Algorithm this handle was built for.
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Aes256Gcm(_) => Algorithm::Aes256Gcm,
            Self::XChaCha20Poly1305(_) => Algorithm::XChaCha20Poly1305,
        }
    }

    /// Seal `plaintext`, returning ciphertext with the tag appended.
    ///
    /// `nonce` must be exactly [`Algorithm::nonce_size`] bytes.
    pub fn seal(&self, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        debug_assert_eq!(nonce.len(), self.algorithm().nonce_size());
        match self {
            Self::Aes256Gcm(c) => c.encrypt(GenericArray::from_slice(nonce), plaintext),
            Self::XChaCha20Poly1305(c) => c.encrypt(GenericArray::from_slice(nonce), plaintext),
        }
        .map_err(|_| CipherError::SealFailed)
    }

    /// Open `ciphertext` (ciphertext + tag) sealed under `nonce`.
    ///
    /// Returns `None` when authentication fails. A wrong key and a tampered
    /// ciphertext are indistinguishable here.
    pub fn open(&self, nonce: &[u8], ciphertext: &[u8]) -> Option<Vec<u8>> {
        debug_assert_eq!(nonce.len(), self.algorithm().nonce_size());
        match self {
            Self::Aes256Gcm(c) => c.decrypt(GenericArray::from_slice(nonce), ciphertext),
            Self::XChaCha20Poly1305(c) => c.decrypt(GenericArray::from_slice(nonce), ciphertext),
        }
        .ok()
    }
}

impl fmt::Debug for AeadHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key schedules stay out of debug output.
        write!(f, "AeadHandle({})", self.algorithm())
    }
}

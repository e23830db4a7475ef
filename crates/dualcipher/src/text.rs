//! Hex text encoding over [`DualKeyCipher`], with the storage passthroughs.
//!
//! An operator can walk a store through
//! `disabled → key A → rotating A→B → key B → disabled`
//! and every record written along the way stays readable:
//!
//! - no primary key: `encrypt_to_text` stores the plaintext itself;
//! - secondary only, text not hex: the text is returned as plaintext;
//! - primary only, text not hex: the raw text bytes are tried as a blob;
//! - single key, blob fails authentication: the stored text is returned.
//!
//! All of these are switched off by [`PassthroughPolicy::Strict`].

use tracing::debug;

use crate::dual::{DualKeyCipher, KeyMode, Opened, PassthroughPolicy};
use crate::error::CipherError;

/// Text-in, text-out cipher for values persisted as strings.
#[derive(Debug)]
pub struct HexCipher {
    inner: DualKeyCipher,
}

impl HexCipher {
    /// Wrap a byte-level cipher.
    pub fn new(inner: DualKeyCipher) -> Self {
        Self { inner }
    }

    /// Borrow the byte-level cipher.
    pub fn cipher(&self) -> &DualKeyCipher {
        &self.inner
    }

    /// Encrypt `plaintext` and return the blob as lowercase hex.
    ///
    /// With no primary key under the tolerant policy the plaintext itself is
    /// returned, unencoded.
    ///
    /// # Errors
    ///
    /// - [`CipherError::EntropyUnavailable`] if no nonce could be drawn.
    /// - [`CipherError::PlaintextNotText`] if encryption is disabled and the
    ///   plaintext is not UTF-8.
    /// - [`CipherError::EncryptionDisabled`] under the strict policy with no
    ///   primary key.
    pub fn encrypt_to_text(&self, plaintext: &[u8]) -> Result<String, CipherError> {
        match self.inner.encrypt(plaintext) {
            Ok(blob) => Ok(hex::encode(blob)),
            Err(CipherError::EncryptionDisabled)
                if self.inner.policy() == PassthroughPolicy::Tolerant =>
            {
                debug!("encryption disabled; storing plaintext");
                String::from_utf8(plaintext.to_vec()).map_err(|_| CipherError::PlaintextNotText)
            }
            Err(e) => Err(e),
        }
    }

    /// Decode and decrypt text produced by [`HexCipher::encrypt_to_text`].
    ///
    /// With a single key, text that decodes but fails authentication comes
    /// back as the original `text` bytes, not the hex-decoded blob that
    /// [`DualKeyCipher::decrypt`] returns.
    ///
    /// # Errors
    ///
    /// - [`CipherError::HexDecode`] if `text` is not hex and the key state has
    ///   no passthrough for it.
    /// - Any error of [`DualKeyCipher::decrypt`].
    pub fn decrypt_from_text(&self, text: &str) -> Result<Vec<u8>, CipherError> {
        let blob = match hex::decode(text) {
            Ok(blob) => blob,
            Err(e) => match (self.inner.policy(), self.inner.mode()) {
                (PassthroughPolicy::Tolerant, KeyMode::DecryptOnly) => {
                    debug!("text is not hex; returning it as plaintext");
                    return Ok(text.as_bytes().to_vec());
                }
                (PassthroughPolicy::Tolerant, KeyMode::Encrypting) => {
                    debug!("text is not hex; trying raw bytes as ciphertext");
                    text.as_bytes().to_vec()
                }
                _ => return Err(e.into()),
            },
        };

        match self.inner.open(&blob)? {
            Opened::Plaintext(plaintext) => Ok(plaintext),
            Opened::Passthrough => Ok(text.as_bytes().to_vec()),
        }
    }
}

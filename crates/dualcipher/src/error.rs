//! Error taxonomy for cipher construction, encryption and decryption.

use thiserror::Error;

use crate::key::KeySlot;

/// Errors produced by the cipher layer.
///
/// No variant ever carries key bytes or payload bytes; lengths and slot names
/// are the only detail exposed.
#[derive(Debug, Error)]
pub enum CipherError {
    /// Neither a primary nor a secondary key was configured.
    #[error("no encryption keys provided")]
    NoKeysProvided,

    /// A configured key does not have the length the algorithm requires.
    #[error("invalid {slot} key: expected {expected} bytes, got {actual}")]
    InvalidKeyMaterial {
        /// Which key was rejected.
        slot: KeySlot,
        /// Required key length for the selected algorithm.
        expected: usize,
        /// Length of the supplied key.
        actual: usize,
    },

    /// The algorithm name is not one of the supported variants.
    #[error("unknown cipher algorithm: {0}")]
    UnknownAlgorithm(String),

    /// No primary key is configured, so nothing can be encrypted.
    #[error("no cipher defined, the encryption is disabled")]
    EncryptionDisabled,

    /// The blob is shorter than the algorithm's nonce.
    #[error("ciphertext too short: {len} bytes, nonce alone needs {nonce_size}")]
    MalformedInput {
        /// Length of the rejected blob.
        len: usize,
        /// Nonce size of the active algorithm.
        nonce_size: usize,
    },

    /// No configured key could authenticate the ciphertext.
    #[error("ciphertext failed authentication")]
    AuthenticationFailed,

    /// The operating system could not supply randomness for a nonce.
    #[error("secure random source unavailable")]
    EntropyUnavailable,

    /// The AEAD primitive refused to seal the payload.
    #[error("aead seal failed")]
    SealFailed,

    /// The text is not valid hex and no passthrough applies.
    #[error("invalid hex ciphertext: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// Encryption is disabled and the plaintext cannot be passed through as text.
    #[error("plaintext is not valid UTF-8 and cannot be stored unencrypted")]
    PlaintextNotText,
}

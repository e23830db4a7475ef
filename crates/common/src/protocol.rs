//! Request and response types exchanged with storage callers.
//!
//! All bodies are JSON. Ciphertext is the text form produced by the cipher
//! layer: lowercase hex, or the plaintext itself while encryption is disabled.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Encrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// Value to protect before it is persisted.
    pub plaintext: String,
}

/// Successful response body for `POST /encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// Text to persist in place of the plaintext.
    pub ciphertext: String,
}

// ---------------------------------------------------------------------------
// Decrypt endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Text exactly as it was read from storage.
    pub ciphertext: String,
}

/// Successful response body for `POST /decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// Recovered value.
    pub plaintext: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"unprocessable"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: String,
    /// Active algorithm name, e.g. `"xchacha20-poly1305"`.
    pub algorithm: String,
    /// Key state: `"encrypting"`, `"rotating"` or `"decrypt-only"`.
    pub mode: String,
    /// Fingerprint of the primary key, if configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key_id: Option<String>,
    /// Fingerprint of the secondary key, if configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_key_id: Option<String>,
}

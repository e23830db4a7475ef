//! Supported AEAD algorithms and their fixed sizes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::CipherError;

/// Byte length of every supported key (256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of every supported authentication tag (128 bits).
pub const TAG_LEN: usize = 16;

/// AEAD algorithm selected once when a cipher is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Algorithm {
    /// AES-256-GCM with a 96-bit random nonce.
    #[serde(rename = "aes-256-gcm", alias = "AES-256-GCM")]
    Aes256Gcm,
    /// XChaCha20-Poly1305 with a 192-bit random nonce.
    #[default]
    #[serde(rename = "xchacha20-poly1305", alias = "XCHACHA20-POLY1305")]
    XChaCha20Poly1305,
}

impl Algorithm {
    /// Required key length in bytes.
    pub const fn key_size(self) -> usize {
        KEY_LEN
    }

    /// Nonce length in bytes; every blob starts with this many bytes.
    pub const fn nonce_size(self) -> usize {
        match self {
            Algorithm::Aes256Gcm => 12,
            Algorithm::XChaCha20Poly1305 => 24,
        }
    }

    /// Authentication tag length in bytes.
    pub const fn tag_size(self) -> usize {
        TAG_LEN
    }

    /// Canonical lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Algorithm::Aes256Gcm => "aes-256-gcm",
            Algorithm::XChaCha20Poly1305 => "xchacha20-poly1305",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes-256-gcm" | "aes256gcm" => Ok(Algorithm::Aes256Gcm),
            "xchacha20-poly1305" | "xchacha20poly1305" => Ok(Algorithm::XChaCha20Poly1305),
            _ => Err(CipherError::UnknownAlgorithm(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_primitives() {
        assert_eq!(Algorithm::Aes256Gcm.key_size(), 32);
        assert_eq!(Algorithm::Aes256Gcm.nonce_size(), 12);
        assert_eq!(Algorithm::Aes256Gcm.tag_size(), 16);
        assert_eq!(Algorithm::XChaCha20Poly1305.key_size(), 32);
        assert_eq!(Algorithm::XChaCha20Poly1305.nonce_size(), 24);
        assert_eq!(Algorithm::XChaCha20Poly1305.tag_size(), 16);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("AES-256-GCM".parse::<Algorithm>().unwrap(), Algorithm::Aes256Gcm);
        assert_eq!(
            " xchacha20-poly1305 ".parse::<Algorithm>().unwrap(),
            Algorithm::XChaCha20Poly1305
        );
        assert!(matches!(
            "des".parse::<Algorithm>(),
            Err(CipherError::UnknownAlgorithm(name)) if name == "des"
        ));
    }

    #[test]
    fn display_matches_serde_name() {
        for algo in [Algorithm::Aes256Gcm, Algorithm::XChaCha20Poly1305] {
            let json = serde_json::to_string(&algo).unwrap();
            assert_eq!(json, format!("\"{algo}\""));
        }
    }

    #[test]
    fn default_is_xchacha() {
        assert_eq!(Algorithm::default(), Algorithm::XChaCha20Poly1305);
    }
}

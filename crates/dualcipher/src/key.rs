//! Secret key material and key slot naming.

use std::fmt;

use serde::{Deserialize, Deserializer};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Which of the two configured keys a value refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySlot {
    /// The key new writes are sealed with.
    Primary,
    /// The previous key, kept only to open older records.
    Secondary,
}

impl fmt::Display for KeySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySlot::Primary => f.write_str("primary"),
            KeySlot::Secondary => f.write_str("secondary"),
        }
    }
}

/// Raw secret key bytes.
///
/// The buffer is zeroed on drop and never printed. An empty value means
/// "not configured".
#[derive(Clone, Default, PartialEq, Eq)]
pub struct KeyMaterial(Zeroizing<Vec<u8>>);

impl KeyMaterial {
    /// Wrap raw key bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// Returns `true` when no key is configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length of the key in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Borrow the secret bytes.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    /// Short non-secret identifier: the first 8 bytes of SHA-256 over the key, hex-encoded.
    ///
    /// Returns `None` for an unconfigured key.
    pub fn fingerprint(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let digest = Sha256::digest(self.expose());
        Some(hex::encode(&digest[..8]))
    }
}

impl From<&str> for KeyMaterial {
    fn from(s: &str) -> Self {
        Self::new(s.as_bytes())
    }
}

impl From<String> for KeyMaterial {
    fn from(s: String) -> Self {
        Self::new(s.into_bytes())
    }
}

impl From<&[u8]> for KeyMaterial {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl AsRef<[u8]> for KeyMaterial {
    fn as_ref(&self) -> &[u8] {
        self.expose()
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("KeyMaterial(<unset>)")
        } else {
            f.write_str("KeyMaterial([REDACTED])")
        }
    }
}

impl<'de> Deserialize<'de> for KeyMaterial {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = Zeroizing::new(String::deserialize(deserializer)?);
        Ok(Self::new(s.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_is_redacted() {
        let key = KeyMaterial::from("a".repeat(32));
        let shown = format!("{key:?}");
        assert!(shown.contains("REDACTED"));
        assert!(!shown.contains("aaaa"));
        assert_eq!(format!("{:?}", KeyMaterial::default()), "KeyMaterial(<unset>)");
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = KeyMaterial::from("a".repeat(32));
        let b = KeyMaterial::from("b".repeat(32));
        let fp = a.fingerprint().unwrap();
        assert_eq!(fp.len(), 16);
        assert_eq!(Some(fp), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(KeyMaterial::default().fingerprint(), None);
    }

    #[test]
    fn deserializes_from_string() {
        let key: KeyMaterial = serde_json::from_str("\"secret\"").unwrap();
        assert_eq!(key.expose(), b"secret");
        let empty: KeyMaterial = serde_json::from_str("\"\"").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn slot_names() {
        assert_eq!(KeySlot::Primary.to_string(), "primary");
        assert_eq!(KeySlot::Secondary.to_string(), "secondary");
    }
}

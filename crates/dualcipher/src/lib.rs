//! Authenticated encryption of stored values with zero-downtime key rotation.
//!
//! A cipher holds up to two keys of one [`Algorithm`]:
//!
//! - **primary** seals every new write;
//! - **secondary** is the previous key, used only to open older records.
//!
//! Which keys are present decides how undecryptable input is handled; see
//! [`DualKeyCipher`] for the byte-level table and [`HexCipher`] for the text
//! encoding used by storage callers.
//!
//! # Ciphertext format
//!
//! ```text
//! hex( nonce || ciphertext || tag )
//! ```
//!
//! Key material is never logged; only SHA-256 fingerprints appear in traces.

pub mod aead;
pub mod algorithm;
pub mod dual;
pub mod error;
pub mod factory;
pub mod key;
pub mod text;

pub use algorithm::{Algorithm, KEY_LEN};
pub use dual::{DualKeyCipher, KeyMode, PassthroughPolicy};
pub use error::CipherError;
pub use factory::{construct, new_cipher, CipherBuilder};
pub use key::{KeyMaterial, KeySlot};
pub use text::HexCipher;

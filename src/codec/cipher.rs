//! Repeating-key XOR cipher.
//!
//! Obfuscation only: the key is public and short. The transform is
//! length-preserving and self-inverse, and it runs on arbitrary binary
//! content since the current method applies it to gzip output.

use crate::error::{Qr3kError, Result};

/// Canonical key shared by every encoder and the browser runtime
pub const DEFAULT_KEY: &[u8] = b"qr3k";

/// Non-empty cipher key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CipherKey(Vec<u8>);

impl CipherKey {
    /// Create a key, rejecting the empty key
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(Qr3kError::InvalidKey);
        }
        Ok(Self(bytes))
    }

    /// Key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length (always >= 1)
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// XOR `data` with this key, repeating the key as needed
    pub fn apply(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.0.iter().cycle())
            .map(|(byte, key)| byte ^ key)
            .collect()
    }
}

impl Default for CipherKey {
    fn default() -> Self {
        Self(DEFAULT_KEY.to_vec())
    }
}

/// XOR `data` with a raw key slice.
///
/// Fails with [`Qr3kError::InvalidKey`] when `key` is empty.
pub fn xor_with_key(data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
    Ok(CipherKey::new(key)?.apply(data))
}

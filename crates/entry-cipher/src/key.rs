//! [`EntryKey`]: the one-time 256-bit key for a single diary entry.

use hex::FromHexError;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::entropy::EntropySource;
use crate::error::{CipherError, KeyFormatError};

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Length of the hex key encoding.
pub const KEY_HEX_LEN: usize = KEY_LEN * 2;

/// Secret key material for one entry.
///
/// Overwritten with zeroes on drop and never printed, not even by `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct EntryKey([u8; KEY_LEN]);

impl EntryKey {
    /// Draw a fresh key from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::EncryptionFailure`] if the random source fails.
    pub fn generate<R: EntropySource + ?Sized>(rng: &mut R) -> Result<Self, CipherError> {
        let mut key = Self([0u8; KEY_LEN]);
        rng.fill(&mut key.0)
            .map_err(|_| CipherError::EncryptionFailure("random source unavailable for key generation"))?;
        Ok(key)
    }

    /// Wrap existing raw key bytes.
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub(crate) fn from_slice(bytes: &[u8]) -> Result<Self, KeyFormatError> {
        if bytes.len() != KEY_LEN {
            return Err(KeyFormatError::WrongLength {
                expected: KEY_LEN,
                actual: bytes.len(),
            });
        }
        let mut key = Self([0u8; KEY_LEN]);
        key.0.copy_from_slice(bytes);
        Ok(key)
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Encode as a 64-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode a hex key encoding.
    ///
    /// Upper-case digits are accepted; [`to_hex`](Self::to_hex) only ever
    /// produces lower-case.
    ///
    /// # Errors
    ///
    /// Returns a [`KeyFormatError`] for odd length, a non-hex character, or a
    /// decoded length other than [`KEY_LEN`].
    pub fn from_hex(encoded: &str) -> Result<Self, KeyFormatError> {
        let mut key = Self([0u8; KEY_LEN]);
        hex::decode_to_slice(encoded, &mut key.0).map_err(|e| match e {
            FromHexError::OddLength => KeyFormatError::OddLength,
            FromHexError::InvalidHexCharacter { index, .. } => KeyFormatError::InvalidCharacter(index),
            FromHexError::InvalidStringLength => KeyFormatError::WrongLength {
                expected: KEY_LEN,
                actual: encoded.len() / 2,
            },
        })?;
        Ok(key)
    }
}

impl std::fmt::Debug for EntryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EntryKey([REDACTED])")
    }
}

//! Envelope wrapping of entry keys under a long-lived master key.
//!
//! Storing an entry's hex key next to its container means anyone who can read
//! the record can play the entry. Wrapping the entry key with a master key
//! that never reaches storage closes that gap: the record then holds only the
//! wrapped form.
//!
//! # Wrapped key format
//!
//! ```text
//! v1.<base64url-no-pad(nonce)>.<base64url-no-pad(ciphertext+tag)>
//! ```
//!
//! The inner cipher is AES-256-GCM-SIV, which stays safe even if a nonce were
//! ever repeated under the master key. The version prefix is bound as
//! associated data.

use std::fmt;
use std::str::FromStr;

use aes_gcm_siv::{
    aead::{Aead, Key, KeyInit, Payload},
    Aes256GcmSiv, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::entropy::EntropySource;
use crate::error::{CipherError, KeyFormatError};
use crate::key::{EntryKey, KEY_LEN};

/// Prefix that appears at the start of every wrapped key.
pub const VERSION_PREFIX: &str = "v1";

/// Byte length of an AES-GCM-SIV nonce (12 bytes = 96 bits).
pub const WRAP_NONCE_LEN: usize = 12;

/// Key-encryption key used to wrap entry keys.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; KEY_LEN]);

impl MasterKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Parse a master key from 64 hex characters.
    ///
    /// # Errors
    ///
    /// Same rules as [`EntryKey::from_hex`].
    pub fn from_hex(encoded: &str) -> Result<Self, KeyFormatError> {
        let key = EntryKey::from_hex(encoded)?;
        Ok(Self(*key.as_bytes()))
    }

    fn cipher(&self) -> Aes256GcmSiv {
        Aes256GcmSiv::new(Key::<Aes256GcmSiv>::from_slice(&self.0))
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MasterKey([REDACTED])")
    }
}

/// A parsed wrapped key. Holds no plaintext key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedKey {
    pub nonce: [u8; WRAP_NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

impl WrappedKey {
    /// Returns `true` if `s` carries the wrapped-key prefix.
    ///
    /// Plain hex key encodings can never match because `.` is not a hex digit.
    pub fn is_wrapped(s: &str) -> bool {
        s.strip_prefix(VERSION_PREFIX)
            .is_some_and(|rest| rest.starts_with('.'))
    }
}

impl fmt::Display for WrappedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            VERSION_PREFIX,
            URL_SAFE_NO_PAD.encode(self.nonce),
            URL_SAFE_NO_PAD.encode(&self.ciphertext),
        )
    }
}

impl FromStr for WrappedKey {
    type Err = KeyFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(3, '.').collect();
        if parts.len() != 3 || parts[0] != VERSION_PREFIX {
            return Err(KeyFormatError::InvalidWrappedFormat);
        }
        let nonce_bytes = URL_SAFE_NO_PAD
            .decode(parts[1])
            .map_err(|_| KeyFormatError::InvalidWrappedFormat)?;
        let nonce: [u8; WRAP_NONCE_LEN] = nonce_bytes
            .try_into()
            .map_err(|_| KeyFormatError::InvalidWrappedFormat)?;
        let ciphertext = URL_SAFE_NO_PAD
            .decode(parts[2])
            .map_err(|_| KeyFormatError::InvalidWrappedFormat)?;
        Ok(Self { nonce, ciphertext })
    }
}

/// Wrap `key` under `master`, returning the `v1.` string form.
///
/// # Errors
///
/// Returns [`CipherError::EncryptionFailure`] if the random source fails or
/// the AEAD primitive rejects the operation.
pub fn wrap_key<R: EntropySource + ?Sized>(
    master: &MasterKey,
    rng: &mut R,
    key: &EntryKey,
) -> Result<String, CipherError> {
    let mut nonce = [0u8; WRAP_NONCE_LEN];
    rng.fill(&mut nonce)
        .map_err(|_| CipherError::EncryptionFailure("random source unavailable for key wrapping"))?;

    let ciphertext = master
        .cipher()
        .encrypt(
            Nonce::from_slice(&nonce),
            Payload {
                msg: key.as_bytes(),
                aad: VERSION_PREFIX.as_bytes(),
            },
        )
        .map_err(|_| CipherError::EncryptionFailure("key wrapping failed"))?;

    Ok(WrappedKey { nonce, ciphertext }.to_string())
}

/// Recover the entry key from its wrapped string form.
///
/// # Errors
///
/// - [`CipherError::MalformedKey`] if `wrapped` is not a well-formed `v1.` key
///   or unwraps to the wrong length.
/// - [`CipherError::AuthenticationFailure`] if the wrapped key was produced
///   under a different master key or has been altered.
pub fn unwrap_key(master: &MasterKey, wrapped: &str) -> Result<EntryKey, CipherError> {
    let parsed: WrappedKey = wrapped.parse()?;
    let raw = Zeroizing::new(
        master
            .cipher()
            .decrypt(
                Nonce::from_slice(&parsed.nonce),
                Payload {
                    msg: &parsed.ciphertext,
                    aad: VERSION_PREFIX.as_bytes(),
                },
            )
            .map_err(|_| CipherError::AuthenticationFailure)?,
    );
    Ok(EntryKey::from_slice(&raw)?)
}

//! Error types for the entry cipher.

use thiserror::Error;

use crate::cipher::MIN_CONTAINER_LEN;

/// Errors produced by sealing, opening, and key wrapping.
///
/// Each variant is a distinct failure kind so that callers can tell a
/// formatting bug in their storage path apart from tampering or a key mismatch.
/// No variant ever carries key or plaintext material.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The random source failed or the AEAD primitive rejected the operation.
    ///
    /// Fatal for the call. Callers must abort the save rather than retry with
    /// weaker randomness.
    #[error("encryption failure: {0}")]
    EncryptionFailure(&'static str),

    /// The key string could not be decoded into a 256-bit key.
    #[error("malformed key: {0}")]
    MalformedKey(#[from] KeyFormatError),

    /// The container is too short to hold a nonce and an authentication tag.
    #[error("malformed container: expected at least {MIN_CONTAINER_LEN} bytes, got {0}")]
    MalformedContainer(usize),

    /// The authentication tag did not verify: wrong key, corruption, or tampering.
    #[error("authentication failed: wrong key or tampered data")]
    AuthenticationFailure,
}

/// Reasons a key string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum KeyFormatError {
    #[error("odd number of hex digits")]
    OddLength,

    #[error("non-hex character at byte {0}")]
    InvalidCharacter(usize),

    #[error("expected {expected} key bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("wrapped key is not of the form v1.<nonce>.<ciphertext>")]
    InvalidWrappedFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_format_error_converts() {
        let err: CipherError = KeyFormatError::OddLength.into();
        assert!(matches!(err, CipherError::MalformedKey(KeyFormatError::OddLength)));
    }

    #[test]
    fn container_error_names_minimum() {
        let msg = CipherError::MalformedContainer(5).to_string();
        assert!(msg.contains("28"), "{msg}");
        assert!(msg.contains('5'));
    }
}

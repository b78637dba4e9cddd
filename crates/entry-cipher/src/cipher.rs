//! AES-256-GCM sealing and opening of entry payloads.
//!
//! # Container format
//!
//! ```text
//! nonce (12 bytes) || ciphertext (plaintext_len bytes) || tag (16 bytes)
//! ```
//!
//! A fresh key and a fresh random nonce are drawn for every call to
//! [`encrypt_with`], so a (key, nonce) pair is never reused. No associated
//! data is bound.

use aes_gcm::{
    aead::{Aead, AeadInPlace, KeyInit},
    Aes256Gcm, Key, Nonce,
};
use tracing::debug;

use crate::entropy::{EntropySource, OsRng};
use crate::error::CipherError;
use crate::key::EntryKey;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Smallest valid container: the sealed form of an empty payload.
pub const MIN_CONTAINER_LEN: usize = NONCE_LEN + TAG_LEN;

/// Output of [`encrypt`]: the container to upload and the key that opens it.
///
/// Both halves must be stored together. Losing either one makes the entry
/// unrecoverable.
pub struct SealedEntry {
    container: Vec<u8>,
    key: EntryKey,
}

impl SealedEntry {
    /// The `nonce || ciphertext || tag` blob.
    pub fn container(&self) -> &[u8] {
        &self.container
    }

    /// The one-time key for this entry.
    pub fn key(&self) -> &EntryKey {
        &self.key
    }

    /// The key as 64 lowercase hex characters.
    pub fn key_encoding(&self) -> String {
        self.key.to_hex()
    }

    /// Split into the container and the hex key encoding.
    pub fn into_parts(self) -> (Vec<u8>, String) {
        let key_encoding = self.key.to_hex();
        (self.container, key_encoding)
    }
}

impl std::fmt::Debug for SealedEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealedEntry")
            .field("container_len", &self.container.len())
            .field("key", &self.key)
            .finish()
    }
}

/// Size of the container produced for a payload of `plaintext_len` bytes.
pub const fn sealed_len(plaintext_len: usize) -> usize {
    MIN_CONTAINER_LEN + plaintext_len
}

/// Seal `plaintext` under a new key drawn from the OS CSPRNG.
///
/// # Errors
///
/// Returns [`CipherError::EncryptionFailure`] if the OS random source is
/// unavailable or the AEAD primitive rejects the payload.
pub fn encrypt(plaintext: &[u8]) -> Result<SealedEntry, CipherError> {
    encrypt_with(&mut OsRng, plaintext)
}

/// Seal `plaintext` under a new key, drawing the key and nonce from `rng`.
///
/// # Errors
///
/// Same as [`encrypt`].
pub fn encrypt_with<R: EntropySource + ?Sized>(
    rng: &mut R,
    plaintext: &[u8],
) -> Result<SealedEntry, CipherError> {
    let key = EntryKey::generate(rng)?;
    let container = seal(&key, rng, plaintext)?;
    Ok(SealedEntry { container, key })
}

/// Open a container with its hex key encoding.
///
/// # Errors
///
/// - [`CipherError::MalformedKey`] if `key_encoding` is not 64 hex digits.
/// - [`CipherError::MalformedContainer`] if `container` is shorter than
///   [`MIN_CONTAINER_LEN`].
/// - [`CipherError::AuthenticationFailure`] if the tag does not verify. No
///   plaintext is returned in that case.
pub fn decrypt(container: &[u8], key_encoding: &str) -> Result<Vec<u8>, CipherError> {
    let key = EntryKey::from_hex(key_encoding)?;
    decrypt_with_key(container, &key)
}

/// Open a container with an already-decoded key.
///
/// # Errors
///
/// Same as [`decrypt`], minus the key decoding step.
pub fn decrypt_with_key(container: &[u8], key: &EntryKey) -> Result<Vec<u8>, CipherError> {
    let (nonce, ciphertext) = split_container(container)?;
    build_cipher(key)
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| {
            debug!(container_len = container.len(), "entry failed authentication");
            CipherError::AuthenticationFailure
        })
}

/// Split a container into its nonce and its ciphertext-with-tag.
///
/// # Errors
///
/// Returns [`CipherError::MalformedContainer`] if `container` is shorter than
/// [`MIN_CONTAINER_LEN`].
pub fn split_container(container: &[u8]) -> Result<(&[u8], &[u8]), CipherError> {
    if container.len() < MIN_CONTAINER_LEN {
        return Err(CipherError::MalformedContainer(container.len()));
    }
    Ok(container.split_at(NONCE_LEN))
}

fn seal<R: EntropySource + ?Sized>(
    key: &EntryKey,
    rng: &mut R,
    plaintext: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill(&mut nonce)
        .map_err(|_| CipherError::EncryptionFailure("random source unavailable for nonce generation"))?;

    // Encrypt in place behind the nonce so large payloads are copied once.
    let mut container = Vec::with_capacity(sealed_len(plaintext.len()));
    container.extend_from_slice(&nonce);
    container.extend_from_slice(plaintext);
    let tag = build_cipher(key)
        .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut container[NONCE_LEN..])
        .map_err(|_| CipherError::EncryptionFailure("aead primitive rejected the payload"))?;
    container.extend_from_slice(&tag);
    Ok(container)
}

fn build_cipher(key: &EntryKey) -> Aes256Gcm {
    Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::entropy::{EntropyError, MockEntropySource};
    use crate::error::KeyFormatError;
    use crate::key::{KEY_HEX_LEN, KEY_LEN};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn four_byte_payload() {
        let plaintext = [0x01, 0x02, 0x03, 0x04];
        let (container, key) = encrypt(&plaintext).unwrap().into_parts();

        assert_eq!(container.len(), 32);
        assert_eq!(key.len(), KEY_HEX_LEN);
        assert!(key.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        assert_eq!(decrypt(&container, &key).unwrap(), plaintext);
    }

    #[test]
    fn empty_payload_round_trip() {
        let (container, key) = encrypt(b"").unwrap().into_parts();
        assert_eq!(container.len(), MIN_CONTAINER_LEN);
        assert!(decrypt(&container, &key).unwrap().is_empty());
    }

    #[test]
    fn ten_megabyte_round_trip() {
        let plaintext: Vec<u8> = (0..10 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
        let sealed = encrypt(&plaintext).unwrap();
        assert_eq!(sealed.container().len(), sealed_len(plaintext.len()));
        let opened = decrypt_with_key(sealed.container(), sealed.key()).unwrap();
        assert!(opened == plaintext);
    }

    #[test]
    fn ciphertext_differs_from_plaintext() {
        let plaintext = b"webm audio frames webm audio frames";
        let sealed = encrypt(plaintext).unwrap();
        let (_, body) = split_container(sealed.container()).unwrap();
        assert_ne!(&body[..plaintext.len()], plaintext);
    }

    #[test]
    fn keys_and_containers_are_unique() {
        let plaintext = b"same entry every time";
        let mut keys = HashSet::new();
        let mut nonces = HashSet::new();
        let mut containers = HashSet::new();
        for _ in 0..200 {
            let sealed = encrypt(plaintext).unwrap();
            nonces.insert(sealed.container()[..NONCE_LEN].to_vec());
            let (container, key) = sealed.into_parts();
            keys.insert(key);
            containers.insert(container);
        }
        assert_eq!(keys.len(), 200);
        assert_eq!(nonces.len(), 200);
        assert_eq!(containers.len(), 200);
    }

    #[test]
    fn every_single_bit_flip_is_detected() {
        let (container, key) = encrypt(&[0x01, 0x02, 0x03, 0x04]).unwrap().into_parts();
        for byte in 0..container.len() {
            for bit in 0..8 {
                let mut tampered = container.clone();
                tampered[byte] ^= 1 << bit;
                let result = decrypt(&tampered, &key);
                assert!(
                    matches!(result, Err(CipherError::AuthenticationFailure)),
                    "flip at byte {byte} bit {bit} not detected"
                );
            }
        }
    }

    #[test]
    fn truncated_container_fails_closed() {
        let (container, key) = encrypt(b"a longer recording").unwrap().into_parts();
        let result = decrypt(&container[..container.len() - 1], &key);
        assert!(matches!(result, Err(CipherError::AuthenticationFailure)));
    }

    #[test]
    fn wrong_key_is_rejected() {
        let (container, _) = encrypt(b"secret entry").unwrap().into_parts();
        let (_, other_key) = encrypt(b"secret entry").unwrap().into_parts();
        let result = decrypt(&container, &other_key);
        assert!(matches!(result, Err(CipherError::AuthenticationFailure)));
    }

    #[test]
    fn short_container_is_malformed() {
        let key = "00".repeat(KEY_LEN);
        for len in [0, 1, NONCE_LEN, MIN_CONTAINER_LEN - 1] {
            let result = decrypt(&vec![0u8; len], &key);
            assert!(
                matches!(result, Err(CipherError::MalformedContainer(n)) if n == len),
                "length {len}"
            );
        }
    }

    #[test]
    fn minimum_length_garbage_fails_authentication() {
        let key = "00".repeat(KEY_LEN);
        let result = decrypt(&[0u8; MIN_CONTAINER_LEN], &key);
        assert!(matches!(result, Err(CipherError::AuthenticationFailure)));
    }

    #[test]
    fn malformed_keys_are_rejected() {
        let (container, key) = encrypt(b"entry").unwrap().into_parts();

        let odd = &key[..KEY_HEX_LEN - 1];
        assert!(matches!(
            decrypt(&container, odd),
            Err(CipherError::MalformedKey(KeyFormatError::OddLength))
        ));

        let mut bad_char = key.clone();
        bad_char.replace_range(0..1, "z");
        assert!(matches!(
            decrypt(&container, &bad_char),
            Err(CipherError::MalformedKey(KeyFormatError::InvalidCharacter(0)))
        ));

        let short = &key[..KEY_HEX_LEN - 2];
        assert!(matches!(
            decrypt(&container, short),
            Err(CipherError::MalformedKey(KeyFormatError::WrongLength { .. }))
        ));
    }

    #[test]
    fn key_is_checked_before_container() {
        let result = decrypt(&[], "xyz");
        assert!(matches!(result, Err(CipherError::MalformedKey(_))));
    }

    #[test]
    fn seeded_source_gives_reproducible_fixture() {
        let a = encrypt_with(&mut StdRng::seed_from_u64(42), b"fixture").unwrap();
        let b = encrypt_with(&mut StdRng::seed_from_u64(42), b"fixture").unwrap();
        assert_eq!(a.container(), b.container());
        assert_eq!(a.key_encoding(), b.key_encoding());

        let c = encrypt_with(&mut StdRng::seed_from_u64(43), b"fixture").unwrap();
        assert_ne!(a.key_encoding(), c.key_encoding());
    }

    #[test]
    fn key_and_nonce_are_drawn_separately() {
        let mut mock = MockEntropySource::new();
        let mut calls = 0u8;
        mock.expect_fill().times(2).returning(move |dest| {
            calls += 1;
            dest.fill(calls);
            Ok(())
        });

        let sealed = encrypt_with(&mut mock, b"entry").unwrap();
        assert_eq!(sealed.key().as_bytes(), &[1u8; KEY_LEN]);
        assert_eq!(&sealed.container()[..NONCE_LEN], &[2u8; NONCE_LEN]);
        assert_eq!(decrypt_with_key(sealed.container(), sealed.key()).unwrap(), b"entry");
    }

    #[test]
    fn entropy_failure_on_key_generation() {
        let mut mock = MockEntropySource::new();
        mock.expect_fill().times(1).returning(|_| Err(EntropyError));

        let result = encrypt_with(&mut mock, b"entry");
        assert!(matches!(result, Err(CipherError::EncryptionFailure(_))));
    }

    #[test]
    fn entropy_failure_on_nonce_generation() {
        let mut mock = MockEntropySource::new();
        let mut calls = 0u8;
        mock.expect_fill().times(2).returning(move |dest| {
            calls += 1;
            if calls == 1 {
                dest.fill(7);
                Ok(())
            } else {
                Err(EntropyError)
            }
        });

        let result = encrypt_with(&mut mock, b"entry");
        assert!(matches!(result, Err(CipherError::EncryptionFailure(_))));
    }

    #[test]
    fn concurrent_calls_are_independent() {
        std::thread::scope(|s| {
            let handles: Vec<_> = (0..8u8)
                .map(|i| {
                    s.spawn(move || {
                        let payload = vec![i; 4096];
                        let (container, key) = encrypt(&payload).unwrap().into_parts();
                        assert_eq!(decrypt(&container, &key).unwrap(), payload);
                        key
                    })
                })
                .collect();
            let keys: HashSet<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            assert_eq!(keys.len(), 8);
        });
    }

    #[test]
    fn debug_hides_key() {
        let sealed = encrypt(b"entry").unwrap();
        let printed = format!("{sealed:?}");
        assert!(printed.contains("REDACTED"));
        assert!(!printed.contains(&sealed.key_encoding()));
    }
}

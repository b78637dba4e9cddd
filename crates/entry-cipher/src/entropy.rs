//! Injected random source used for key and nonce generation.
//!
//! Every operation that needs randomness takes an [`EntropySource`] argument
//! instead of reaching for a global generator. Production callers pass
//! [`OsRng`]; tests pass a seeded generator for reproducible fixtures or a
//! mock that fails on demand.

use aes_gcm::aead::rand_core::{CryptoRng, RngCore};
use thiserror::Error;

pub use aes_gcm::aead::OsRng;

/// The random source could not produce bytes.
#[derive(Debug, Clone, Copy, Error)]
#[error("random source unavailable")]
pub struct EntropyError;

/// A cryptographically secure source of random bytes.
#[cfg_attr(test, mockall::automock)]
pub trait EntropySource {
    /// Fill `dest` entirely with random bytes.
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError>;
}

// Only `CryptoRng` generators qualify, so a plain PRNG can't be passed by accident.
impl<R: RngCore + CryptoRng> EntropySource for R {
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        self.try_fill_bytes(dest).map_err(|_| EntropyError)
    }
}

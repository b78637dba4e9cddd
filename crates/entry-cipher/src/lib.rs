//! Per-entry encryption of recorded diary audio.
//!
//! Every entry is sealed under its own freshly generated AES-256-GCM key. The
//! caller receives an opaque container (`nonce || ciphertext || tag`) and a
//! 64-character hex key, stores both, and hands both back to [`decrypt`] on
//! playback. Any corruption, tampering, or key mix-up fails closed with
//! [`CipherError::AuthenticationFailure`].
//!
//! The [`wrap`] module optionally wraps entry keys under a master key so the
//! stored key string alone no longer opens the entry.
//!
//! All operations are stateless and safe to call concurrently. They are
//! CPU-bound; async callers should run them on a blocking worker pool.

pub mod cipher;
pub mod entropy;
pub mod error;
pub mod key;
pub mod wrap;

pub use cipher::{
    decrypt, decrypt_with_key, encrypt, encrypt_with, sealed_len, SealedEntry, MIN_CONTAINER_LEN,
    NONCE_LEN, TAG_LEN,
};
pub use entropy::{EntropyError, EntropySource, OsRng};
pub use error::{CipherError, KeyFormatError};
pub use key::{EntryKey, KEY_HEX_LEN, KEY_LEN};
pub use wrap::{unwrap_key, wrap_key, MasterKey, WrappedKey};

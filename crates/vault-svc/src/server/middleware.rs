//! Limits applied by the router's middleware layers.

use std::time::Duration;

use entry_cipher::MIN_CONTAINER_LEN;

use crate::config::Config;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default request body cap.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Room left in an open request for the key string and the JSON framing.
pub const OPEN_JSON_OVERHEAD: usize = 1024;

/// Request size and time limits.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_body_bytes: MAX_BODY_BYTES,
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl Limits {
    /// Body cap for `/entries/open`.
    ///
    /// Large enough to carry, as base64 inside JSON, the container of any
    /// recording that `/entries/seal` accepts.
    pub fn open_body_bytes(&self) -> usize {
        self.max_body_bytes
            .saturating_add(MIN_CONTAINER_LEN)
            .div_ceil(3)
            .saturating_mul(4)
            .saturating_add(OPEN_JSON_OVERHEAD)
    }
}

impl From<&Config> for Limits {
    fn from(cfg: &Config) -> Self {
        Self {
            max_body_bytes: cfg.max_body_bytes,
            request_timeout: cfg.request_timeout(),
        }
    }
}

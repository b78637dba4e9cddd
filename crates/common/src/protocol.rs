//! Request and response bodies of the entry vault HTTP API.
//!
//! Binary containers travel as standard (padded) base64 inside JSON. The
//! plaintext audio itself is sent and returned as a raw octet stream.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Seal endpoint
// ---------------------------------------------------------------------------

/// Response body for `POST /entries/seal`.
///
/// `container` and `key` must be persisted together under the same entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealResponse {
    /// Base64 of `nonce || ciphertext || tag`.
    pub container: String,
    /// Hex key encoding, or a `v1.` wrapped key when `key_wrapped` is set.
    pub key: String,
    /// Whether `key` is wrapped under the service master key.
    pub key_wrapped: bool,
}

// ---------------------------------------------------------------------------
// Open endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /entries/open`.
#[derive(Clone, Serialize, Deserialize)]
pub struct OpenRequest {
    /// Base64 container exactly as returned by the seal endpoint.
    pub container: String,
    /// Key string exactly as returned by the seal endpoint.
    pub key: String,
}

impl std::fmt::Debug for OpenRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenRequest")
            .field("container_len", &self.container.len())
            .field("key", &"[REDACTED]")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"malformed_key"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Whether sealed keys are wrapped under a master key.
    pub key_wrapping: bool,
}

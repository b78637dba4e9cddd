//! Service-level error type shared across crates.

use entry_cipher::CipherError;
use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`], [`ServiceError::MalformedKey`],
///   [`ServiceError::MalformedContainer`] → 400
/// - [`ServiceError::PayloadTooLarge`] → 413
/// - [`ServiceError::UnsupportedMediaType`] → 415
/// - [`ServiceError::AuthenticationFailure`] → 422
/// - [`ServiceError::EncryptionFailure`], [`ServiceError::Internal`] → 500
/// - [`ServiceError::Unavailable`] → 503
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request itself was unusable (wrong content, bad JSON).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured size limit.
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    /// The request body was not sent as `application/json`.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The key string could not be decoded.
    #[error("malformed key: {0}")]
    MalformedKey(String),

    /// The container could not be decoded or is too short.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// The container did not authenticate under the supplied key.
    #[error("authentication failed: wrong key or tampered data")]
    AuthenticationFailure,

    /// Sealing failed in the random source or the AEAD primitive.
    #[error("encryption failure: {0}")]
    EncryptionFailure(String),

    /// A required resource (the master key) is not configured.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::PayloadTooLarge(_) => 413,
            ServiceError::UnsupportedMediaType(_) => 415,
            ServiceError::MalformedKey(_) => 400,
            ServiceError::MalformedContainer(_) => 400,
            ServiceError::AuthenticationFailure => 422,
            ServiceError::EncryptionFailure(_) => 500,
            ServiceError::Unavailable(_) => 503,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable code used in error response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::PayloadTooLarge(_) => "payload_too_large",
            ServiceError::UnsupportedMediaType(_) => "unsupported_media_type",
            ServiceError::MalformedKey(_) => "malformed_key",
            ServiceError::MalformedContainer(_) => "malformed_container",
            ServiceError::AuthenticationFailure => "authentication_failed",
            ServiceError::EncryptionFailure(_) => "encryption_failure",
            ServiceError::Unavailable(_) => "service_unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

impl From<CipherError> for ServiceError {
    fn from(err: CipherError) -> Self {
        match err {
            CipherError::EncryptionFailure(reason) => ServiceError::EncryptionFailure(reason.into()),
            CipherError::MalformedKey(reason) => ServiceError::MalformedKey(reason.to_string()),
            e @ CipherError::MalformedContainer(_) => ServiceError::MalformedContainer(e.to_string()),
            CipherError::AuthenticationFailure => ServiceError::AuthenticationFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entry_cipher::KeyFormatError;

    #[test]
    fn http_status_codes() {
        assert_eq!(ServiceError::BadRequest("x".into()).http_status(), 400);
        assert_eq!(ServiceError::PayloadTooLarge("x".into()).http_status(), 413);
        assert_eq!(
            ServiceError::UnsupportedMediaType("x".into()).http_status(),
            415
        );
        assert_eq!(ServiceError::MalformedKey("x".into()).http_status(), 400);
        assert_eq!(ServiceError::MalformedContainer("x".into()).http_status(), 400);
        assert_eq!(ServiceError::AuthenticationFailure.http_status(), 422);
        assert_eq!(
            ServiceError::EncryptionFailure("x".into()).http_status(),
            500
        );
        assert_eq!(ServiceError::Unavailable("x".into()).http_status(), 503);
        assert_eq!(ServiceError::Internal("x".into()).http_status(), 500);
    }

    #[test]
    fn cipher_errors_keep_their_kind() {
        let e: ServiceError = CipherError::MalformedKey(KeyFormatError::OddLength).into();
        assert_eq!(e.code(), "malformed_key");

        let e: ServiceError = CipherError::MalformedContainer(3).into();
        assert_eq!(e.code(), "malformed_container");
        assert!(e.to_string().contains("got 3"));

        let e: ServiceError = CipherError::AuthenticationFailure.into();
        assert_eq!(e.code(), "authentication_failed");

        let e: ServiceError = CipherError::EncryptionFailure("rng").into();
        assert_eq!(e.code(), "encryption_failure");
    }

    #[test]
    fn display_includes_message() {
        let e = ServiceError::BadRequest("body is not JSON".into());
        assert!(e.to_string().contains("body is not JSON"));
    }
}

//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use common::protocol::{ErrorResponse, HealthResponse, OpenRequest, SealResponse};
use common::ServiceError;
use entry_cipher::{
    decrypt_with_key, encrypt, unwrap_key, wrap_key, CipherError, EntryKey, OsRng, WrappedKey,
};
use tracing::{error, info, warn};

use super::state::AppState;

/// Error returned by handlers, rendered as an [`ErrorResponse`] body.
#[derive(Debug)]
pub struct ApiError(pub ServiceError);

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self(err)
    }
}

impl From<CipherError> for ApiError {
    fn from(err: CipherError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(code = self.0.code(), error = %self.0, "request failed");
        } else {
            warn!(code = self.0.code(), "request rejected");
        }
        (status, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

/// `POST /entries/seal`: encrypt a recording under a fresh one-time key.
///
/// The request body is the raw audio. The response carries the base64
/// container and the key string, wrapped when a master key is configured.
pub async fn seal(State(state): State<AppState>, body: Bytes) -> Result<Json<SealResponse>, ApiError> {
    let plaintext_len = body.len();
    let sealed = run_blocking(move || encrypt(&body)).await?;

    let (key, key_wrapped) = match state.master_key.as_deref() {
        Some(master) => (wrap_key(master, &mut OsRng, sealed.key())?, true),
        None => (sealed.key_encoding(), false),
    };

    info!(
        plaintext_len,
        container_len = sealed.container().len(),
        key_wrapped,
        "entry sealed"
    );

    Ok(Json(SealResponse {
        container: STANDARD.encode(sealed.container()),
        key,
        key_wrapped,
    }))
}

/// `POST /entries/open`: decrypt a stored container with its key string.
///
/// Responds with the original audio as `application/octet-stream`.
pub async fn open(
    State(state): State<AppState>,
    req: Result<Json<OpenRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = req.map_err(rejection_error)?;

    let key = resolve_key(&state, &req.key)?;
    let container = STANDARD
        .decode(req.container.as_bytes())
        .map_err(|_| ServiceError::MalformedContainer("container is not valid base64".into()))?;

    let container_len = container.len();
    let plaintext = run_blocking(move || decrypt_with_key(&container, &key)).await?;
    info!(container_len, plaintext_len = plaintext.len(), "entry opened");

    Ok((
        [(header::CONTENT_TYPE, "application/octet-stream")],
        plaintext,
    )
        .into_response())
}

/// `GET /health`: liveness check.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        key_wrapping: state.key_wrapping(),
    })
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// Keep the size and content-type statuses axum reports; anything else about
/// the JSON body is a plain bad request.
fn rejection_error(rejection: JsonRejection) -> ServiceError {
    match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => ServiceError::PayloadTooLarge(rejection.body_text()),
        StatusCode::UNSUPPORTED_MEDIA_TYPE => {
            ServiceError::UnsupportedMediaType(rejection.body_text())
        }
        _ => ServiceError::BadRequest(rejection.body_text()),
    }
}

/// Turn a stored key string back into an [`EntryKey`].
///
/// Plain hex keys are always accepted, so entries sealed before wrapping was
/// enabled stay playable. Wrapped keys need the master key.
fn resolve_key(state: &AppState, key: &str) -> Result<EntryKey, ServiceError> {
    if WrappedKey::is_wrapped(key) {
        let master = state.master_key.as_deref().ok_or_else(|| {
            ServiceError::Unavailable("key is wrapped but no master key is configured".into())
        })?;
        return Ok(unwrap_key(master, key)?);
    }
    Ok(EntryKey::from_hex(key).map_err(CipherError::from)?)
}

/// Run CPU-bound cipher work on the blocking pool.
async fn run_blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, CipherError> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServiceError::Internal(format!("cipher task failed: {e}")))?;
    Ok(result?)
}

//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use entry_cipher::MasterKey;

/// Application state shared across all request handlers.
///
/// Cheap to clone: the master key sits behind an `Arc` and is never copied.
#[derive(Clone, Default)]
pub struct AppState {
    /// Master key for wrapping entry keys; `None` leaves keys as plain hex.
    pub master_key: Option<Arc<MasterKey>>,
}

impl AppState {
    /// Create a new [`AppState`] with an optional master key.
    pub fn new(master_key: Option<MasterKey>) -> Self {
        Self {
            master_key: master_key.map(Arc::new),
        }
    }

    pub fn key_wrapping(&self) -> bool {
        self.master_key.is_some()
    }
}

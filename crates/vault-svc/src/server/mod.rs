//! Axum HTTP server, routing, and middleware.
//!
//! # Responsibilities
//! - Define the Axum router with all routes and shared middleware.
//! - Inject shared application state (`AppState`) into handlers.
//! - Run cipher work on the blocking pool so request tasks never stall on it.

pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

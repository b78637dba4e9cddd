//! Wire types and the service error taxonomy shared by entry vault crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;

// HTTP API routes
//
// This module contains all HTTP route handlers for the public API.
// Each submodule handles a specific resource type with its own AppState.

pub mod common;
pub mod error;
pub mod events;
pub mod notifications;
pub mod resources;
pub mod sse;
pub mod validation;
pub mod venues;

// Re-export common types
pub use common::{ErrorResponse, ListResponse};
pub use error::ApiError;

//! Shared types for the dinein backend
//!
//! Error types, API response structures and domain models used by the
//! HTTP service and its tests.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};

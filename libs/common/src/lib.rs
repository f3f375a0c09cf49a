//! Common library for the Mission Control frontend
//!
//! This crate provides the shared integration point with the REST backend:
//! the HTTP client wrapper, its configuration, and the error taxonomy every
//! page handler sees when a backend call fails.

pub mod api;
pub mod config;
pub mod error;

pub use api::ApiClient;
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};

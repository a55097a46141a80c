//! HTTP-facing error types
//!
//! - `app_error`: maps workflow errors to JSON error responses
//! - `auth_error`: failures of the API secret middleware

pub mod app_error;
pub mod auth_error;

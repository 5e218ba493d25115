//! HTTP client for the admin REST backend.
//!
//! This module provides:
//! - [`ApiClient`], the single shared client every resource module goes through
//! - [`ApiError`], the outcome of a failed call
//!
//! # Behaviour on every call
//!
//! 1. The stored session token, if any, is attached as a bearer credential
//! 2. A 401 clears the token and notifies "session expired"
//! 3. Any other failure notifies the backend's `message` or a generic text
//! 4. The error is returned to the caller in every case

mod client;
mod error;

pub use client::ApiClient;
pub use error::ApiError;

//! Storekeep admin client library.
//!
//! A headless client for an e-commerce admin backend: a bearer-token HTTP
//! client, one API module per backend resource, an authentication context,
//! a route guard and the page views of the dashboard. Rendering is left to
//! the caller; the `sk` CLI is one such caller.
//!
//! ```text
//! view ──▶ api module ──▶ ApiClient ──▶ backend
//!                            │ 401
//!                            ▼
//!               SessionStore cleared ──▶ AuthContext (Anonymous)
//!                                            │
//!                              RouteGuard ◀──┘ redirect to /admin/login
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod models;
pub mod nav;
pub mod notify;
pub mod session;
pub mod state;
pub mod views;

pub use error::AppError;
pub use state::AdminApp;

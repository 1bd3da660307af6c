//! Web layer for tokengate.
//!
//! Provides the per-request authentication gate, the request context it
//! produces, route guards and the signup/login service.

pub mod account_api;
pub mod auth_service;
pub mod ctx;
pub mod error;
pub mod mw_auth;
pub mod prelude;

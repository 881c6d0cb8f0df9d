//! # API Shared
//!
//! Shared utilities and definitions for the Learning Hub APIs.
//!
//! Contains:
//! - Wire types (`wire` module): request and response bodies with OpenAPI schemas
//! - Shared services like `HealthService`
//! - Admin key validation (usable by the REST server and the operator tooling)
//!
//! Used by `hub-core` and `api-rest` for common functionality.

pub mod auth;
pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;

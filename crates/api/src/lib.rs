//! HTTP API layer for savora.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: recipes, comments, social graph, reports, admin
//! - **Extractors**: authentication
//! - **Middleware**: bearer-token resolution
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;

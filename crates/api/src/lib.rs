//! HTTP API layer for the CommunityFix server.
//!
//! This crate provides the REST API:
//!
//! - **Endpoints**: reports, comments, follows, notifications, badges,
//!   uploads, users, admin
//! - **Extractors**: authenticated-user extraction from bearer tokens
//! - **Middleware**: authentication, shared application state
//!
//! Built on Axum 0.8 with Tower middleware stack.

// Allow dead_code for API compatibility fields in request structs
#![allow(dead_code)]

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;

//! Signed-URL issuer
//!
//! Hands out short-lived presigned S3 URLs so clients can upload and download
//! objects directly against the bucket.

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// Signed-URL generation
pub mod object_storage;

/// HTTP routes
pub mod routes;

/// Server setup
pub mod server;

/// Configuration and error types
pub mod types;

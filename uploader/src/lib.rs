//! Upload client
//!
//! Takes one image or video at a time through the signed-URL flow: request an
//! upload URL, `PUT` the bytes straight to the object store, request a download
//! URL and display the stored object.

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// Network steps
pub mod backend;

/// Client configuration
pub mod config;

/// Error types
pub mod error;

/// State machine driver
pub mod orchestrator;

/// Display layer
pub mod render;

/// Pure upload state machine
pub mod state;

/// Selection checks
pub mod validation;

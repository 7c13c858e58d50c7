//! Shared types, adapter traits, and the error type of the admin console.
//!
//! Everything here is free of web-server and storage specifics so the
//! adapter crates and the feature crates can depend on it independently.

pub mod blob;
pub mod error;
pub mod permission_adapter;
pub mod prelude;
pub mod types;

// vim: ts=4

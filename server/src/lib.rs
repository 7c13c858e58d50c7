//! Admin console server of the update service.
//!
//! Wires the permission store, the HTML templates and the admin views into
//! one axum application. The binary reads its configuration from the
//! environment; tests build the same application around a temporary store.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod routes;

mod prelude;

pub use crate::app::AppBuilder;
pub use aus_core::app::{App, AppState};

// vim: ts=4

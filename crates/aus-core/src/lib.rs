//! Core infrastructure of the admin console.
//!
//! Feature crates build their views on top of this: the shared app state,
//! request extractors, the login and permission gates, transaction handling,
//! CEF audit events, content negotiation, HTML templates and the form layer.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod audit;
pub mod extract;
pub mod form;
pub mod middleware;
pub mod negotiate;
pub mod perm;
pub mod prelude;
pub mod template;

pub use app::{App, AppBuilderOpts, AppState};
pub use extract::{Auth, AuthCtx};

// vim: ts=4

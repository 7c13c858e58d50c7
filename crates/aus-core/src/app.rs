//! App state type

use std::sync::Arc;

use crate::template::TemplateEngine;
use aus_types::permission_adapter::PermissionAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header carrying the authenticated username, set by the fronting web server
pub const DEFAULT_AUTH_HEADER: &str = "remote-user";

pub struct AppState {
	pub opts: AppBuilderOpts,
	pub templates: TemplateEngine,

	pub permission_adapter: Arc<dyn PermissionAdapter>,
}

pub type App = Arc<AppState>;

#[derive(Debug)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	pub auth_header: Box<str>,
}

impl Default for AppBuilderOpts {
	fn default() -> Self {
		Self { listen: "127.0.0.1:8080".into(), auth_header: DEFAULT_AUTH_HEADER.into() }
	}
}

// vim: ts=4

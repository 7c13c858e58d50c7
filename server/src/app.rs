//! App builder - constructs and runs the admin console

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::prelude::*;
use crate::routes;
use aus_core::app::{AppBuilderOpts, AppState, VERSION};
use aus_core::template::TemplateEngine;
use aus_types::permission_adapter::PermissionAdapter;

pub struct AppBuilder {
	opts: AppBuilderOpts,
	permission_adapter: Option<Arc<dyn PermissionAdapter>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		// A subscriber may already be installed (several apps in one test binary)
		let _ = tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.try_init();
		AppBuilder { opts: AppBuilderOpts::default(), permission_adapter: None }
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}

	/// Request header carrying the authenticated username
	pub fn auth_header(&mut self, auth_header: impl AsRef<str>) -> &mut Self {
		self.opts.auth_header = auth_header.as_ref().to_ascii_lowercase().into();
		self
	}

	// Adapters
	pub fn permission_adapter(&mut self, permission_adapter: Arc<dyn PermissionAdapter>) -> &mut Self {
		self.permission_adapter = Some(permission_adapter);
		self
	}

	pub fn build(self) -> ClResult<App> {
		let Some(permission_adapter) = self.permission_adapter else {
			error!("FATAL: No permission adapter configured");
			return Err(Error::Internal("No permission adapter configured".to_string()));
		};

		let mut templates = TemplateEngine::new();
		aus_admin::register_templates(&mut templates)?;

		Ok(Arc::new(AppState { opts: self.opts, templates, permission_adapter }))
	}

	pub async fn run(self) -> ClResult<()> {
		info!("aus-admin V{}", VERSION);

		let app = self.build()?;
		let router = routes::init(app.clone());

		let listener = TcpListener::bind(&*app.opts.listen).await.inspect_err(|err| {
			error!("FATAL: Cannot listen on {}: {}", app.opts.listen, err);
		})?;
		info!("Listening on {}", app.opts.listen);
		info!("Principal header: {}", app.opts.auth_header);

		axum::serve(listener, router).await?;
		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

// vim: ts=4

//! HTML template rendering with Handlebars
//!
//! Feature crates register their templates at startup; views render them
//! by name. Registered templates are also usable as partials.

use axum::response::Html;
use handlebars::Handlebars;
use serde::Serialize;

use crate::prelude::*;

pub struct TemplateEngine {
	handlebars: Handlebars<'static>,
}

impl TemplateEngine {
	pub fn new() -> Self {
		let mut handlebars = Handlebars::new();

		// Enable strict mode to catch undefined variables
		handlebars.set_strict_mode(true);

		Self { handlebars }
	}

	pub fn register(&mut self, name: &str, source: &str) -> ClResult<()> {
		self.handlebars.register_template_string(name, source).map_err(|e| {
			Error::Internal(format!("Template {} failed to parse: {}", name, e))
		})
	}

	pub fn has_template(&self, name: &str) -> bool {
		self.handlebars.has_template(name)
	}

	pub fn render<T: Serialize>(&self, name: &str, data: &T) -> ClResult<Html<String>> {
		self.handlebars
			.render(name, data)
			.map(Html)
			.map_err(|e| Error::Internal(format!("Template {} failed to render: {}", name, e)))
	}
}

impl Default for TemplateEngine {
	fn default() -> Self {
		Self::new()
	}
}


// vim: ts=4

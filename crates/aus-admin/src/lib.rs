//! Admin console views: permission management, HTML pages and the forms
//! the console submits.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod forms;
pub mod pages;
pub mod permissions;

mod prelude;

use crate::prelude::*;
use aus_core::template::TemplateEngine;

const TEMPLATES: &[(&str, &str)] = &[
	("fragments/users", include_str!("../templates/fragments/users.html")),
	("fragments/permission_row", include_str!("../templates/fragments/permission_row.html")),
	("fragments/user_permissions", include_str!("../templates/fragments/user_permissions.html")),
	("permissions", include_str!("../templates/permissions.html")),
	("user_permissions", include_str!("../templates/user_permissions.html")),
];

/// Registers the HTML templates used by the views
pub fn register_templates(engine: &mut TemplateEngine) -> ClResult<()> {
	for (name, source) in TEMPLATES {
		engine.register(name, source)?;
	}
	debug!("Registered {} admin templates", TEMPLATES.len());
	Ok(())
}

// vim: ts=4

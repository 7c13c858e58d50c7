//! Login middleware

use axum::{
	extract::{Request, State},
	middleware::Next,
	response::Response,
};

use crate::extract::{Auth, AuthCtx};
use crate::prelude::*;

/// Requires an authenticated principal.
///
/// Authentication itself happens in front of the console: the fronting web
/// server puts the username into the configured header. Requests without
/// it are refused with 401.
pub async fn require_login(
	State(app): State<App>,
	mut req: Request,
	next: Next,
) -> ClResult<Response> {
	let username: Option<Box<str>> = req
		.headers()
		.get(&*app.opts.auth_header)
		.and_then(|h| h.to_str().ok())
		.map(str::trim)
		.filter(|u| !u.is_empty())
		.map(Box::from);

	let Some(username) = username else {
		warn!(path = %req.uri().path(), "Login required but no principal supplied");
		return Err(Error::Unauthorized("Authorization required".into()));
	};

	debug!(user = %username, "Authenticated request");
	req.extensions_mut().insert(Auth(AuthCtx { username }));

	Ok(next.run(req).await)
}

// vim: ts=4

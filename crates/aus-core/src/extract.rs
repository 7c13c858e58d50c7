//! Custom extractors for admin-console data

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::prelude::*;

/// Context of an authenticated user
#[derive(Clone, Debug)]
pub struct AuthCtx {
	pub username: Box<str>,
}

// Auth //
//******//
/// Principal inserted by the `require_login` middleware
#[derive(Debug, Clone)]
pub struct Auth(pub AuthCtx);

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(auth) = parts.extensions.get::<Auth>().cloned() {
			Ok(auth)
		} else {
			Err(Error::Unauthorized("Authorization required".into()))
		}
	}
}

// vim: ts=4

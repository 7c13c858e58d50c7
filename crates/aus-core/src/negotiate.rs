//! Response format negotiation
//!
//! Views answer with JSON or an HTML fragment. JSON is chosen by the
//! `format=json` query parameter or, for most views, by an `Accept` header
//! mentioning `application/json`.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::prelude::*;

#[derive(Clone, Debug, Default)]
pub struct ResponseFormat {
	/// Value of the `format` query parameter, `html` when absent
	pub format: Option<Box<str>>,
	pub accepts_json: bool,
}

impl ResponseFormat {
	pub fn format_is_json(&self) -> bool {
		self.format.as_deref() == Some("json")
	}

	/// Explicit `format=json` or an `Accept` header asking for JSON
	pub fn wants_json(&self) -> bool {
		self.format_is_json() || self.accepts_json
	}
}

impl<S> FromRequestParts<S> for ResponseFormat
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let format = parts
			.uri
			.query()
			.and_then(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).ok())
			.and_then(|pairs| pairs.into_iter().find(|(k, _)| k == "format").map(|(_, v)| v))
			.map(Box::from);
		let accepts_json = parts
			.headers
			.get(header::ACCEPT)
			.and_then(|h| h.to_str().ok())
			.is_some_and(|accept| accept.contains("application/json"));

		Ok(ResponseFormat { format, accepts_json })
	}
}


// vim: ts=4

//! Raw submitted form values

use std::collections::BTreeMap;

use axum::{
	body::Bytes,
	extract::{FromRequest, Request},
};

use crate::prelude::*;

/// Field name to every value submitted for it, in submission order
#[derive(Clone, Debug, Default)]
pub struct FormData {
	values: BTreeMap<String, Vec<String>>,
}

impl FormData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses an `application/x-www-form-urlencoded` body
	pub fn from_urlencoded(input: &[u8]) -> ClResult<Self> {
		let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(input)
			.map_err(|e| Error::ValidationError(format!("Malformed form data: {}", e)))?;
		Ok(pairs.into_iter().collect())
	}

	/// Parses a URL query string; no query means no values.
	pub fn from_query(query: Option<&str>) -> ClResult<Self> {
		query.map_or_else(|| Ok(Self::new()), |q| Self::from_urlencoded(q.as_bytes()))
	}

	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
		self.values.entry(key.into()).or_default().push(value.into());
		self
	}

	pub fn get(&self, key: &str) -> Option<&[String]> {
		self.values.get(key).map(Vec::as_slice)
	}

	/// First value submitted for `key`
	pub fn first(&self, key: &str) -> Option<&str> {
		self.values.get(key).and_then(|v| v.first()).map(String::as_str)
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}

impl FromIterator<(String, String)> for FormData {
	fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
		let mut data = FormData::new();
		for (key, value) in iter {
			data.insert(key, value);
		}
		data
	}
}

/// Extracts the request body as urlencoded form values
impl<S> FromRequest<S> for FormData
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let body = Bytes::from_request(req, state)
			.await
			.map_err(|e| Error::ValidationError(format!("Cannot read request body: {}", e)))?;
		FormData::from_urlencoded(&body)
	}
}


// vim: ts=4

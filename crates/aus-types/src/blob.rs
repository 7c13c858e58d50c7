//! Release blobs
//!
//! A release blob is the JSON document describing one release: its name,
//! the schema it follows and per-platform update data. The admin console
//! only needs to recognise the schema and reject structurally broken blobs
//! before they reach storage; the update-serving side owns the rest.

use serde_json::{Map, Value};

use crate::prelude::*;

pub const SUPPORTED_SCHEMA_VERSIONS: &[i64] = &[1, 2, 3, 4];

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseBlob {
	pub schema_version: i64,
	data: Map<String, Value>,
}

/// Parses `text` as a release blob, choosing the schema from its
/// `schema_version` key.
pub fn create_blob(text: &str) -> ClResult<ReleaseBlob> {
	let value: Value = serde_json::from_str(text)
		.map_err(|err| Error::ValidationError(format!("Invalid JSON: {}", err)))?;
	let Value::Object(data) = value else {
		return Err(Error::ValidationError("Release blob must be a JSON object".into()));
	};

	let schema_version = match data.get("schema_version") {
		Some(Value::Number(n)) => n.as_i64().ok_or_else(|| {
			Error::ValidationError(format!("Invalid schema_version: {}", n))
		})?,
		Some(other) => {
			return Err(Error::ValidationError(format!("Invalid schema_version: {}", other)));
		}
		None => return Err(Error::ValidationError("Release blob has no schema_version".into())),
	};
	if !SUPPORTED_SCHEMA_VERSIONS.contains(&schema_version) {
		return Err(Error::ValidationError(format!(
			"Unsupported schema_version: {}",
			schema_version
		)));
	}

	debug!(schema_version, "parsed release blob");
	Ok(ReleaseBlob { schema_version, data })
}

impl ReleaseBlob {
	pub fn name(&self) -> Option<&str> {
		self.data.get("name").and_then(Value::as_str)
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.data.get(key)
	}

	/// Structural checks for the blob's schema.
	pub fn is_valid(&self) -> ClResult<()> {
		match self.name() {
			Some(name) if !name.is_empty() => {}
			_ => return Err(Error::ValidationError("Release blob needs a non-empty name".into())),
		}
		if let Some(platforms) = self.data.get("platforms")
			&& !platforms.is_object()
		{
			return Err(Error::ValidationError("platforms must be a JSON object".into()));
		}
		if self.schema_version >= 2
			&& let Some(file_urls) = self.data.get("fileUrls")
			&& !file_urls.is_object()
		{
			return Err(Error::ValidationError("fileUrls must be a JSON object".into()));
		}
		Ok(())
	}

	pub fn to_value(&self) -> Value {
		Value::Object(self.data.clone())
	}
}

impl std::fmt::Display for ReleaseBlob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", Value::Object(self.data.clone()))
	}
}


// vim: ts=4

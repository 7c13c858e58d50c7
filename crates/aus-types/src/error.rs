//! Error type shared by every crate of the admin console

use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};

pub type ClResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	/// No principal, or the principal may not use the requested URL
	Unauthorized(String),
	/// Bad input: form coercion failures, unknown permissions or options
	ValidationError(String),
	/// The stored `data_version` differs from the one the client sent
	OutdatedData,
	DbError,
	Internal(String),

	// externals
	Io(std::io::Error),
	Json(serde_json::Error),
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::Unauthorized(msg) => write!(f, "unauthorized: {}", msg),
			Error::ValidationError(msg) => write!(f, "{}", msg),
			Error::OutdatedData => write!(f, "outdated data version"),
			Error::DbError => write!(f, "database error"),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
			Error::Json(err) => write!(f, "json error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Json(err)
	}
}

fn json_error(status: StatusCode, code: &str, message: &str) -> Response {
	let body = serde_json::json!({
		"error": {
			"code": code,
			"message": message,
		}
	});
	(status, Json(body)).into_response()
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		match self {
			// The admin UI shows these bodies verbatim
			Error::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
			Error::OutdatedData => (
				StatusCode::BAD_REQUEST,
				"Outdated data version: the record was changed since it was read",
			)
				.into_response(),
			Error::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
			Error::NotFound => json_error(StatusCode::NOT_FOUND, "E-CORE-NOTFOUND", "Not found"),
			Error::DbError => {
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "E-CORE-DBERR", "Database error")
			}
			Error::Internal(ref msg) => {
				tracing::error!("internal error: {}", msg);
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "E-CORE-INTERNAL", "Internal error")
			}
			Error::Io(ref err) => {
				tracing::error!("io error: {}", err);
				json_error(StatusCode::INTERNAL_SERVER_ERROR, "E-CORE-INTERNAL", "Internal error")
			}
			Error::Json(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
		}
	}
}

// vim: ts=4

//! CEF audit events
//!
//! Security-relevant events (denied access, rejected input) are emitted as
//! Common Event Format lines on the `cef` tracing target, so the log
//! pipeline can route them to the audit sink.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::extract::Auth;
use crate::prelude::*;

pub const CEF_WARN: u8 = 4;
pub const CEF_ALERT: u8 = 8;

const CEF_VENDOR: &str = "aus";
const CEF_PRODUCT: &str = "aus-admin";

/// Request details attached to every audit event
#[derive(Clone, Debug)]
pub struct AuditCtx {
	pub method: Box<str>,
	pub path: Box<str>,
	pub username: Option<Box<str>>,
}

impl<S> FromRequestParts<S> for AuditCtx
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		Ok(AuditCtx {
			method: parts.method.as_str().into(),
			path: parts.uri.path().into(),
			username: parts.extensions.get::<Auth>().map(|auth| auth.0.username.clone()),
		})
	}
}

fn escape_header(value: &str) -> String {
	value.replace('\\', "\\\\").replace('|', "\\|")
}

fn escape_extension(value: &str) -> String {
	value
		.replace('\\', "\\\\")
		.replace('=', "\\=")
		.replace('\r', "\\r")
		.replace('\n', "\\n")
}

impl AuditCtx {
	pub fn format_cef(&self, name: &str, severity: u8, msg: &str) -> String {
		let name = escape_header(name);
		let mut line = format!(
			"CEF:0|{}|{}|{}|{}|{}|{}|requestMethod={} request={}",
			CEF_VENDOR,
			CEF_PRODUCT,
			crate::app::VERSION,
			name,
			name,
			severity,
			escape_extension(&self.method),
			escape_extension(&self.path),
		);
		if let Some(username) = &self.username {
			line.push_str(" suser=");
			line.push_str(&escape_extension(username));
		}
		line.push_str(" msg=");
		line.push_str(&escape_extension(msg));
		line
	}

	pub fn cef_event(&self, name: &str, severity: u8, msg: &str) {
		let line = self.format_cef(name, severity, msg);
		if severity >= CEF_ALERT {
			error!(target: "cef", "{}", line);
		} else {
			warn!(target: "cef", "{}", line);
		}
	}
}


// vim: ts=4

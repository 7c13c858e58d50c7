//! Permission middleware and transaction handling

use std::{collections::HashMap, future::Future, pin::Pin};

use axum::{
	extract::{FromRequestParts, Path, Request, State},
	middleware::Next,
	response::Response,
};

use crate::audit::{AuditCtx, CEF_ALERT};
use crate::extract::{Auth, AuthCtx};
use crate::prelude::*;
use aus_types::permission_adapter::{PermissionTransaction, UrlOptions};

pub type PermissionCheckFuture = Pin<Box<dyn Future<Output = ClResult<Response>> + Send>>;

/// Middleware factory guarding a route with the `url` permission.
///
/// `options` names path parameters whose values are checked against the
/// permission's options (e.g. `product`). Must be layered inside
/// `require_login`, which supplies the principal.
pub fn require_permission(
	url: &'static str,
	options: &'static [&'static str],
) -> impl Fn(State<App>, Auth, AuditCtx, Request, Next) -> PermissionCheckFuture + Clone + Send + Sync + 'static
{
	move |State(app), Auth(auth), audit, req, next| {
		let fut: PermissionCheckFuture =
			Box::pin(check_url_permission(app, auth, audit, url, options, req, next));
		fut
	}
}

async fn check_url_permission(
	app: App,
	auth: AuthCtx,
	audit: AuditCtx,
	url: &'static str,
	options: &'static [&'static str],
	req: Request,
	next: Next,
) -> ClResult<Response> {
	let method = req.method().as_str().to_owned();

	let mut url_options = UrlOptions::new();
	let req = if options.is_empty() {
		req
	} else {
		let (mut parts, body) = req.into_parts();
		let Path(params) = Path::<HashMap<String, String>>::from_request_parts(&mut parts, &app)
			.await
			.map_err(|e| Error::Internal(format!("Cannot read path parameters: {}", e)))?;
		for opt in options {
			let value = params.get(*opt).ok_or_else(|| {
				Error::Internal(format!("Cannot check for required option {}", opt))
			})?;
			url_options.insert((*opt).into(), value.as_str().into());
		}
		Request::from_parts(parts, body)
	};

	if !app.permission_adapter.has_url_permission(&auth.username, url, &method, &url_options).await?
	{
		let msg = format!("{} is not allowed to access {} by {}", auth.username, url, method);
		audit.cef_event("Unauthorized access attempt", CEF_ALERT, &msg);
		return Err(Error::Unauthorized(msg));
	}

	Ok(next.run(req).await)
}

/// Commits `tx` when the handler succeeded, rolls it back otherwise.
pub async fn finish_transaction<T>(
	tx: Box<dyn PermissionTransaction>,
	res: ClResult<T>,
) -> ClResult<T> {
	match res {
		Ok(val) => {
			tx.commit().await?;
			Ok(val)
		}
		Err(err) => {
			debug!("Encountered error, rolling back: {}", err);
			if let Err(rb_err) = tx.rollback().await {
				warn!("Rollback failed: {}", rb_err);
			}
			Err(err)
		}
	}
}

// vim: ts=4

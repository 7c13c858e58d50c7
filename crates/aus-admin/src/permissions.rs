//! User permission views
//!
//! Reads answer with JSON or an HTML fragment. Mutations run behind the
//! login and permission gates, inside one store transaction per request.

use axum::{
	Json,
	extract::{Path, RawQuery, State},
	http::StatusCode,
	response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::forms::{ExistingPermissionForm, NewPermissionForm};
use crate::prelude::*;
use aus_core::Auth;
use aus_core::audit::{AuditCtx, CEF_WARN};
use aus_core::form::{Form, FormData};
use aus_core::negotiate::ResponseFormat;
use aus_core::perm::finish_transaction;
use aus_types::permission_adapter::{
	ADMIN_PERMISSION, PermissionTransaction, UserPermissions,
};

const MISSING_DATA_VERSION: &str = "Must provide the data version when updating an existing permission.";

/// Adds the leading `/` that URL permissions lose in the path.
pub fn normalize_permission(permission: &str) -> String {
	if permission == ADMIN_PERMISSION || permission.starts_with('/') {
		permission.to_owned()
	} else {
		format!("/{}", permission)
	}
}

/// Turns a permission into a token usable as a CSS selector and form prefix
pub fn permission_selector(permission: &str) -> String {
	permission.chars().filter(|c| *c != '/' && *c != ':').collect()
}

/// Response of a successful permission write
#[derive(Debug, Deserialize, Serialize)]
pub struct NewDataVersion {
	pub new_data_version: DataVersion,
}

/// One rendered permission of a user
#[derive(Debug, Serialize)]
pub(crate) struct PermissionRow<'a> {
	username: &'a str,
	permission: &'a str,
	selector: String,
	form: serde_json::Value,
}

pub(crate) fn permission_rows<'a>(username: &'a str, perms: &'a UserPermissions) -> Vec<PermissionRow<'a>> {
	perms
		.iter()
		.map(|(permission, data)| {
			let selector = permission_selector(permission);
			let form = ExistingPermissionForm::from_stored(
				&selector,
				permission,
				data.options.as_ref(),
				data.data_version,
			);
			PermissionRow { username, permission, selector, form: form.render() }
		})
		.collect()
}

/// Emits a "Bad input" audit event for rejected input.
fn audit_bad_input<T>(audit: &AuditCtx, res: ClResult<T>) -> ClResult<T> {
	if let Err(Error::ValidationError(msg)) = &res {
		audit.cef_event("Bad input", CEF_WARN, msg);
	}
	res
}

fn required_data_version(form: &ExistingPermissionForm) -> ClResult<DataVersion> {
	form.data_version
		.data
		.filter(|version| *version != 0)
		.ok_or_else(|| Error::ValidationError(MISSING_DATA_VERSION.into()))
}

async fn current_data_version(
	tx: &mut dyn PermissionTransaction,
	username: &str,
	permission: &str,
) -> ClResult<DataVersion> {
	tx.read_permission(username, permission)
		.await?
		.map(|perm| perm.data_version)
		.ok_or(Error::NotFound)
}

async fn ensure_held(tx: &mut dyn PermissionTransaction, username: &str, permission: &str) -> ClResult<()> {
	if tx.list_user_permissions(username).await?.contains_key(permission) {
		Ok(())
	} else {
		Err(Error::NotFound)
	}
}

// Reads //
//*******//
/// GET /api/users
pub async fn get_users(State(app): State<App>, fmt: ResponseFormat) -> ClResult<Response> {
	let users = app.permission_adapter.list_users().await?;
	debug!("Found users: {:?}", users.keys());

	if fmt.wants_json() {
		// Wrapped in an object instead of a bare list, see JSON hijacking
		Ok(Json(json!({ "users": users })).into_response())
	} else {
		let names = users.keys().collect::<Vec<_>>();
		Ok(app.templates.render("fragments/users", &json!({ "users": names }))?.into_response())
	}
}

/// GET /api/users/{username}/permissions
pub async fn get_user_permissions(
	State(app): State<App>,
	Path(username): Path<String>,
	fmt: ResponseFormat,
) -> ClResult<Response> {
	let perms = app.permission_adapter.list_user_permissions(&username).await?;

	if fmt.wants_json() {
		Ok(Json(perms).into_response())
	} else {
		let rows = permission_rows(&username, &perms);
		let ctx = json!({ "username": username, "permissions": rows });
		Ok(app.templates.render("fragments/user_permissions", &ctx)?.into_response())
	}
}

/// GET /api/users/{username}/permissions/{*permission}
pub async fn get_permission(
	State(app): State<App>,
	Path((username, permission)): Path<(String, String)>,
	fmt: ResponseFormat,
) -> ClResult<Response> {
	let permission = normalize_permission(&permission);
	let perms = app.permission_adapter.list_user_permissions(&username).await?;
	let Some(perm) = perms.get(permission.as_str()) else {
		return Err(Error::NotFound);
	};

	// Only the explicit format parameter selects JSON here
	if fmt.format_is_json() {
		Ok(Json(perm).into_response())
	} else {
		let selector = permission_selector(&permission);
		let form = ExistingPermissionForm::from_stored(
			&selector,
			&permission,
			perm.options.as_ref(),
			perm.data_version,
		);
		let row = PermissionRow { username: &username, permission: &permission, selector, form: form.render() };
		Ok(app.templates.render("fragments/permission_row", &row)?.into_response())
	}
}

// Writes //
//********//
/// PUT /api/users/{username}/permissions/{*permission}
///
/// Updates a permission the user holds (the data version is then required)
/// or grants it.
pub async fn put_permission(
	State(app): State<App>,
	Auth(auth): Auth,
	audit: AuditCtx,
	Path((username, permission)): Path<(String, String)>,
	data: FormData,
) -> ClResult<(StatusCode, Json<NewDataVersion>)> {
	let permission = normalize_permission(&permission);
	let mut tx = app.permission_adapter.begin().await?;
	let res = put_permission_tx(&mut *tx, &auth.username, &username, &permission, &data).await;
	audit_bad_input(&audit, finish_transaction(tx, res).await)
}

async fn put_permission_tx(
	tx: &mut dyn PermissionTransaction,
	changed_by: &str,
	username: &str,
	permission: &str,
	data: &FormData,
) -> ClResult<(StatusCode, Json<NewDataVersion>)> {
	if tx.list_user_permissions(username).await?.contains_key(permission) {
		let form = ExistingPermissionForm::from_data(data);
		form.ensure_processed()?;
		let data_version = required_data_version(&form)?;
		tx.update_permission(changed_by, username, permission, data_version, form.options.data.as_ref())
			.await?;
		let new_data_version = current_data_version(tx, username, permission).await?;
		info!(user = %username, permission = %permission, by = %changed_by, "Permission updated");
		Ok((StatusCode::OK, Json(NewDataVersion { new_data_version })))
	} else {
		let form = NewPermissionForm::from_data(data);
		form.ensure_processed()?;
		tx.grant_permission(changed_by, username, permission, form.options.data.as_ref()).await?;
		info!(user = %username, permission = %permission, by = %changed_by, "Permission granted");
		Ok((StatusCode::CREATED, Json(NewDataVersion { new_data_version: 1 })))
	}
}

/// POST /api/users/{username}/permissions/{*permission}
pub async fn post_permission(
	State(app): State<App>,
	Auth(auth): Auth,
	audit: AuditCtx,
	Path((username, permission)): Path<(String, String)>,
	data: FormData,
) -> ClResult<Json<NewDataVersion>> {
	let permission = normalize_permission(&permission);
	let mut tx = app.permission_adapter.begin().await?;
	let res = post_permission_tx(&mut *tx, &auth.username, &username, &permission, &data).await;
	audit_bad_input(&audit, finish_transaction(tx, res).await)
}

async fn post_permission_tx(
	tx: &mut dyn PermissionTransaction,
	changed_by: &str,
	username: &str,
	permission: &str,
	data: &FormData,
) -> ClResult<Json<NewDataVersion>> {
	ensure_held(tx, username, permission).await?;

	let form = ExistingPermissionForm::from_data(data);
	form.ensure_processed()?;
	let data_version = required_data_version(&form)?;
	tx.update_permission(changed_by, username, permission, data_version, form.options.data.as_ref())
		.await?;
	let new_data_version = current_data_version(tx, username, permission).await?;
	info!(user = %username, permission = %permission, by = %changed_by, "Permission updated");
	Ok(Json(NewDataVersion { new_data_version }))
}

/// DELETE /api/users/{username}/permissions/{*permission}
///
/// A DELETE carries no body, so the data version comes from the query string.
pub async fn delete_permission(
	State(app): State<App>,
	Auth(auth): Auth,
	audit: AuditCtx,
	Path((username, permission)): Path<(String, String)>,
	RawQuery(query): RawQuery,
) -> ClResult<StatusCode> {
	let permission = normalize_permission(&permission);
	let data = FormData::from_query(query.as_deref())?;
	let mut tx = app.permission_adapter.begin().await?;
	let res = delete_permission_tx(&mut *tx, &auth.username, &username, &permission, &data).await;
	audit_bad_input(&audit, finish_transaction(tx, res).await)
}

async fn delete_permission_tx(
	tx: &mut dyn PermissionTransaction,
	changed_by: &str,
	username: &str,
	permission: &str,
	data: &FormData,
) -> ClResult<StatusCode> {
	ensure_held(tx, username, permission).await?;

	let form = ExistingPermissionForm::from_data(data);
	form.ensure_processed()?;
	let data_version = required_data_version(&form)?;
	tx.revoke_permission(changed_by, username, permission, data_version).await?;
	info!(user = %username, permission = %permission, by = %changed_by, "Permission revoked");
	Ok(StatusCode::OK)
}


// vim: ts=4

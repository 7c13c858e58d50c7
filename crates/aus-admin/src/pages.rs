//! Full HTML pages of the permission console

use axum::{
	extract::{Query, State},
	response::Html,
};
use serde::Deserialize;
use serde_json::json;

use crate::forms::NewPermissionForm;
use crate::permissions::permission_rows;
use crate::prelude::*;
use aus_core::form::Form;

/// GET /permissions.html
pub async fn permissions_page(State(app): State<App>) -> ClResult<Html<String>> {
	let users = app.permission_adapter.list_users().await?;
	let names = users.keys().collect::<Vec<_>>();
	app.templates.render("permissions", &json!({ "users": names }))
}

#[derive(Debug, Deserialize)]
pub struct UserPermissionsQuery {
	username: Option<String>,
}

/// GET /user_permissions.html?username=
pub async fn user_permissions_page(
	State(app): State<App>,
	Query(query): Query<UserPermissionsQuery>,
) -> ClResult<Html<String>> {
	let Some(username) = query.username.filter(|u| !u.is_empty()) else {
		return Err(Error::NotFound);
	};
	let perms = app.permission_adapter.list_user_permissions(&username).await?;
	let rows = permission_rows(&username, &perms);

	app.templates.render(
		"user_permissions",
		&json!({
			"username": username,
			"permissions": rows,
			"new_permission": NewPermissionForm::new().render(),
		}),
	)
}


// vim: ts=4

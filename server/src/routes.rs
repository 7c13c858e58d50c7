use axum::{
	Router, middleware,
	routing::{get, put},
};
use tower_http::trace::TraceLayer;

use crate::prelude::*;
use aus_admin::{pages, permissions};
use aus_core::middleware::require_login;
use aus_core::perm::require_permission;

pub fn init(app: App) -> Router {
	// Layers wrap outwards: the login gate runs before the permission gate
	let specific_permission_writes = put(permissions::put_permission)
		.post(permissions::post_permission)
		.delete(permissions::delete_permission)
		.route_layer(middleware::from_fn_with_state(
			app.clone(),
			require_permission("/users/:id/permissions/:permission", &[]),
		))
		.route_layer(middleware::from_fn_with_state(app.clone(), require_login));

	Router::new()
		.route("/api/users", get(permissions::get_users))
		.route("/api/users/{username}/permissions", get(permissions::get_user_permissions))
		.route(
			"/api/users/{username}/permissions/{*permission}",
			get(permissions::get_permission).merge(specific_permission_writes),
		)
		.route("/permissions.html", get(pages::permissions_page))
		.route("/user_permissions.html", get(pages::user_permissions_page))
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4

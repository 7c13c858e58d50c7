//! HTTP tests of the user permission views

mod common;

use axum::http::{Method, StatusCode, header};
use serde_json::json;

use aus_types::permission_adapter::PermissionAdapter;
use common::adapters::{create_failing_test_app, create_test_app, seed_permission};
use common::fixtures::{ADMIN, get, request, send};
use common::logging::CefCapture;

const BOB_RULES: &str = "/api/users/bob/permissions/rules";

// Reads //
//*******//
#[tokio::test]
async fn test_get_users_json_and_html() {
	let (app, router, _temp) = create_test_app().await;
	seed_permission(&app, ADMIN, "admin", None).await;
	seed_permission(&app, "bob", "/rules", None).await;

	let res = get(&router, "/api/users?format=json").await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.json(), json!({"users": {"bob": {}, "root": {}}}));

	let mut req = request(Method::GET, "/api/users", None, None);
	req.headers_mut().insert(header::ACCEPT, "application/json".parse().unwrap());
	let res = send(&router, req).await;
	assert_eq!(res.json()["users"]["bob"], json!({}));

	let res = get(&router, "/api/users").await;
	assert_eq!(res.status, StatusCode::OK);
	assert!(res.body.contains(r#"<ul id="users">"#));
	assert!(res.body.contains(">bob</a>"));
}

#[tokio::test]
async fn test_get_user_permissions() {
	let (app, router, _temp) = create_test_app().await;
	seed_permission(&app, "bob", "/rules", Some(json!({"product": ["Firefox"]}))).await;
	seed_permission(&app, "bob", "/releases/:name", None).await;

	let res = get(&router, "/api/users/bob/permissions?format=json").await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(
		res.json(),
		json!({
			"/rules": {"options": {"product": ["Firefox"]}, "data_version": 1},
			"/releases/:name": {"options": null, "data_version": 1},
		})
	);

	let res = get(&router, "/api/users/bob/permissions").await;
	assert_eq!(res.status, StatusCode::OK);
	assert!(res.body.contains(r#"id="permission_rules""#));
	assert!(res.body.contains(r#"id="releasesname-permission""#));
	assert!(res.body.contains(r#"disabled="disabled""#));

	let res = get(&router, "/api/users/nobody/permissions?format=json").await;
	assert_eq!(res.json(), json!({}));
}

#[tokio::test]
async fn test_get_specific_permission() {
	let (app, router, _temp) = create_test_app().await;
	seed_permission(&app, "bob", "/rules/:id", Some(json!({"method": "POST"}))).await;

	let res = get(&router, "/api/users/bob/permissions/rules/:id?format=json").await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.json(), json!({"options": {"method": "POST"}, "data_version": 1}));

	let res = get(&router, "/api/users/bob/permissions/rules/:id").await;
	assert_eq!(res.status, StatusCode::OK);
	assert!(res.body.contains(r#"<tr id="permission_rulesid""#));
	assert!(res.body.contains(r#"id="rulesid-data_version""#));

	let res = get(&router, "/api/users/bob/permissions/admin?format=json").await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);
}

// Gates //
//*******//
#[tokio::test]
async fn test_writes_require_login() {
	let (_app, router, _temp) = create_test_app().await;

	let res = send(&router, request(Method::PUT, BOB_RULES, None, Some(&[]))).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_writes_require_permission() {
	let (app, router, _temp) = create_test_app().await;
	seed_permission(&app, "bob", "/rules", None).await;

	let res = send(&router, request(Method::PUT, BOB_RULES, Some("eve"), Some(&[]))).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);
	assert_eq!(res.body, "eve is not allowed to access /users/:id/permissions/:permission by PUT");

	let res = get(&router, "/api/users/bob/permissions?format=json").await;
	assert_eq!(res.json()["/rules"]["data_version"], 1);
}

#[tokio::test]
async fn test_denied_write_emits_alert_event() {
	let (_app, router, _temp) = create_test_app().await;
	let (cef, _guard) = CefCapture::install();

	let res = send(&router, request(Method::PUT, BOB_RULES, Some("eve"), Some(&[]))).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);

	let events = cef.events();
	assert_eq!(events.len(), 1, "{:?}", events);
	assert!(events[0].contains("|Unauthorized access attempt|Unauthorized access attempt|8|"));
	assert!(events[0].contains("requestMethod=PUT request=/api/users/bob/permissions/rules"));
	assert!(events[0].contains("suser=eve"));
	assert!(events[0].contains("msg=eve is not allowed to access /users/:id/permissions/:permission by PUT"));
}

#[tokio::test]
async fn test_method_restricted_permission() {
	let (app, router, _temp) = create_test_app().await;
	seed_permission(&app, "carol", "/users/:id/permissions/:permission", Some(json!({"method": "PUT"})))
		.await;

	let res = send(&router, request(Method::PUT, BOB_RULES, Some("carol"), Some(&[]))).await;
	assert_eq!(res.status, StatusCode::CREATED);

	let uri = format!("{}?data_version=1", BOB_RULES);
	let res = send(&router, request(Method::DELETE, &uri, Some("carol"), None)).await;
	assert_eq!(res.status, StatusCode::UNAUTHORIZED);
	assert_eq!(res.body, "carol is not allowed to access /users/:id/permissions/:permission by DELETE");
}

// Writes //
//********//
#[tokio::test]
async fn test_put_grants_then_updates() {
	let (app, router, _temp) = create_test_app().await;
	seed_permission(&app, ADMIN, "admin", None).await;

	let form = [("options", r#"{"product": ["Firefox"]}"#)];
	let res = send(&router, request(Method::PUT, BOB_RULES, Some(ADMIN), Some(&form))).await;
	assert_eq!(res.status, StatusCode::CREATED);
	assert_eq!(res.json(), json!({"new_data_version": 1}));

	// Updating an existing permission needs the data version
	let res = send(&router, request(Method::PUT, BOB_RULES, Some(ADMIN), Some(&form))).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body, "Must provide the data version when updating an existing permission.");

	let form = [("options", r#"{"product": ["Fennec"]}"#), ("data_version", "1")];
	let res = send(&router, request(Method::PUT, BOB_RULES, Some(ADMIN), Some(&form))).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.json(), json!({"new_data_version": 2}));

	let res = get(&router, "/api/users/bob/permissions/rules?format=json").await;
	assert_eq!(res.json(), json!({"options": {"product": ["Fennec"]}, "data_version": 2}));
}

#[tokio::test]
async fn test_put_admin_permission_keeps_name() {
	let (app, router, _temp) = create_test_app().await;
	seed_permission(&app, ADMIN, "admin", None).await;

	let res =
		send(&router, request(Method::PUT, "/api/users/bob/permissions/admin", Some(ADMIN), Some(&[]))).await;
	assert_eq!(res.status, StatusCode::CREATED);

	let res = get(&router, "/api/users/bob/permissions?format=json").await;
	assert_eq!(res.json(), json!({"admin": {"options": null, "data_version": 1}}));
}

#[tokio::test]
async fn test_put_rejects_bad_input() {
	let (app, router, _temp) = create_test_app().await;
	seed_permission(&app, ADMIN, "admin", None).await;

	let res = send(&router, request(Method::PUT, BOB_RULES, Some(ADMIN), Some(&[("options", "{broken")]))).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert!(res.body.starts_with("options: "), "{}", res.body);

	let form = [("options", r#"{"color": "blue"}"#)];
	let res = send(&router, request(Method::PUT, BOB_RULES, Some(ADMIN), Some(&form))).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	let res = send(
		&router,
		request(Method::PUT, "/api/users/bob/permissions/nonexistent", Some(ADMIN), Some(&[])),
	)
	.await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	let res = get(&router, "/api/users/bob/permissions?format=json").await;
	assert_eq!(res.json(), json!({}));
}

#[tokio::test]
async fn test_put_blank_data_version_grants() {
	let (app, router, _temp) = create_test_app().await;
	seed_permission(&app, ADMIN, "admin", None).await;

	let form = [("options", ""), ("data_version", "")];
	let res = send(&router, request(Method::PUT, BOB_RULES, Some(ADMIN), Some(&form))).await;
	assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
	assert_eq!(res.json(), json!({"new_data_version": 1}));

	// On an existing permission a blank version counts as missing
	let res = send(&router, request(Method::PUT, BOB_RULES, Some(ADMIN), Some(&form))).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);
	assert_eq!(res.body, "Must provide the data version when updating an existing permission.");
}

#[tokio::test]
async fn test_bad_input_emits_warn_event() {
	let (app, router, _temp) = create_test_app().await;
	seed_permission(&app, ADMIN, "admin", None).await;
	let (cef, _guard) = CefCapture::install();

	let form = [("options", r#"{"color": "blue"}"#)];
	let res = send(&router, request(Method::PUT, BOB_RULES, Some(ADMIN), Some(&form))).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	let events = cef.events();
	assert_eq!(events.len(), 1, "{:?}", events);
	assert!(events[0].contains("|Bad input|Bad input|4|"));
	assert!(events[0].contains("suser=root"));
	assert!(events[0].contains(r#"msg=Unknown option "color" for permission "/rules""#));

	// Accepted writes are not audited
	let res = send(&router, request(Method::PUT, BOB_RULES, Some(ADMIN), Some(&[]))).await;
	assert_eq!(res.status, StatusCode::CREATED);
	assert_eq!(cef.events().len(), 1);
}

#[tokio::test]
async fn test_failure_after_write_rolls_back() {
	let (app, router, store, _temp) = create_failing_test_app().await;
	seed_permission(&app, ADMIN, "admin", None).await;
	seed_permission(&app, "bob", "/rules", None).await;

	// The update succeeds, reading the new data version afterwards fails
	let form = [("options", r#"{"product": ["Firefox"]}"#), ("data_version", "1")];
	let res = send(&router, request(Method::POST, BOB_RULES, Some(ADMIN), Some(&form))).await;
	assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
	let res = send(&router, request(Method::PUT, BOB_RULES, Some(ADMIN), Some(&form))).await;
	assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);

	let perm = store.read_permission("bob", "/rules").await.unwrap().unwrap();
	assert_eq!(perm.data_version, 1);
	assert_eq!(perm.options, None);
	let history = store.read_history("bob", "/rules").await.unwrap();
	assert_eq!(history.len(), 1);
	assert_eq!(&*history[0].changed_by, "seed");
}

#[tokio::test]
async fn test_post_updates_existing_only() {
	let (app, router, _temp) = create_test_app().await;
	seed_permission(&app, ADMIN, "admin", None).await;

	let form = [("options", "{}"), ("data_version", "1")];
	let res = send(&router, request(Method::POST, BOB_RULES, Some(ADMIN), Some(&form))).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);

	seed_permission(&app, "bob", "/rules", None).await;
	let form = [("options", r#"{"product": ["Firefox"]}"#), ("data_version", "1")];
	let res = send(&router, request(Method::POST, BOB_RULES, Some(ADMIN), Some(&form))).await;
	assert_eq!(res.status, StatusCode::OK);
	assert_eq!(res.json(), json!({"new_data_version": 2}));

	// Stale data version
	let res = send(&router, request(Method::POST, BOB_RULES, Some(ADMIN), Some(&form))).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	let res = get(&router, "/api/users/bob/permissions/rules?format=json").await;
	assert_eq!(res.json()["data_version"], 2);
}

#[tokio::test]
async fn test_delete_reads_data_version_from_query() {
	let (app, router, _temp) = create_test_app().await;
	seed_permission(&app, ADMIN, "admin", None).await;
	seed_permission(&app, "bob", "/rules", None).await;

	let res = send(&router, request(Method::DELETE, BOB_RULES, Some(ADMIN), None)).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	let uri = format!("{}?data_version=2", BOB_RULES);
	let res = send(&router, request(Method::DELETE, &uri, Some(ADMIN), None)).await;
	assert_eq!(res.status, StatusCode::BAD_REQUEST);

	let uri = format!("{}?data_version=1", BOB_RULES);
	let res = send(&router, request(Method::DELETE, &uri, Some(ADMIN), None)).await;
	assert_eq!(res.status, StatusCode::OK);

	let res = send(&router, request(Method::DELETE, &uri, Some(ADMIN), None)).await;
	assert_eq!(res.status, StatusCode::NOT_FOUND);

	let res = get(&router, "/api/users?format=json").await;
	assert_eq!(res.json(), json!({"users": {"root": {}}}));
}

// vim: ts=4

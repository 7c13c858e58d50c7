//! Request builders and response readers

use axum::{
	Router,
	body::{Body, to_bytes},
	http::{Method, Request, StatusCode, header},
};
use tower::ServiceExt;

pub const ADMIN: &str = "root";

pub struct TestResponse {
	pub status: StatusCode,
	pub body: String,
}

impl TestResponse {
	pub fn json(&self) -> serde_json::Value {
		serde_json::from_str(&self.body).expect("Response is not JSON")
	}
}

/// Builds a request, optionally authenticated as `user` and with a form body
pub fn request(method: Method, uri: &str, user: Option<&str>, form: Option<&[(&str, &str)]>) -> Request<Body> {
	let mut builder = Request::builder().method(method).uri(uri);
	if let Some(user) = user {
		builder = builder.header("Remote-User", user);
	}
	let body = match form {
		Some(form) => {
			builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
			Body::from(serde_urlencoded::to_string(form).expect("Failed to encode form"))
		}
		None => Body::empty(),
	};
	builder.body(body).expect("Failed to build request")
}

pub async fn send(router: &Router, req: Request<Body>) -> TestResponse {
	let res = router.clone().oneshot(req).await.expect("Request failed");
	let status = res.status();
	let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("Failed to read body");
	TestResponse { status, body: String::from_utf8_lossy(&bytes).into_owned() }
}

pub async fn get(router: &Router, uri: &str) -> TestResponse {
	send(router, request(Method::GET, uri, None, None)).await
}

// vim: ts=4

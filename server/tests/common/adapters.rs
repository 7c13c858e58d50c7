//! Test app builders
//!
//! Every test gets its own app around a permission store in a temporary
//! directory. The TempDir is returned alongside so the store lives as long
//! as the test.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;

use aus_admin_server::{App, AppBuilder, routes};
use aus_permission_adapter_sqlite::PermissionAdapterSqlite;
use aus_types::permission_adapter::{
	Permission, PermissionAdapter, PermissionTransaction, UserInfo, UserPermissions,
};
use aus_types::prelude::*;

fn build_app(adapter: Arc<dyn PermissionAdapter>) -> (App, Router) {
	let mut builder = AppBuilder::new();
	builder.permission_adapter(adapter);
	let app = builder.build().expect("Failed to build app");
	let router = routes::init(app.clone());
	(app, router)
}

async fn create_sqlite_adapter(temp_dir: &TempDir) -> Arc<PermissionAdapterSqlite> {
	Arc::new(PermissionAdapterSqlite::new(temp_dir.path()).await.expect("Failed to create adapter"))
}

pub async fn create_test_app() -> (App, Router, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = create_sqlite_adapter(&temp_dir).await;
	let (app, router) = build_app(adapter);
	(app, router, temp_dir)
}

/// App whose store transactions fail on the first read after a write.
///
/// The SQLite store is returned as well to inspect what was committed.
pub async fn create_failing_test_app() -> (App, Router, Arc<PermissionAdapterSqlite>, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let sqlite = create_sqlite_adapter(&temp_dir).await;
	let (app, router) = build_app(Arc::new(FailAfterWriteAdapter { inner: sqlite.clone() }));
	(app, router, sqlite, temp_dir)
}

/// Grants directly through the store, bypassing the views
pub async fn seed_permission(app: &App, username: &str, permission: &str, options: Option<Value>) {
	let mut tx = app.permission_adapter.begin().await.expect("Failed to begin");
	tx.grant_permission("seed", username, permission, options.as_ref())
		.await
		.expect("Failed to seed permission");
	tx.commit().await.expect("Failed to commit");
}

// Failing store //
//***************//
#[derive(Debug)]
struct FailAfterWriteAdapter {
	inner: Arc<PermissionAdapterSqlite>,
}

#[async_trait]
impl PermissionAdapter for FailAfterWriteAdapter {
	async fn begin(&self) -> ClResult<Box<dyn PermissionTransaction>> {
		Ok(Box::new(FailAfterWriteTx { inner: self.inner.begin().await?, wrote: false }))
	}

	async fn list_users(&self) -> ClResult<BTreeMap<Box<str>, UserInfo>> {
		self.inner.list_users().await
	}

	async fn list_user_permissions(&self, username: &str) -> ClResult<UserPermissions> {
		self.inner.list_user_permissions(username).await
	}

	async fn read_permission(&self, username: &str, permission: &str) -> ClResult<Option<Permission>> {
		self.inner.read_permission(username, permission).await
	}
}

struct FailAfterWriteTx {
	inner: Box<dyn PermissionTransaction>,
	wrote: bool,
}

impl FailAfterWriteTx {
	fn check_read(&self) -> ClResult<()> {
		if self.wrote { Err(Error::DbError) } else { Ok(()) }
	}
}

#[async_trait]
impl PermissionTransaction for FailAfterWriteTx {
	async fn list_user_permissions(&mut self, username: &str) -> ClResult<UserPermissions> {
		self.check_read()?;
		self.inner.list_user_permissions(username).await
	}

	async fn read_permission(&mut self, username: &str, permission: &str) -> ClResult<Option<Permission>> {
		self.check_read()?;
		self.inner.read_permission(username, permission).await
	}

	async fn grant_permission(
		&mut self,
		changed_by: &str,
		username: &str,
		permission: &str,
		options: Option<&Value>,
	) -> ClResult<()> {
		self.inner.grant_permission(changed_by, username, permission, options).await?;
		self.wrote = true;
		Ok(())
	}

	async fn update_permission(
		&mut self,
		changed_by: &str,
		username: &str,
		permission: &str,
		old_data_version: DataVersion,
		options: Option<&Value>,
	) -> ClResult<()> {
		self.inner.update_permission(changed_by, username, permission, old_data_version, options).await?;
		self.wrote = true;
		Ok(())
	}

	async fn revoke_permission(
		&mut self,
		changed_by: &str,
		username: &str,
		permission: &str,
		old_data_version: DataVersion,
	) -> ClResult<()> {
		self.inner.revoke_permission(changed_by, username, permission, old_data_version).await?;
		self.wrote = true;
		Ok(())
	}

	async fn commit(self: Box<Self>) -> ClResult<()> {
		self.inner.commit().await
	}

	async fn rollback(self: Box<Self>) -> ClResult<()> {
		self.inner.rollback().await
	}
}

// vim: ts=4

//! SQLite implementation of the admin console's permission store.
//!
//! Permissions live in `permissions.db` inside the configured directory.
//! Every change is also appended to `permissions_history`.

#![forbid(unsafe_code)]

use std::{collections::BTreeMap, path::Path};

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{
	Sqlite, Transaction,
	sqlite::{self, SqlitePool},
};

use aus_types::permission_adapter::{
	Permission, PermissionAdapter, PermissionTransaction, UserInfo, UserPermissions,
};
use aus_types::prelude::*;

mod permission;
mod schema;
mod utils;

pub use permission::PermissionChange;

use crate::schema::init_db;
use crate::utils::inspect;

#[derive(Debug)]
pub struct PermissionAdapterSqlite {
	db: SqlitePool,
}

impl PermissionAdapterSqlite {
	/// Opens (creating when missing) the permission database in `dir`.
	pub async fn new(dir: impl AsRef<Path>) -> ClResult<Self> {
		tokio::fs::create_dir_all(dir.as_ref()).await?;

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(dir.as_ref().join("permissions.db"))
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(inspect)
			.or(Err(Error::DbError))?;

		init_db(&db).await.inspect_err(inspect).or(Err(Error::DbError))?;

		info!("Permission database opened in {}", dir.as_ref().display());
		Ok(Self { db })
	}

	async fn acquire(&self) -> ClResult<sqlx::pool::PoolConnection<Sqlite>> {
		self.db.acquire().await.inspect_err(inspect).or(Err(Error::DbError))
	}

	/// Recorded changes of one permission, oldest first
	pub async fn read_history(&self, username: &str, permission: &str) -> ClResult<Vec<PermissionChange>> {
		let mut conn = self.acquire().await?;
		permission::read_history(&mut conn, username, permission).await
	}
}

#[async_trait]
impl PermissionAdapter for PermissionAdapterSqlite {
	async fn begin(&self) -> ClResult<Box<dyn PermissionTransaction>> {
		// Takes the write lock up front: a deferred transaction that reads
		// first fails with SQLITE_BUSY when another writer got there before
		let tx = self.db.begin_with("BEGIN IMMEDIATE").await.inspect_err(inspect).or(Err(Error::DbError))?;
		Ok(Box::new(PermissionTxSqlite { tx }))
	}

	async fn list_users(&self) -> ClResult<BTreeMap<Box<str>, UserInfo>> {
		let mut conn = self.acquire().await?;
		permission::list_users(&mut conn).await
	}

	async fn list_user_permissions(&self, username: &str) -> ClResult<UserPermissions> {
		let mut conn = self.acquire().await?;
		permission::list_user_permissions(&mut conn, username).await
	}

	async fn read_permission(&self, username: &str, permission: &str) -> ClResult<Option<Permission>> {
		let mut conn = self.acquire().await?;
		permission::read(&mut conn, username, permission).await
	}
}

// Transaction //
//*************//
/// Open SQLite transaction. Dropping it without commit rolls back.
pub struct PermissionTxSqlite {
	tx: Transaction<'static, Sqlite>,
}

#[async_trait]
impl PermissionTransaction for PermissionTxSqlite {
	async fn list_user_permissions(&mut self, username: &str) -> ClResult<UserPermissions> {
		permission::list_user_permissions(&mut self.tx, username).await
	}

	async fn read_permission(&mut self, username: &str, permission: &str) -> ClResult<Option<Permission>> {
		permission::read(&mut self.tx, username, permission).await
	}

	async fn grant_permission(
		&mut self,
		changed_by: &str,
		username: &str,
		permission: &str,
		options: Option<&Value>,
	) -> ClResult<()> {
		permission::grant(&mut self.tx, changed_by, username, permission, options).await
	}

	async fn update_permission(
		&mut self,
		changed_by: &str,
		username: &str,
		permission: &str,
		old_data_version: DataVersion,
		options: Option<&Value>,
	) -> ClResult<()> {
		permission::update(&mut self.tx, changed_by, username, permission, old_data_version, options)
			.await
	}

	async fn revoke_permission(
		&mut self,
		changed_by: &str,
		username: &str,
		permission: &str,
		old_data_version: DataVersion,
	) -> ClResult<()> {
		permission::revoke(&mut self.tx, changed_by, username, permission, old_data_version).await
	}

	async fn commit(self: Box<Self>) -> ClResult<()> {
		self.tx.commit().await.inspect_err(inspect).or(Err(Error::DbError))
	}

	async fn rollback(self: Box<Self>) -> ClResult<()> {
		self.tx.rollback().await.inspect_err(inspect).or(Err(Error::DbError))
	}
}

// vim: ts=4

//! Permission queries
//!
//! Every function works on a plain connection so the same code serves pool
//! reads and transactional writes.

use std::collections::BTreeMap;

use serde_json::Value;
use sqlx::{Row, SqliteConnection, sqlite::SqliteRow};

use crate::utils::{collect_res, inspect, map_res, parse_options};
use aus_types::permission_adapter::{
	Permission, PermissionData, UserInfo, UserPermissions, check_options,
};
use aus_types::prelude::*;

/// One recorded change of a permission
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionChange {
	pub change_id: i64,
	pub changed_by: Box<str>,
	pub timestamp: Timestamp,
	pub options: Option<Value>,
	/// `None` when the change revoked the permission
	pub data_version: Option<DataVersion>,
}

fn options_text(permission: &str, options: Option<&Value>) -> ClResult<Option<String>> {
	Ok(check_options(permission, options)?.map(|opts| Value::Object(opts).to_string()))
}

fn parse_permission(row: &SqliteRow) -> Result<Permission, sqlx::Error> {
	Ok(Permission {
		username: row.try_get::<String, _>("username")?.into(),
		permission: row.try_get::<String, _>("permission")?.into(),
		options: parse_options(row.try_get("options")?)?,
		data_version: row.try_get("data_version")?,
	})
}

async fn record_change(
	conn: &mut SqliteConnection,
	changed_by: &str,
	username: &str,
	permission: &str,
) -> ClResult<()> {
	sqlx::query(
		"INSERT INTO permissions_history (changed_by, timestamp, permission, username, options, data_version)
		SELECT ?1, ?2, permission, username, options, data_version FROM permissions
		WHERE username = ?3 AND permission = ?4",
	)
	.bind(changed_by)
	.bind(Timestamp::now().0)
	.bind(username)
	.bind(permission)
	.execute(&mut *conn)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;
	Ok(())
}

async fn record_revoke(
	conn: &mut SqliteConnection,
	changed_by: &str,
	username: &str,
	permission: &str,
) -> ClResult<()> {
	sqlx::query(
		"INSERT INTO permissions_history (changed_by, timestamp, permission, username, options, data_version)
		VALUES (?1, ?2, ?3, ?4, NULL, NULL)",
	)
	.bind(changed_by)
	.bind(Timestamp::now().0)
	.bind(permission)
	.bind(username)
	.execute(&mut *conn)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;
	Ok(())
}

/// Tells a stale `old_data_version` apart from a missing row.
async fn missed_write_error(conn: &mut SqliteConnection, username: &str, permission: &str) -> Error {
	match read(conn, username, permission).await {
		Ok(Some(_)) => Error::OutdatedData,
		Ok(None) => Error::NotFound,
		Err(err) => err,
	}
}

// Reads //
//*******//
pub(crate) async fn list_users(conn: &mut SqliteConnection) -> ClResult<BTreeMap<Box<str>, UserInfo>> {
	let rows = sqlx::query("SELECT DISTINCT username FROM permissions ORDER BY username")
		.fetch_all(&mut *conn)
		.await;
	let users = collect_res(rows, |row| row.try_get::<String, _>("username"))?;
	Ok(users.into_iter().map(|username| (username.into_boxed_str(), UserInfo::default())).collect())
}

pub(crate) async fn list_user_permissions(
	conn: &mut SqliteConnection,
	username: &str,
) -> ClResult<UserPermissions> {
	let rows = sqlx::query("SELECT permission, options, data_version FROM permissions WHERE username = ?1")
		.bind(username)
		.fetch_all(&mut *conn)
		.await;
	let perms = collect_res(rows, |row| {
		let permission: String = row.try_get("permission")?;
		let data = PermissionData {
			options: parse_options(row.try_get("options")?)?,
			data_version: row.try_get("data_version")?,
		};
		Ok((permission.into_boxed_str(), data))
	})?;
	Ok(perms.into_iter().collect())
}

pub(crate) async fn read(
	conn: &mut SqliteConnection,
	username: &str,
	permission: &str,
) -> ClResult<Option<Permission>> {
	let res = sqlx::query(
		"SELECT username, permission, options, data_version FROM permissions
		WHERE username = ?1 AND permission = ?2",
	)
	.bind(username)
	.bind(permission)
	.fetch_one(&mut *conn)
	.await;

	match map_res(res, parse_permission) {
		Ok(perm) => Ok(Some(perm)),
		Err(Error::NotFound) => Ok(None),
		Err(err) => Err(err),
	}
}

pub(crate) async fn read_history(
	conn: &mut SqliteConnection,
	username: &str,
	permission: &str,
) -> ClResult<Vec<PermissionChange>> {
	let rows = sqlx::query(
		"SELECT change_id, changed_by, timestamp, options, data_version FROM permissions_history
		WHERE username = ?1 AND permission = ?2 ORDER BY change_id",
	)
	.bind(username)
	.bind(permission)
	.fetch_all(&mut *conn)
	.await;

	collect_res(rows, |row| {
		Ok(PermissionChange {
			change_id: row.try_get("change_id")?,
			changed_by: row.try_get::<String, _>("changed_by")?.into(),
			timestamp: Timestamp(row.try_get("timestamp")?),
			options: parse_options(row.try_get("options")?)?,
			data_version: row.try_get("data_version")?,
		})
	})
}

// Writes //
//********//
pub(crate) async fn grant(
	conn: &mut SqliteConnection,
	changed_by: &str,
	username: &str,
	permission: &str,
	options: Option<&Value>,
) -> ClResult<()> {
	let options = options_text(permission, options)?;

	let res = sqlx::query(
		"INSERT INTO permissions (permission, username, options, data_version) VALUES (?1, ?2, ?3, 1)",
	)
	.bind(permission)
	.bind(username)
	.bind(options)
	.execute(&mut *conn)
	.await;

	match res {
		Ok(_) => {}
		Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
			return Err(Error::ValidationError(format!(
				"{} already has the \"{}\" permission",
				username, permission
			)));
		}
		Err(err) => {
			inspect(&err);
			return Err(Error::DbError);
		}
	}

	record_change(conn, changed_by, username, permission).await
}

pub(crate) async fn update(
	conn: &mut SqliteConnection,
	changed_by: &str,
	username: &str,
	permission: &str,
	old_data_version: DataVersion,
	options: Option<&Value>,
) -> ClResult<()> {
	let options = options_text(permission, options)?;

	let res = sqlx::query(
		"UPDATE permissions SET options = ?1, data_version = data_version + 1
		WHERE username = ?2 AND permission = ?3 AND data_version = ?4",
	)
	.bind(options)
	.bind(username)
	.bind(permission)
	.bind(old_data_version)
	.execute(&mut *conn)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(missed_write_error(conn, username, permission).await);
	}

	record_change(conn, changed_by, username, permission).await
}

pub(crate) async fn revoke(
	conn: &mut SqliteConnection,
	changed_by: &str,
	username: &str,
	permission: &str,
	old_data_version: DataVersion,
) -> ClResult<()> {
	let res = sqlx::query(
		"DELETE FROM permissions WHERE username = ?1 AND permission = ?2 AND data_version = ?3",
	)
	.bind(username)
	.bind(permission)
	.bind(old_data_version)
	.execute(&mut *conn)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	if res.rows_affected() == 0 {
		return Err(missed_write_error(conn, username, permission).await);
	}

	record_revoke(conn, changed_by, username, permission).await
}

// vim: ts=4

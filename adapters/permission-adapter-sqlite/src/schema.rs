//! Database schema initialization

use sqlx::{Sqlite, SqlitePool, Transaction};

const CURRENT_DB_VERSION: i64 = 1;

async fn get_db_version(tx: &mut Transaction<'_, Sqlite>) -> i64 {
	sqlx::query_scalar::<_, String>("SELECT value FROM vars WHERE key = 'db_version'")
		.fetch_optional(&mut **tx)
		.await
		.ok()
		.flatten()
		.and_then(|v| v.parse().ok())
		.unwrap_or(0)
}

/// Creates the tables when missing
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS vars (
		key text NOT NULL,
		value text NOT NULL,
		PRIMARY KEY(key)
	)",
	)
	.execute(&mut *tx)
	.await?;

	let version = get_db_version(&mut tx).await;

	// Permissions
	//*************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS permissions (
		permission text NOT NULL,
		username text NOT NULL,
		options text,
		data_version integer NOT NULL,
		PRIMARY KEY(permission, username)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query("CREATE INDEX IF NOT EXISTS idx_permissions_username ON permissions(username)")
		.execute(&mut *tx)
		.await?;

	// History
	//*********
	// One row per change. A row without data_version records a revocation.
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS permissions_history (
		change_id integer PRIMARY KEY AUTOINCREMENT,
		changed_by text NOT NULL,
		timestamp integer NOT NULL,
		permission text NOT NULL,
		username text NOT NULL,
		options text,
		data_version integer
	)",
	)
	.execute(&mut *tx)
	.await?;

	if version < CURRENT_DB_VERSION {
		sqlx::query("INSERT OR REPLACE INTO vars (key, value) VALUES ('db_version', ?)")
			.bind(CURRENT_DB_VERSION.to_string())
			.execute(&mut *tx)
			.await?;
	}

	tx.commit().await?;
	Ok(())
}

// vim: ts=4

//! Utility functions for database operations

use sqlx::sqlite::SqliteRow;

use aus_types::prelude::*;

/// Log database errors
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map a query result to a value using a closure
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(&SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(ref row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Map every row of a query result
pub(crate) fn collect_res<T, F>(rows: Result<Vec<SqliteRow>, sqlx::Error>, f: F) -> ClResult<Vec<T>>
where
	F: Fn(&SqliteRow) -> Result<T, sqlx::Error>,
{
	let rows = rows.inspect_err(inspect).map_err(|_| Error::DbError)?;
	rows.iter().map(|row| f(row).inspect_err(inspect).map_err(|_| Error::DbError)).collect()
}

/// Options are stored as JSON text
pub(crate) fn parse_options(text: Option<&str>) -> Result<Option<serde_json::Value>, sqlx::Error> {
	text.map(serde_json::from_str).transpose().map_err(|err| sqlx::Error::Decode(Box::new(err)))
}

// vim: ts=4

//! Shared helpers for the SQLite adapter

use hostpanel_types::prelude::*;
use sqlx::sqlite::SqliteRow;

/// Log database error for debugging
pub(crate) fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

/// Map an error of a write, unique constraint violations become `Conflict`
pub(crate) fn map_write_err(err: sqlx::Error, what: &str) -> Error {
	match &err {
		sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
			debug!("DB: unique violation on {}: {}", what, db_err);
			Error::Conflict(format!("{} already exists", what))
		}
		_ => {
			inspect(&err);
			Error::DbError
		}
	}
}

/// Map a single-row query result, translating SQL errors to ClResult
pub(crate) fn map_res<T, F>(row: Result<SqliteRow, sqlx::Error>, f: F) -> ClResult<T>
where
	F: FnOnce(SqliteRow) -> Result<T, sqlx::Error>,
{
	match row {
		Ok(row) => f(row).inspect_err(inspect).map_err(|_| Error::DbError),
		Err(sqlx::Error::RowNotFound) => Err(Error::NotFound),
		Err(err) => {
			inspect(&err);
			Err(Error::DbError)
		}
	}
}

/// Collect an iterator of query results, translating errors
pub(crate) fn collect_res<T>(
	iter: impl Iterator<Item = Result<T, sqlx::Error>> + Unpin,
) -> ClResult<Vec<T>> {
	let mut items = Vec::new();
	for item in iter {
		items.push(item.inspect_err(inspect).map_err(|_| Error::DbError)?);
	}
	Ok(items)
}

/// Stored form of a yes/no flag
pub(crate) fn yes_no(value: bool) -> &'static str {
	if value { "yes" } else { "no" }
}

pub(crate) fn parse_yes_no(value: &str) -> bool {
	value == "yes"
}

/// Join ids into the stored comma separated form
pub(crate) fn join_ids(ids: &[i64]) -> String {
	ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}


// vim: ts=4

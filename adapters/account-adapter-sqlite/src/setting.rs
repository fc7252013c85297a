//! Settings key-value store
//!
//! Values are stored as JSON text.

use std::collections::HashMap;

use sqlx::{Row, SqlitePool};

use crate::utils::inspect;
use hostpanel_types::prelude::*;

pub(crate) async fn list(db: &SqlitePool) -> ClResult<HashMap<String, serde_json::Value>> {
	let rows = sqlx::query("SELECT name, value FROM settings")
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	let mut settings = HashMap::new();
	for row in rows {
		let name: String = row.get("name");
		let value: Option<String> = row.get("value");
		match value.as_deref().map(serde_json::from_str) {
			Some(Ok(value)) => {
				settings.insert(name, value);
			}
			Some(Err(err)) => warn!("Ignoring setting {} with invalid JSON: {}", name, err),
			None => {}
		}
	}

	Ok(settings)
}

/// Update or create a setting, `None` deletes it
pub(crate) async fn update(
	db: &SqlitePool,
	name: &str,
	value: Option<serde_json::Value>,
) -> ClResult<()> {
	if let Some(val) = value {
		sqlx::query("INSERT OR REPLACE INTO settings (name, value) VALUES (?, ?)")
			.bind(name)
			.bind(val.to_string())
			.execute(db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;
	} else {
		sqlx::query("DELETE FROM settings WHERE name = ?")
			.bind(name)
			.execute(db)
			.await
			.inspect_err(inspect)
			.map_err(|_| Error::DbError)?;
	}

	Ok(())
}

// vim: ts=4

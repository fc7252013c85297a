//! Server IP pool (`server_ips` table)

use sqlx::{Row, SqlitePool};

use crate::utils::{collect_res, inspect, map_write_err};
use hostpanel_types::account_adapter::ServerIp;
use hostpanel_types::prelude::*;

/// List server IPs, ordered by address
pub(crate) async fn list(db: &SqlitePool) -> ClResult<Vec<ServerIp>> {
	let rows = sqlx::query("SELECT ip_id, ip_number FROM server_ips ORDER BY ip_number")
		.fetch_all(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	collect_res(rows.into_iter().map(|row| {
		Ok(ServerIp {
			ip_id: row.try_get("ip_id")?,
			ip_number: row.try_get::<String, _>("ip_number")?.into(),
		})
	}))
}

pub(crate) async fn create(db: &SqlitePool, ip_number: &str) -> ClResult<i64> {
	let res = sqlx::query("INSERT INTO server_ips (ip_number) VALUES (?)")
		.bind(ip_number)
		.execute(db)
		.await
		.map_err(|err| map_write_err(err, "server IP"))?;

	Ok(res.last_insert_rowid())
}

// vim: ts=4

//! Account management (`admin` and `user_gui_props` tables)

use sqlx::{Row, SqliteConnection, SqlitePool, sqlite::SqliteRow};

use crate::utils::{collect_res, inspect, map_res, map_write_err};
use hostpanel_types::account_adapter::{GuiProps, NewAccount, UserGuiProps, UserListItem};
use hostpanel_types::identity::Identity;
use hostpanel_types::prelude::*;

const IDENTITY_COLUMNS: &str =
	"SELECT admin_id, admin_name, admin_pass, email, admin_type, created_by FROM admin";

fn identity_from_row(row: SqliteRow) -> Result<Identity, sqlx::Error> {
	Ok(Identity {
		user_id: UserId(row.try_get("admin_id")?),
		username: row.try_get::<String, _>("admin_name")?.into(),
		password_hash: row.try_get::<String, _>("admin_pass")?.into(),
		email: row.try_get::<String, _>("email")?.into(),
		typ: row.try_get::<String, _>("admin_type")?.into(),
		created_by: UserId(row.try_get("created_by")?),
	})
}

pub(crate) async fn read_identity(db: &SqlitePool, user_id: UserId) -> ClResult<Identity> {
	let res = sqlx::query(&format!("{} WHERE admin_id = ?", IDENTITY_COLUMNS))
		.bind(user_id.0)
		.fetch_one(db)
		.await;

	map_res(res, identity_from_row)
}

pub(crate) async fn read_identity_by_name(db: &SqlitePool, admin_name: &str) -> ClResult<Identity> {
	let res = sqlx::query(&format!("{} WHERE admin_name = ?", IDENTITY_COLUMNS))
		.bind(admin_name)
		.fetch_one(db)
		.await;

	map_res(res, identity_from_row)
}

pub(crate) async fn user_name_exists(db: &SqlitePool, admin_name: &str) -> ClResult<bool> {
	let row = sqlx::query("SELECT 1 FROM admin WHERE admin_name = ?")
		.bind(admin_name)
		.fetch_optional(db)
		.await
		.inspect_err(inspect)
		.map_err(|_| Error::DbError)?;

	Ok(row.is_some())
}

pub(crate) async fn list_users(db: &SqlitePool) -> ClResult<Vec<UserListItem>> {
	let rows = sqlx::query(
		"SELECT a.admin_id, a.admin_name, a.admin_type, a.email, a.created_by,
			c.admin_name AS created_by_name, a.domain_created
		FROM admin a
		LEFT JOIN admin c ON c.admin_id = a.created_by
		ORDER BY a.admin_type, a.admin_name",
	)
	.fetch_all(db)
	.await
	.inspect_err(inspect)
	.map_err(|_| Error::DbError)?;

	collect_res(rows.into_iter().map(|row| {
		let email: String = row.try_get("email")?;
		Ok(UserListItem {
			user_id: UserId(row.try_get("admin_id")?),
			username: row.try_get::<String, _>("admin_name")?.into(),
			typ: row.try_get::<String, _>("admin_type")?.into(),
			email: (!email.is_empty()).then(|| email.into()),
			created_by: UserId(row.try_get("created_by")?),
			created_by_name: row.try_get::<Option<String>, _>("created_by_name")?.map(Into::into),
			created_at: Timestamp(row.try_get("domain_created")?),
		})
	}))
}

/// Insert an account row, returns the generated id
pub(crate) async fn insert_account(
	conn: &mut SqliteConnection,
	account: &NewAccount<'_>,
	password_hash: &str,
	created_at: Timestamp,
) -> ClResult<UserId> {
	let res = sqlx::query(
		"INSERT INTO admin (admin_name, admin_pass, admin_type, domain_created, created_by,
			fname, lname, firm, zip, city, state, country, email, phone, fax, street1, street2, gender)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
	)
	.bind(account.admin_name)
	.bind(password_hash)
	.bind(account.admin_type)
	.bind(created_at.0)
	.bind(account.created_by.0)
	.bind(account.fname)
	.bind(account.lname)
	.bind(account.firm)
	.bind(account.zip)
	.bind(account.city)
	.bind(account.state)
	.bind(account.country)
	.bind(account.email)
	.bind(account.phone)
	.bind(account.fax)
	.bind(account.street1)
	.bind(account.street2)
	.bind(account.gender)
	.execute(&mut *conn)
	.await
	.map_err(|err| map_write_err(err, "account name"))?;

	Ok(UserId(res.last_insert_rowid()))
}

pub(crate) async fn insert_gui_props(
	conn: &mut SqliteConnection,
	user_id: UserId,
	gui: &GuiProps<'_>,
) -> ClResult<()> {
	sqlx::query("INSERT INTO user_gui_props (user_id, lang, layout) VALUES (?, ?, ?)")
		.bind(user_id.0)
		.bind(gui.lang)
		.bind(gui.layout)
		.execute(&mut *conn)
		.await
		.map_err(|err| map_write_err(err, "GUI properties"))?;

	Ok(())
}

pub(crate) async fn read_gui_props(db: &SqlitePool, user_id: UserId) -> ClResult<UserGuiProps> {
	let res = sqlx::query("SELECT user_id, lang, layout FROM user_gui_props WHERE user_id = ?")
		.bind(user_id.0)
		.fetch_one(db)
		.await;

	map_res(res, |row| {
		Ok(UserGuiProps {
			user_id: UserId(row.try_get("user_id")?),
			lang: row.try_get::<String, _>("lang")?.into(),
			layout: row.try_get::<String, _>("layout")?.into(),
		})
	})
}

// vim: ts=4

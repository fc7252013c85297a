//! Database schema initialization

use sqlx::SqlitePool;

/// Initialize the database schema with all required tables
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Accounts
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS admin (
		admin_id integer PRIMARY KEY AUTOINCREMENT,
		admin_name text NOT NULL UNIQUE,
		admin_pass text NOT NULL,
		admin_type text NOT NULL,
		domain_created integer NOT NULL DEFAULT 0,
		created_by integer NOT NULL DEFAULT 0,
		fname text,
		lname text,
		firm text,
		zip text,
		city text,
		state text,
		country text,
		email text NOT NULL,
		phone text,
		fax text,
		street1 text,
		street2 text,
		gender text
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_admin_created_by ON admin(created_by)")
		.execute(&mut *tx)
		.await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS user_gui_props (
		user_id integer NOT NULL REFERENCES admin(admin_id) ON DELETE CASCADE,
		lang text,
		layout text,
		PRIMARY KEY(user_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Resellers
	//***********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS reseller_props (
		reseller_id integer NOT NULL REFERENCES admin(admin_id) ON DELETE CASCADE,
		reseller_ips text NOT NULL,
		max_dmn_cnt integer NOT NULL DEFAULT 0,
		current_dmn_cnt integer NOT NULL DEFAULT 0,
		max_sub_cnt integer NOT NULL DEFAULT 0,
		current_sub_cnt integer NOT NULL DEFAULT 0,
		max_als_cnt integer NOT NULL DEFAULT 0,
		current_als_cnt integer NOT NULL DEFAULT 0,
		max_mail_cnt integer NOT NULL DEFAULT 0,
		current_mail_cnt integer NOT NULL DEFAULT 0,
		max_ftp_cnt integer NOT NULL DEFAULT 0,
		current_ftp_cnt integer NOT NULL DEFAULT 0,
		max_sql_db_cnt integer NOT NULL DEFAULT 0,
		current_sql_db_cnt integer NOT NULL DEFAULT 0,
		max_sql_user_cnt integer NOT NULL DEFAULT 0,
		current_sql_user_cnt integer NOT NULL DEFAULT 0,
		max_traff_amnt integer NOT NULL DEFAULT 0,
		current_traff_amnt integer NOT NULL DEFAULT 0,
		max_disk_amnt integer NOT NULL DEFAULT 0,
		current_disk_amnt integer NOT NULL DEFAULT 0,
		support_system text NOT NULL DEFAULT 'yes',
		php_ini_system text NOT NULL DEFAULT 'no',
		php_ini_al_config_level text NOT NULL DEFAULT 'per_site',
		php_ini_al_disable_functions text NOT NULL DEFAULT 'no',
		php_ini_al_mail_function text NOT NULL DEFAULT 'yes',
		php_ini_al_allow_url_fopen text NOT NULL DEFAULT 'no',
		php_ini_al_display_errors text NOT NULL DEFAULT 'no',
		php_ini_max_post_max_size integer NOT NULL DEFAULT 8,
		php_ini_max_upload_max_filesize integer NOT NULL DEFAULT 2,
		php_ini_max_max_execution_time integer NOT NULL DEFAULT 30,
		php_ini_max_max_input_time integer NOT NULL DEFAULT 60,
		php_ini_max_memory_limit integer NOT NULL DEFAULT 128,
		PRIMARY KEY(reseller_id)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Server IPs
	//************
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS server_ips (
		ip_id integer PRIMARY KEY AUTOINCREMENT,
		ip_number text NOT NULL UNIQUE
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Settings
	//**********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS settings (
		name text NOT NULL,
		value text,
		PRIMARY KEY(name)
	)",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4

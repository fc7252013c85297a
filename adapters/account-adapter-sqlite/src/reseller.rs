//! Reseller properties (`reseller_props` table)

use sqlx::{Row, SqliteConnection, SqlitePool};

use crate::utils::{join_ids, map_res, map_write_err, parse_yes_no, yes_no};
use hostpanel_types::account_adapter::{
	PhpConfigLevel, PhpPermissions, ResellerLimits, ResellerProps,
};
use hostpanel_types::prelude::*;

/// Insert the reseller properties row, current usage counters start at zero
pub(crate) async fn insert_props(
	conn: &mut SqliteConnection,
	reseller_id: UserId,
	ips: &[i64],
	limits: &ResellerLimits,
	support_system: bool,
	php: &PhpPermissions,
) -> ClResult<()> {
	sqlx::query(
		"INSERT INTO reseller_props (
			reseller_id, reseller_ips,
			max_dmn_cnt, current_dmn_cnt, max_sub_cnt, current_sub_cnt,
			max_als_cnt, current_als_cnt, max_mail_cnt, current_mail_cnt,
			max_ftp_cnt, current_ftp_cnt, max_sql_db_cnt, current_sql_db_cnt,
			max_sql_user_cnt, current_sql_user_cnt, max_traff_amnt, current_traff_amnt,
			max_disk_amnt, current_disk_amnt, support_system, php_ini_system,
			php_ini_al_config_level, php_ini_al_disable_functions, php_ini_al_mail_function,
			php_ini_al_allow_url_fopen, php_ini_al_display_errors, php_ini_max_post_max_size,
			php_ini_max_upload_max_filesize, php_ini_max_max_execution_time,
			php_ini_max_max_input_time, php_ini_max_memory_limit
		) VALUES (
			?, ?,
			?, 0, ?, 0,
			?, 0, ?, 0,
			?, 0, ?, 0,
			?, 0, ?, 0,
			?, 0, ?, ?,
			?, ?, ?,
			?, ?, ?,
			?, ?,
			?, ?
		)",
	)
	.bind(reseller_id.0)
	.bind(join_ids(ips))
	.bind(limits.max_dmn_cnt)
	.bind(limits.max_sub_cnt)
	.bind(limits.max_als_cnt)
	.bind(limits.max_mail_cnt)
	.bind(limits.max_ftp_cnt)
	.bind(limits.max_sql_db_cnt)
	.bind(limits.max_sql_user_cnt)
	.bind(limits.max_traff_amnt)
	.bind(limits.max_disk_amnt)
	.bind(yes_no(support_system))
	.bind(yes_no(php.php_ini_system))
	.bind(php.config_level.as_str())
	.bind(yes_no(php.disable_functions))
	.bind(yes_no(php.mail_function))
	.bind(yes_no(php.allow_url_fopen))
	.bind(yes_no(php.display_errors))
	.bind(php.post_max_size)
	.bind(php.upload_max_filesize)
	.bind(php.max_execution_time)
	.bind(php.max_input_time)
	.bind(php.memory_limit)
	.execute(&mut *conn)
	.await
	.map_err(|err| map_write_err(err, "reseller properties"))?;

	Ok(())
}

pub(crate) async fn read_props(db: &SqlitePool, reseller_id: UserId) -> ClResult<ResellerProps> {
	let res = sqlx::query("SELECT * FROM reseller_props WHERE reseller_id = ?")
		.bind(reseller_id.0)
		.fetch_one(db)
		.await;

	let props = map_res(res, |row| {
		let config_level: String = row.try_get("php_ini_al_config_level")?;
		Ok((
			ResellerProps {
				reseller_id,
				reseller_ips: row.try_get::<String, _>("reseller_ips")?.into(),
				limits: ResellerLimits {
					max_dmn_cnt: row.try_get("max_dmn_cnt")?,
					max_sub_cnt: row.try_get("max_sub_cnt")?,
					max_als_cnt: row.try_get("max_als_cnt")?,
					max_mail_cnt: row.try_get("max_mail_cnt")?,
					max_ftp_cnt: row.try_get("max_ftp_cnt")?,
					max_sql_db_cnt: row.try_get("max_sql_db_cnt")?,
					max_sql_user_cnt: row.try_get("max_sql_user_cnt")?,
					max_traff_amnt: row.try_get("max_traff_amnt")?,
					max_disk_amnt: row.try_get("max_disk_amnt")?,
				},
				support_system: parse_yes_no(row.try_get("support_system")?),
				php: PhpPermissions {
					php_ini_system: parse_yes_no(row.try_get("php_ini_system")?),
					config_level: PhpConfigLevel::PerSite,
					allow_url_fopen: parse_yes_no(row.try_get("php_ini_al_allow_url_fopen")?),
					display_errors: parse_yes_no(row.try_get("php_ini_al_display_errors")?),
					disable_functions: parse_yes_no(row.try_get("php_ini_al_disable_functions")?),
					mail_function: parse_yes_no(row.try_get("php_ini_al_mail_function")?),
					memory_limit: row.try_get("php_ini_max_memory_limit")?,
					post_max_size: row.try_get("php_ini_max_post_max_size")?,
					upload_max_filesize: row.try_get("php_ini_max_upload_max_filesize")?,
					max_execution_time: row.try_get("php_ini_max_max_execution_time")?,
					max_input_time: row.try_get("php_ini_max_max_input_time")?,
				},
			},
			config_level,
		))
	})?;

	let (mut props, config_level) = props;
	props.php.config_level = config_level.parse().map_err(|_| {
		warn!("DB: invalid PHP config level for reseller {}: {}", reseller_id, config_level);
		Error::DbError
	})?;

	Ok(props)
}

// vim: ts=4

//! Submitted form data of the reseller page

use serde::Serialize;

use hostpanel_core::php_ini::{PhpIniInput, yes_no_str};
use hostpanel_core::validation::ValidationErrors;
use hostpanel_types::account_adapter::{PhpPermissions, ServerIp};

/// Strip null bytes and surrounding whitespace from a submitted scalar
pub fn clean_input(value: &str) -> String {
	value.replace('\0', "").trim().to_string()
}

/// Raw submitted fields, in submission order
#[derive(Debug, Clone, Default)]
pub struct FormData {
	fields: Vec<(String, String)>,
}

impl FormData {
	pub fn new(fields: Vec<(String, String)>) -> Self {
		Self { fields }
	}

	/// First value of a field
	pub fn get(&self, name: &str) -> Option<&str> {
		self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
	}

	/// All values of a repeated field (`name` or `name[]`)
	pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
		self.fields
			.iter()
			.filter(move |(k, _)| k.strip_suffix("[]").unwrap_or(k) == name)
			.map(|(_, v)| v.as_str())
	}
}

impl From<Vec<(String, String)>> for FormData {
	fn from(fields: Vec<(String, String)>) -> Self {
		Self::new(fields)
	}
}

/// Reseller limits, features and PHP permissions with defaults applied
#[derive(Debug, Clone, Serialize)]
pub struct ResellerInput {
	pub max_dmn_cnt: String,
	pub max_sub_cnt: String,
	pub max_als_cnt: String,
	pub max_mail_cnt: String,
	pub max_ftp_cnt: String,
	pub max_sql_db_cnt: String,
	pub max_sql_user_cnt: String,
	pub max_traff_amnt: String,
	pub max_disk_amnt: String,
	pub support_system: String,
	pub php_ini_system: String,
	pub php_ini_al_config_level: String,
	pub php_ini_al_allow_url_fopen: String,
	pub php_ini_al_display_errors: String,
	pub php_ini_al_disable_functions: String,
	pub php_ini_al_mail_function: String,
	pub memory_limit: String,
	pub post_max_size: String,
	pub upload_max_filesize: String,
	pub max_execution_time: String,
	pub max_input_time: String,
	pub reseller_ips: Vec<String>,
}

impl Default for ResellerInput {
	fn default() -> Self {
		Self::collect(&FormData::default())
	}
}

impl ResellerInput {
	/// Take submitted values, falling back to the defaults for missing fields
	pub fn collect(form: &FormData) -> Self {
		let php = PhpPermissions::default();
		let field = |name: &str, default: &str| form.get(name).map_or_else(|| default.to_string(), clean_input);
		let int_field = |name: &str, default: i64| field(name, &default.to_string());

		Self {
			max_dmn_cnt: field("max_dmn_cnt", "0"),
			max_sub_cnt: field("max_sub_cnt", "0"),
			max_als_cnt: field("max_als_cnt", "0"),
			max_mail_cnt: field("max_mail_cnt", "0"),
			max_ftp_cnt: field("max_ftp_cnt", "0"),
			max_sql_db_cnt: field("max_sql_db_cnt", "0"),
			max_sql_user_cnt: field("max_sql_user_cnt", "0"),
			max_traff_amnt: field("max_traff_amnt", "0"),
			max_disk_amnt: field("max_disk_amnt", "0"),
			support_system: field("support_system", "yes"),
			php_ini_system: field("php_ini_system", yes_no_str(php.php_ini_system)),
			php_ini_al_config_level: field("php_ini_al_config_level", php.config_level.as_str()),
			php_ini_al_allow_url_fopen: field(
				"php_ini_al_allow_url_fopen",
				yes_no_str(php.allow_url_fopen),
			),
			php_ini_al_display_errors: field(
				"php_ini_al_display_errors",
				yes_no_str(php.display_errors),
			),
			php_ini_al_disable_functions: field(
				"php_ini_al_disable_functions",
				yes_no_str(php.disable_functions),
			),
			php_ini_al_mail_function: field(
				"php_ini_al_mail_function",
				yes_no_str(php.mail_function),
			),
			memory_limit: int_field("memory_limit", php.memory_limit),
			post_max_size: int_field("post_max_size", php.post_max_size),
			upload_max_filesize: int_field("upload_max_filesize", php.upload_max_filesize),
			max_execution_time: int_field("max_execution_time", php.max_execution_time),
			max_input_time: int_field("max_input_time", php.max_input_time),
			reseller_ips: form.get_all("reseller_ips").map(clean_input).collect(),
		}
	}

	/// Submitted value of a limit field
	pub fn limit(&self, name: &str) -> Option<&str> {
		let value = match name {
			"max_dmn_cnt" => &self.max_dmn_cnt,
			"max_sub_cnt" => &self.max_sub_cnt,
			"max_als_cnt" => &self.max_als_cnt,
			"max_mail_cnt" => &self.max_mail_cnt,
			"max_ftp_cnt" => &self.max_ftp_cnt,
			"max_sql_db_cnt" => &self.max_sql_db_cnt,
			"max_sql_user_cnt" => &self.max_sql_user_cnt,
			"max_traff_amnt" => &self.max_traff_amnt,
			"max_disk_amnt" => &self.max_disk_amnt,
			_ => return None,
		};
		Some(value)
	}

	/// Support ticket permission, flagged on the form unless `yes` or `no`
	pub fn support_system(&self, errors: &mut ValidationErrors) -> bool {
		match self.support_system.as_str() {
			"yes" => true,
			"no" => false,
			_ => {
				errors.add("support_system", "Invalid value for support_system.");
				false
			}
		}
	}

	pub fn php_ini_input(&self) -> PhpIniInput<'_> {
		PhpIniInput {
			php_ini_system: &self.php_ini_system,
			config_level: &self.php_ini_al_config_level,
			allow_url_fopen: &self.php_ini_al_allow_url_fopen,
			display_errors: &self.php_ini_al_display_errors,
			disable_functions: &self.php_ini_al_disable_functions,
			mail_function: &self.php_ini_al_mail_function,
			memory_limit: &self.memory_limit,
			post_max_size: &self.post_max_size,
			upload_max_filesize: &self.upload_max_filesize,
			max_execution_time: &self.max_execution_time,
			max_input_time: &self.max_input_time,
		}
	}
}

/// Keep the submitted IP ids that name an existing server IP, sorted ascending
pub fn assign_ips(submitted: &[String], server_ips: &[ServerIp]) -> Vec<i64> {
	let mut ips: Vec<i64> = submitted
		.iter()
		.filter_map(|id| id.parse::<i64>().ok())
		.filter(|id| server_ips.iter().any(|ip| ip.ip_id == *id))
		.collect();
	ips.sort_unstable();
	ips.dedup();
	ips
}

#[cfg(test)]
mod tests {
	use super::*;

	fn form(fields: &[(&str, &str)]) -> FormData {
		FormData::new(fields.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect())
	}

	fn server_ips() -> Vec<ServerIp> {
		[(1, "0.0.0.0"), (2, "10.0.0.1"), (10, "10.0.0.2")]
			.into_iter()
			.map(|(ip_id, ip_number)| ServerIp { ip_id, ip_number: ip_number.into() })
			.collect()
	}

	#[test]
	fn test_clean_input() {
		assert_eq!(clean_input("  12 \t"), "12");
		assert_eq!(clean_input("a\0b"), "ab");
		assert_eq!(clean_input("\0 x \0"), "x");
	}

	#[test]
	fn test_collect_applies_defaults() {
		let input = ResellerInput::collect(&form(&[("max_dmn_cnt", " 10 ")]));

		assert_eq!(input.max_dmn_cnt, "10");
		assert_eq!(input.max_sub_cnt, "0");
		assert_eq!(input.support_system, "yes");
		assert_eq!(input.php_ini_system, "no");
		assert_eq!(input.php_ini_al_config_level, "per_site");
		assert_eq!(input.php_ini_al_mail_function, "yes");
		assert_eq!(input.memory_limit, "128");
		assert_eq!(input.post_max_size, "8");
		assert_eq!(input.upload_max_filesize, "2");
		assert_eq!(input.max_execution_time, "30");
		assert_eq!(input.max_input_time, "60");
		assert!(input.reseller_ips.is_empty());
	}

	#[test]
	fn test_support_system_toggle() {
		let mut errors = ValidationErrors::new();
		assert!(ResellerInput::collect(&form(&[])).support_system(&mut errors));
		assert!(!ResellerInput::collect(&form(&[("support_system", "no")])).support_system(&mut errors));
		assert!(errors.is_empty());

		for value in ["maybe", "YES", "1"] {
			let mut errors = ValidationErrors::new();
			let input = ResellerInput::collect(&form(&[("support_system", value)]));
			assert!(!input.support_system(&mut errors));
			assert_eq!(errors.fields(), ["support_system"], "{} should be rejected", value);
		}
	}

	#[test]
	fn test_repeated_ip_fields() {
		let input = ResellerInput::collect(&form(&[
			("reseller_ips[]", "10"),
			("admin_name", "x"),
			("reseller_ips", "2"),
		]));
		assert_eq!(input.reseller_ips, vec!["10", "2"]);
	}

	#[test]
	fn test_assign_ips_intersects_and_sorts() {
		let submitted = ["10", "2", "7", "abc", "2"].map(String::from);
		assert_eq!(assign_ips(&submitted, &server_ips()), vec![2, 10]);
		assert!(assign_ips(&["99".to_string()], &server_ips()).is_empty());
		assert!(assign_ips(&[], &server_ips()).is_empty());
	}
}

// vim: ts=4

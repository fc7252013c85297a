//! Adapter that stores panel accounts, their properties, and the server IP pool.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;
use std::fmt::Debug;

use crate::identity::Identity;
use crate::prelude::*;

/// Server IP address as defined in `server_ips`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerIp {
	pub ip_id: i64,
	pub ip_number: Box<str>,
}

/// Row of the account listing
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListItem {
	pub user_id: UserId,
	pub username: Box<str>,
	#[serde(rename = "type")]
	pub typ: Box<str>,
	pub email: Option<Box<str>>,
	pub created_by: UserId,
	pub created_by_name: Option<Box<str>>,
	pub created_at: Timestamp,
}

/// Account row data (`admin` table)
///
/// `password` is the plain password, the adapter stores a hash of it.
#[derive(Debug, Default)]
pub struct NewAccount<'a> {
	pub admin_name: &'a str,
	pub password: &'a str,
	pub admin_type: &'a str,
	pub created_by: UserId,
	pub fname: Option<&'a str>,
	pub lname: Option<&'a str>,
	pub firm: Option<&'a str>,
	pub zip: Option<&'a str>,
	pub city: Option<&'a str>,
	pub state: Option<&'a str>,
	pub country: Option<&'a str>,
	pub email: &'a str,
	pub phone: Option<&'a str>,
	pub fax: Option<&'a str>,
	pub street1: Option<&'a str>,
	pub street2: Option<&'a str>,
	pub gender: Option<&'a str>,
}

/// GUI properties of a new account (`user_gui_props` table)
#[derive(Debug, Clone, Copy)]
pub struct GuiProps<'a> {
	pub lang: &'a str,
	pub layout: &'a str,
}

/// Stored GUI properties of an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserGuiProps {
	pub user_id: UserId,
	pub lang: Box<str>,
	pub layout: Box<str>,
}

/// Resource limits of a reseller
///
/// `0` means unlimited, `-1` means the feature is disabled (only where allowed).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResellerLimits {
	pub max_dmn_cnt: i64,
	pub max_sub_cnt: i64,
	pub max_als_cnt: i64,
	pub max_mail_cnt: i64,
	pub max_ftp_cnt: i64,
	pub max_sql_db_cnt: i64,
	pub max_sql_user_cnt: i64,
	pub max_traff_amnt: i64,
	pub max_disk_amnt: i64,
}

/// PHP configuration level a reseller may hand out to customers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhpConfigLevel {
	PerSite,
	PerDomain,
	PerUser,
}

impl PhpConfigLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			PhpConfigLevel::PerSite => "per_site",
			PhpConfigLevel::PerDomain => "per_domain",
			PhpConfigLevel::PerUser => "per_user",
		}
	}
}

impl std::str::FromStr for PhpConfigLevel {
	type Err = Error;

	fn from_str(s: &str) -> ClResult<Self> {
		match s {
			"per_site" => Ok(PhpConfigLevel::PerSite),
			"per_domain" => Ok(PhpConfigLevel::PerDomain),
			"per_user" => Ok(PhpConfigLevel::PerUser),
			_ => Err(Error::ValidationError(format!("Invalid PHP configuration level: {}", s))),
		}
	}
}

/// Resolved PHP permissions of a reseller (sizes in MiB, times in seconds)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhpPermissions {
	pub php_ini_system: bool,
	pub config_level: PhpConfigLevel,
	pub allow_url_fopen: bool,
	pub display_errors: bool,
	pub disable_functions: bool,
	pub mail_function: bool,
	pub memory_limit: i64,
	pub post_max_size: i64,
	pub upload_max_filesize: i64,
	pub max_execution_time: i64,
	pub max_input_time: i64,
}

impl Default for PhpPermissions {
	fn default() -> Self {
		Self {
			php_ini_system: false,
			config_level: PhpConfigLevel::PerSite,
			allow_url_fopen: false,
			display_errors: false,
			disable_functions: false,
			mail_function: true,
			memory_limit: 128,
			post_max_size: 8,
			upload_max_filesize: 2,
			max_execution_time: 30,
			max_input_time: 60,
		}
	}
}

/// Everything needed to create a reseller account
#[derive(Debug)]
pub struct CreateReseller<'a> {
	pub account: NewAccount<'a>,
	pub gui: GuiProps<'a>,
	/// Assigned server IP ids, sorted ascending
	pub ips: &'a [i64],
	pub limits: &'a ResellerLimits,
	pub support_system: bool,
	pub php: &'a PhpPermissions,
}

/// Stored reseller properties (`reseller_props` table)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResellerProps {
	pub reseller_id: UserId,
	/// Comma separated server IP ids
	pub reseller_ips: Box<str>,
	pub limits: ResellerLimits,
	pub support_system: bool,
	pub php: PhpPermissions,
}

/// Callback run inside the account creation transaction, after all rows are
/// inserted. An error rolls the whole creation back.
pub type AfterInsertFn<'a> = dyn Fn(UserId) -> ClResult<()> + Send + Sync + 'a;

#[async_trait]
pub trait AccountAdapter: Debug + Send + Sync {
	// Server IPs
	//************
	/// List server IPs ordered by address
	async fn list_server_ips(&self) -> ClResult<Vec<ServerIp>>;
	async fn create_server_ip(&self, ip_number: &str) -> ClResult<i64>;

	// Accounts
	//**********
	async fn read_identity(&self, user_id: UserId) -> ClResult<Identity>;
	async fn read_identity_by_name(&self, admin_name: &str) -> ClResult<Identity>;
	async fn user_name_exists(&self, admin_name: &str) -> ClResult<bool>;
	async fn list_users(&self) -> ClResult<Vec<UserListItem>>;

	/// Create a plain account row (used to bootstrap the first administrator)
	async fn create_account(&self, account: &NewAccount<'_>) -> ClResult<UserId>;

	/// Create a reseller: account, GUI properties and reseller properties in
	/// one transaction. Either all three rows exist afterwards or none does.
	async fn create_reseller(
		&self,
		data: &CreateReseller<'_>,
		after_insert: &AfterInsertFn<'_>,
	) -> ClResult<UserId>;
	async fn read_gui_props(&self, user_id: UserId) -> ClResult<UserGuiProps>;
	async fn read_reseller_props(&self, reseller_id: UserId) -> ClResult<ResellerProps>;

	// Settings
	//**********
	async fn list_settings(&self) -> ClResult<HashMap<String, serde_json::Value>>;
	/// Store a setting, `None` deletes it
	async fn update_setting(&self, name: &str, value: Option<serde_json::Value>) -> ClResult<()>;
}


// vim: ts=4

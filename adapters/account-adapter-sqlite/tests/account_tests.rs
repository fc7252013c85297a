//! Account adapter tests
//!
//! Accounts, reseller creation (including rollback), server IPs and settings

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use hostpanel_account_adapter_sqlite::AccountAdapterSqlite;
use hostpanel_types::account_adapter::{
	AccountAdapter, CreateReseller, GuiProps, NewAccount, PhpConfigLevel, PhpPermissions,
	ResellerLimits,
};
use hostpanel_types::error::Error;
use hostpanel_types::types::UserId;
use hostpanel_types::worker::WorkerPool;
use tempfile::TempDir;

async fn create_test_adapter() -> (AccountAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let worker = Arc::new(WorkerPool::new(1, 1));

	let adapter = AccountAdapterSqlite::new(worker, temp_dir.path())
		.await
		.expect("Failed to create adapter");

	(adapter, temp_dir)
}

async fn create_admin(adapter: &AccountAdapterSqlite) -> UserId {
	adapter
		.create_account(&NewAccount {
			admin_name: "admin",
			password: "admin-pass",
			admin_type: "admin",
			email: "admin@example.com",
			..Default::default()
		})
		.await
		.expect("Failed to create admin")
}

async fn count_rows(temp: &TempDir, table: &str) -> i64 {
	let opts = sqlx::sqlite::SqliteConnectOptions::new().filename(temp.path().join("accounts.db"));
	let side = sqlx::SqlitePool::connect_with(opts).await.expect("Should open side connection");
	let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
		.fetch_one(&side)
		.await
		.expect("Should count rows");
	side.close().await;
	count
}

fn limits() -> ResellerLimits {
	ResellerLimits {
		max_dmn_cnt: 10,
		max_sub_cnt: -1,
		max_als_cnt: 0,
		max_mail_cnt: 100,
		max_ftp_cnt: 5,
		max_sql_db_cnt: 3,
		max_sql_user_cnt: 6,
		max_traff_amnt: 1024,
		max_disk_amnt: 2048,
	}
}

fn reseller<'a>(
	name: &'a str,
	created_by: UserId,
	ips: &'a [i64],
	limits: &'a ResellerLimits,
	php: &'a PhpPermissions,
) -> CreateReseller<'a> {
	CreateReseller {
		account: NewAccount {
			admin_name: name,
			password: "reseller-pass",
			admin_type: "reseller",
			created_by,
			fname: Some("Jane"),
			lname: Some("Doe"),
			email: "jane@example.com",
			..Default::default()
		},
		gui: GuiProps { lang: "browser", layout: "default" },
		ips,
		limits,
		support_system: true,
		php,
	}
}

// Accounts
//**********

#[tokio::test]
async fn test_create_account_hashes_password() {
	let (adapter, _temp) = create_test_adapter().await;
	let admin_id = create_admin(&adapter).await;

	let identity = adapter.read_identity(admin_id).await.expect("Should read identity");
	assert_eq!(identity.username.as_ref(), "admin");
	assert_eq!(identity.typ.as_ref(), "admin");
	assert_ne!(identity.password_hash.as_ref(), "admin-pass");
	assert!(bcrypt::verify("admin-pass", &identity.password_hash).unwrap_or(false));

	let by_name = adapter.read_identity_by_name("admin").await.expect("Should read by name");
	assert_eq!(by_name.user_id, admin_id);
}

#[tokio::test]
async fn test_read_missing_identity() {
	let (adapter, _temp) = create_test_adapter().await;

	let res = adapter.read_identity(UserId(42)).await;
	assert!(matches!(res, Err(Error::NotFound)));
	assert!(!adapter.user_name_exists("nobody").await.expect("Should query"));
}

#[tokio::test]
async fn test_duplicate_account_name_conflicts() {
	let (adapter, _temp) = create_test_adapter().await;
	create_admin(&adapter).await;

	let res = adapter
		.create_account(&NewAccount {
			admin_name: "admin",
			password: "other",
			admin_type: "admin",
			email: "other@example.com",
			..Default::default()
		})
		.await;
	assert!(matches!(res, Err(Error::Conflict(_))));
}

// Resellers
//***********

#[tokio::test]
async fn test_create_reseller_writes_all_rows() {
	let (adapter, _temp) = create_test_adapter().await;
	let admin_id = create_admin(&adapter).await;
	let ip1 = adapter.create_server_ip("10.0.0.2").await.expect("Should create IP");
	let ip2 = adapter.create_server_ip("10.0.0.1").await.expect("Should create IP");

	let limits = limits();
	let php = PhpPermissions {
		php_ini_system: true,
		config_level: PhpConfigLevel::PerDomain,
		memory_limit: 256,
		..Default::default()
	};
	let ips = [ip1, ip2];
	let seen = AtomicI64::new(0);
	let user_id = adapter
		.create_reseller(&reseller("reseller1", admin_id, &ips, &limits, &php), &|id| {
			seen.store(id.0, Ordering::SeqCst);
			Ok(())
		})
		.await
		.expect("Should create reseller");
	assert_eq!(seen.load(Ordering::SeqCst), user_id.0);

	let identity = adapter.read_identity(user_id).await.expect("Should read reseller");
	assert_eq!(identity.typ.as_ref(), "reseller");
	assert_eq!(identity.created_by, admin_id);

	let gui = adapter.read_gui_props(user_id).await.expect("Should read GUI props");
	assert_eq!(gui.user_id, user_id);
	assert_eq!(gui.lang.as_ref(), "browser");
	assert_eq!(gui.layout.as_ref(), "default");

	let props = adapter.read_reseller_props(user_id).await.expect("Should read props");
	assert_eq!(props.reseller_id, user_id);
	assert_eq!(props.reseller_ips.as_ref(), format!("{},{}", ip1, ip2));
	assert_eq!(props.limits, limits);
	assert!(props.support_system);
	assert_eq!(props.php, php);

	let users = adapter.list_users().await.expect("Should list users");
	let listed = users.iter().find(|u| u.user_id == user_id).expect("Reseller should be listed");
	assert_eq!(listed.created_by_name.as_deref(), Some("admin"));
}

#[tokio::test]
async fn test_failing_hook_rolls_back() {
	let (adapter, temp) = create_test_adapter().await;
	let admin_id = create_admin(&adapter).await;

	let limits = limits();
	let php = PhpPermissions::default();
	let res = adapter
		.create_reseller(&reseller("reseller1", admin_id, &[], &limits, &php), &|_| {
			Err(Error::Internal("listener failed".into()))
		})
		.await;
	assert!(matches!(res, Err(Error::Internal(_))));

	assert!(!adapter.user_name_exists("reseller1").await.expect("Should query"));
	let users = adapter.list_users().await.expect("Should list users");
	assert_eq!(users.len(), 1);
	assert_eq!(count_rows(&temp, "user_gui_props").await, 0);
	assert_eq!(count_rows(&temp, "reseller_props").await, 0);
}

#[tokio::test]
async fn test_failing_props_insert_rolls_back() {
	let (adapter, temp) = create_test_adapter().await;
	let admin_id = create_admin(&adapter).await;

	// Make the last insert of the sequence fail
	let opts = sqlx::sqlite::SqliteConnectOptions::new().filename(temp.path().join("accounts.db"));
	let side = sqlx::SqlitePool::connect_with(opts).await.expect("Should open side connection");
	sqlx::query(
		"CREATE TRIGGER fail_props BEFORE INSERT ON reseller_props
		BEGIN SELECT RAISE(ABORT, 'forced'); END",
	)
	.execute(&side)
	.await
	.expect("Should create trigger");
	side.close().await;

	let limits = limits();
	let php = PhpPermissions::default();
	let res = adapter
		.create_reseller(&reseller("reseller1", admin_id, &[], &limits, &php), &|_| Ok(()))
		.await;
	assert!(matches!(res, Err(Error::DbError)));

	// Neither the account nor its GUI properties survive
	assert!(!adapter.user_name_exists("reseller1").await.expect("Should query"));
	assert_eq!(adapter.list_users().await.expect("Should list users").len(), 1);
	assert_eq!(count_rows(&temp, "admin").await, 1);
	assert_eq!(count_rows(&temp, "user_gui_props").await, 0);
}

#[tokio::test]
async fn test_duplicate_reseller_name_conflicts() {
	let (adapter, _temp) = create_test_adapter().await;
	let admin_id = create_admin(&adapter).await;
	let limits = limits();
	let php = PhpPermissions::default();

	adapter
		.create_reseller(&reseller("reseller1", admin_id, &[], &limits, &php), &|_| Ok(()))
		.await
		.expect("Should create reseller");
	let res = adapter
		.create_reseller(&reseller("reseller1", admin_id, &[], &limits, &php), &|_| Ok(()))
		.await;
	assert!(matches!(res, Err(Error::Conflict(_))));
}

#[tokio::test]
async fn test_read_props_of_non_reseller() {
	let (adapter, _temp) = create_test_adapter().await;
	let admin_id = create_admin(&adapter).await;

	let res = adapter.read_reseller_props(admin_id).await;
	assert!(matches!(res, Err(Error::NotFound)));
}

// Server IPs
//************

#[tokio::test]
async fn test_server_ips_ordered_by_address() {
	let (adapter, _temp) = create_test_adapter().await;
	adapter.create_server_ip("192.168.1.10").await.expect("Should create IP");
	adapter.create_server_ip("10.0.0.1").await.expect("Should create IP");

	let ips = adapter.list_server_ips().await.expect("Should list IPs");
	let numbers: Vec<&str> = ips.iter().map(|ip| ip.ip_number.as_ref()).collect();
	assert_eq!(numbers, vec!["10.0.0.1", "192.168.1.10"]);

	let res = adapter.create_server_ip("10.0.0.1").await;
	assert!(matches!(res, Err(Error::Conflict(_))));
}

// Settings
//**********

#[tokio::test]
async fn test_settings_update_and_delete() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter
		.update_setting("email.enabled", Some(serde_json::json!(true)))
		.await
		.expect("Should store setting");
	adapter
		.update_setting("panel.base_url", Some(serde_json::json!("https://panel.example.com")))
		.await
		.expect("Should store setting");

	let settings = adapter.list_settings().await.expect("Should list settings");
	assert_eq!(settings.get("email.enabled"), Some(&serde_json::json!(true)));
	assert_eq!(settings.len(), 2);

	adapter.update_setting("email.enabled", None).await.expect("Should delete setting");
	let settings = adapter.list_settings().await.expect("Should list settings");
	assert!(!settings.contains_key("email.enabled"));
}

// vim: ts=4

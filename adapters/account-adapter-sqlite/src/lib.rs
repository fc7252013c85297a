//! SQLite implementation of the account adapter.
//!
//! Stores panel accounts, reseller properties, the server IP pool and the
//! persisted settings in a single `accounts.db` database.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

mod account;
mod crypto;
mod reseller;
mod schema;
mod server_ip;
mod setting;
mod utils;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::{collections::HashMap, path::Path, sync::Arc};

use hostpanel_types::account_adapter::{
	AccountAdapter, AfterInsertFn, CreateReseller, NewAccount, ResellerProps, ServerIp,
	UserGuiProps, UserListItem,
};
use hostpanel_types::identity::Identity;
use hostpanel_types::prelude::*;
use hostpanel_types::worker::WorkerPool;

const DB_FILE: &str = "accounts.db";

#[derive(Debug)]
pub struct AccountAdapterSqlite {
	db: SqlitePool,
	worker: Arc<WorkerPool>,
}

impl AccountAdapterSqlite {
	/// Open (or create) the account database in `dir`
	pub async fn new(worker: Arc<WorkerPool>, dir: impl AsRef<Path>) -> ClResult<Self> {
		let db_path = dir.as_ref().join(DB_FILE);
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(&db_path)
			.create_if_missing(true)
			.foreign_keys(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(utils::inspect)
			.map_err(|_| Error::DbError)?;

		schema::init_db(&db)
			.await
			.inspect_err(utils::inspect)
			.map_err(|_| Error::DbError)?;

		debug!("Account database opened: {}", db_path.display());
		Ok(Self { db, worker })
	}
}

#[async_trait]
impl AccountAdapter for AccountAdapterSqlite {
	// Server IPs
	//************
	async fn list_server_ips(&self) -> ClResult<Vec<ServerIp>> {
		server_ip::list(&self.db).await
	}

	async fn create_server_ip(&self, ip_number: &str) -> ClResult<i64> {
		server_ip::create(&self.db, ip_number).await
	}

	// Accounts
	//**********
	async fn read_identity(&self, user_id: UserId) -> ClResult<Identity> {
		account::read_identity(&self.db, user_id).await
	}

	async fn read_identity_by_name(&self, admin_name: &str) -> ClResult<Identity> {
		account::read_identity_by_name(&self.db, admin_name).await
	}

	async fn user_name_exists(&self, admin_name: &str) -> ClResult<bool> {
		account::user_name_exists(&self.db, admin_name).await
	}

	async fn list_users(&self) -> ClResult<Vec<UserListItem>> {
		account::list_users(&self.db).await
	}

	async fn create_account(&self, data: &NewAccount<'_>) -> ClResult<UserId> {
		let password_hash =
			crypto::generate_password_hash(&self.worker, data.password.into()).await?;

		let mut tx = self.db.begin().await.inspect_err(utils::inspect).map_err(|_| Error::DbError)?;
		let user_id = account::insert_account(&mut *tx, data, &password_hash, Timestamp::now()).await?;
		tx.commit().await.inspect_err(utils::inspect).map_err(|_| Error::DbError)?;

		info!("Account created: {} ({}, id={})", data.admin_name, data.admin_type, user_id);
		Ok(user_id)
	}

	async fn create_reseller(
		&self,
		data: &CreateReseller<'_>,
		after_insert: &AfterInsertFn<'_>,
	) -> ClResult<UserId> {
		// Hash before opening the transaction, the write lock is held until commit
		let password_hash =
			crypto::generate_password_hash(&self.worker, data.account.password.into()).await?;

		let mut tx = self.db.begin().await.inspect_err(utils::inspect).map_err(|_| Error::DbError)?;

		let user_id =
			account::insert_account(&mut *tx, &data.account, &password_hash, Timestamp::now())
				.await?;
		account::insert_gui_props(&mut *tx, user_id, &data.gui).await?;
		reseller::insert_props(
			&mut *tx,
			user_id,
			data.ips,
			data.limits,
			data.support_system,
			data.php,
		)
		.await?;

		// Dropping the transaction on error rolls everything back
		after_insert(user_id)?;

		tx.commit().await.inspect_err(utils::inspect).map_err(|_| Error::DbError)?;

		info!("Reseller created: {} (id={})", data.account.admin_name, user_id);
		Ok(user_id)
	}

	async fn read_gui_props(&self, user_id: UserId) -> ClResult<UserGuiProps> {
		account::read_gui_props(&self.db, user_id).await
	}

	async fn read_reseller_props(&self, reseller_id: UserId) -> ClResult<ResellerProps> {
		reseller::read_props(&self.db, reseller_id).await
	}

	// Settings
	//**********
	async fn list_settings(&self) -> ClResult<HashMap<String, serde_json::Value>> {
		setting::list(&self.db).await
	}

	async fn update_setting(&self, name: &str, value: Option<serde_json::Value>) -> ClResult<()> {
		setting::update(&self.db, name, value).await
	}
}

// vim: ts=4

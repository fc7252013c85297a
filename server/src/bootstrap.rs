//! First start initialization

use hostpanel_types::account_adapter::{AccountAdapter, NewAccount};
use hostpanel_types::identity::USER_TYPE_ADMIN;
use hostpanel_types::prelude::*;

use crate::config::Config;

/// Create the configured administrator and server IPs when they are missing
///
/// Existing data is never changed.
pub async fn bootstrap(adapter: &dyn AccountAdapter, config: &Config) -> ClResult<()> {
	if let Some(admin) = &config.admin {
		if adapter.user_name_exists(&admin.name).await? {
			debug!(admin = %admin.name, "Administrator exists");
		} else {
			info!("======================================\nBootstrapping...\n======================================");
			let user_id = adapter
				.create_account(&NewAccount {
					admin_name: &admin.name,
					password: &admin.password,
					admin_type: USER_TYPE_ADMIN,
					email: &admin.email,
					..Default::default()
				})
				.await?;
			info!(admin = %admin.name, id = %user_id, "Administrator created");
		}
	}

	if !config.server_ips.is_empty() && adapter.list_server_ips().await?.is_empty() {
		for ip in &config.server_ips {
			let ip_id = adapter.create_server_ip(ip).await?;
			info!(ip = %ip, id = ip_id, "Server IP created");
		}
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::AdminBootstrap;
	use hostpanel_account_adapter_sqlite::AccountAdapterSqlite;
	use hostpanel_types::worker::WorkerPool;
	use std::path::PathBuf;
	use std::sync::Arc;

	fn config(server_ips: &[&str]) -> Config {
		Config {
			listen: "127.0.0.1:0".into(),
			db_dir: PathBuf::from("."),
			template_dir: None,
			admin: Some(AdminBootstrap {
				name: "admin".into(),
				password: "secret123".into(),
				email: "admin@example.com".into(),
			}),
			server_ips: server_ips.iter().map(ToString::to_string).collect(),
			worker_threads: 1,
		}
	}

	#[tokio::test]
	async fn test_bootstrap_is_idempotent() {
		let temp = tempfile::TempDir::new().unwrap();
		let adapter =
			AccountAdapterSqlite::new(Arc::new(WorkerPool::new(1, 1)), temp.path()).await.unwrap();

		bootstrap(&adapter, &config(&["10.0.0.1", "0.0.0.0"])).await.unwrap();
		bootstrap(&adapter, &config(&["10.0.0.2"])).await.unwrap();

		let admin = adapter.read_identity_by_name("admin").await.unwrap();
		assert_eq!(admin.typ.as_ref(), USER_TYPE_ADMIN);
		assert_eq!(adapter.list_users().await.unwrap().len(), 1);

		let ips: Vec<String> = adapter
			.list_server_ips()
			.await
			.unwrap()
			.into_iter()
			.map(|ip| ip.ip_number.to_string())
			.collect();
		assert_eq!(ips, ["0.0.0.0", "10.0.0.1"]);
	}
}

// vim: ts=4

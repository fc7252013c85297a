//! Process configuration read from the environment

use std::path::PathBuf;

use hostpanel_types::prelude::*;

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";
pub const DEFAULT_DB_DIR: &str = "./data";

/// Administrator account created on first start
#[derive(Clone)]
pub struct AdminBootstrap {
	pub name: String,
	pub password: String,
	pub email: String,
}

impl std::fmt::Debug for AdminBootstrap {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AdminBootstrap")
			.field("name", &self.name)
			.field("email", &self.email)
			.finish_non_exhaustive()
	}
}

#[derive(Debug, Clone)]
pub struct Config {
	pub listen: Box<str>,
	pub db_dir: PathBuf,
	pub template_dir: Option<PathBuf>,
	pub admin: Option<AdminBootstrap>,
	/// Server IPs created while none are defined
	pub server_ips: Vec<String>,
	pub worker_threads: usize,
}

impl Config {
	pub fn from_env() -> ClResult<Self> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ClResult<Self> {
		let var = |name: &str| {
			lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
		};

		let admin = match var("HOSTPANEL_ADMIN_USER") {
			Some(name) => {
				let password = var("HOSTPANEL_ADMIN_PASSWORD").ok_or_else(|| {
					Error::ConfigError("HOSTPANEL_ADMIN_PASSWORD is required with HOSTPANEL_ADMIN_USER".into())
				})?;
				let email = var("HOSTPANEL_ADMIN_EMAIL").ok_or_else(|| {
					Error::ConfigError("HOSTPANEL_ADMIN_EMAIL is required with HOSTPANEL_ADMIN_USER".into())
				})?;
				Some(AdminBootstrap { name, password, email })
			}
			None => None,
		};

		let worker_threads = match var("HOSTPANEL_WORKERS") {
			Some(n) => n
				.parse::<usize>()
				.ok()
				.filter(|n| *n > 0)
				.ok_or_else(|| Error::ConfigError(format!("Invalid HOSTPANEL_WORKERS: {}", n)))?,
			None => 2,
		};

		Ok(Self {
			listen: var("HOSTPANEL_LISTEN").unwrap_or_else(|| DEFAULT_LISTEN.into()).into(),
			db_dir: PathBuf::from(var("HOSTPANEL_DB_DIR").unwrap_or_else(|| DEFAULT_DB_DIR.into())),
			template_dir: var("HOSTPANEL_TEMPLATE_DIR").map(PathBuf::from),
			admin,
			server_ips: var("HOSTPANEL_SERVER_IPS")
				.map(|ips| {
					ips.split(',')
						.map(str::trim)
						.filter(|ip| !ip.is_empty())
						.map(ToString::to_string)
						.collect()
				})
				.unwrap_or_default(),
			worker_threads,
		})
	}
}


// vim: ts=4

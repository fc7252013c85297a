//! Hosting control panel server
//!
//! Serves the admin pages behind a trusted reverse proxy which authenticates
//! users and passes the account name in `X-Auth-User`.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod bootstrap;
mod config;

use axum::middleware;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use hostpanel_account_adapter_sqlite::AccountAdapterSqlite;
use hostpanel_admin::page::AdminPages;
use hostpanel_core::app::{AppBuilder, AppOpts};
use hostpanel_core::core_settings;
use hostpanel_core::middleware::require_auth;
use hostpanel_email::EmailModule;
use hostpanel_types::prelude::*;
use hostpanel_types::worker::WorkerPool;

use crate::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();

	match run().await {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!("FATAL: {}", err);
			ExitCode::FAILURE
		}
	}
}

async fn run() -> ClResult<()> {
	let config = Config::from_env()?;
	debug!(?config, "Configuration loaded");

	tokio::fs::create_dir_all(&config.db_dir).await?;

	let worker = Arc::new(WorkerPool::new(1, config.worker_threads));
	let adapter = Arc::new(AccountAdapterSqlite::new(Arc::clone(&worker), &config.db_dir).await?);

	let opts = AppOpts {
		listen: config.listen.clone(),
		db_dir: config.db_dir.clone().into_boxed_path(),
		template_dir: config.template_dir.clone().map(PathBuf::into_boxed_path),
	};
	let app = AppBuilder::new(opts)
		.worker(worker)
		.account_adapter(adapter)
		.settings(core_settings::register_settings)?
		.settings(hostpanel_email::register_settings)?
		.extension(EmailModule::new())
		.extension(AdminPages::new(config.template_dir.as_deref())?)
		.build()
		.await?;

	bootstrap::bootstrap(app.account_adapter.as_ref(), &config).await.inspect_err(|err| {
		error!("Bootstrap failed: {}", err);
	})?;

	let router = hostpanel_admin::router()
		.route_layer(middleware::from_fn_with_state(app.clone(), require_auth))
		.layer(TraceLayer::new_for_http())
		.with_state(app.clone());

	let listener = TcpListener::bind(app.opts.listen.as_ref()).await?;
	info!("Listening on HTTP {}", app.opts.listen);
	axum::serve(listener, router).await?;

	Ok(())
}

// vim: ts=4

//! App state type

use parking_lot::RwLock;
use std::{
	any::{Any, TypeId},
	collections::HashMap,
	path::Path,
	sync::Arc,
};

use crate::events::EventManager;
use crate::prelude::*;
use crate::settings::{SettingValue, Settings, SettingsRegistry};

use hostpanel_types::account_adapter::AccountAdapter;
use hostpanel_types::worker::WorkerPool;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone)]
pub struct AppOpts {
	pub listen: Box<str>,
	pub db_dir: Box<Path>,
	/// Directory with page templates overriding the built-in ones
	pub template_dir: Option<Box<Path>>,
}

pub struct AppState {
	pub worker: Arc<WorkerPool>,
	pub opts: AppOpts,
	pub events: EventManager,

	pub account_adapter: Arc<dyn AccountAdapter>,

	// Settings subsystem
	pub settings_registry: Arc<SettingsRegistry>,
	settings: RwLock<Arc<Settings>>,

	// Type-erased extension map for feature-specific state
	extensions: Extensions,
}

impl AppState {
	/// Snapshot of the current settings
	pub fn settings(&self) -> Arc<Settings> {
		self.settings.read().clone()
	}

	/// Reload settings from defaults and the stored overrides
	pub async fn reload_settings(&self) -> ClResult<()> {
		let settings = load_settings(&self.settings_registry, self.account_adapter.as_ref()).await?;
		*self.settings.write() = Arc::new(settings);
		Ok(())
	}

	/// Store a setting override and reload, `None` restores the default
	pub async fn update_setting(&self, name: &str, value: Option<SettingValue>) -> ClResult<()> {
		let def = self
			.settings_registry
			.get(name)
			.ok_or_else(|| Error::ValidationError(format!("Unknown setting: {}", name)))?;
		if let Some(value) = &value {
			def.validate(value)?;
		}

		let json = value.map(serde_json::to_value).transpose()?;
		self.account_adapter.update_setting(name, json).await?;
		self.reload_settings().await
	}

	/// Get a registered extension by type. Returns error if not found.
	pub fn ext<T: Send + Sync + 'static>(&self) -> ClResult<&T> {
		self.extensions.get::<T>().ok_or_else(|| {
			Error::Internal(format!("Extension {} not registered", std::any::type_name::<T>()))
		})
	}
}

impl std::fmt::Debug for AppState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AppState")
			.field("opts", &self.opts)
			.field("account_adapter", &self.account_adapter)
			.field("events", &self.events)
			.finish_non_exhaustive()
	}
}

pub type App = Arc<AppState>;

async fn load_settings(
	registry: &SettingsRegistry,
	adapter: &dyn AccountAdapter,
) -> ClResult<Settings> {
	let mut settings = Settings::with_defaults(registry);
	settings.merge_stored(registry, adapter.list_settings().await?);
	Ok(settings)
}

// Extensions
//************
#[derive(Default)]
struct Extensions {
	map: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Extensions {
	fn insert<T: Send + Sync + 'static>(&mut self, val: T) {
		self.map.insert(TypeId::of::<T>(), Box::new(val));
	}

	fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
		self.map.get(&TypeId::of::<T>())?.downcast_ref::<T>()
	}
}

// Builder
//*********
pub struct AppBuilder {
	opts: AppOpts,
	worker: Option<Arc<WorkerPool>>,
	account_adapter: Option<Arc<dyn AccountAdapter>>,
	settings_registry: SettingsRegistry,
	events: EventManager,
	extensions: Extensions,
}

impl AppBuilder {
	pub fn new(opts: AppOpts) -> Self {
		Self {
			opts,
			worker: None,
			account_adapter: None,
			settings_registry: SettingsRegistry::new(),
			events: EventManager::new(),
			extensions: Extensions::default(),
		}
	}

	pub fn worker(mut self, worker: Arc<WorkerPool>) -> Self {
		self.worker = Some(worker);
		self
	}

	pub fn account_adapter(mut self, account_adapter: Arc<dyn AccountAdapter>) -> Self {
		self.account_adapter = Some(account_adapter);
		self
	}

	/// Register settings of a feature module
	pub fn settings(
		mut self,
		register: impl FnOnce(&mut SettingsRegistry) -> ClResult<()>,
	) -> ClResult<Self> {
		register(&mut self.settings_registry)?;
		Ok(self)
	}

	pub fn extension<T: Send + Sync + 'static>(mut self, val: T) -> Self {
		self.extensions.insert(val);
		self
	}

	pub fn events(&self) -> &EventManager {
		&self.events
	}

	pub async fn build(self) -> ClResult<App> {
		let account_adapter = self
			.account_adapter
			.ok_or_else(|| Error::ConfigError("No account adapter configured".into()))?;
		let worker = self.worker.unwrap_or_else(|| Arc::new(WorkerPool::new(1, 1)));

		let settings = load_settings(&self.settings_registry, account_adapter.as_ref()).await?;
		info!("Loaded {} settings", settings.len());

		Ok(Arc::new(AppState {
			worker,
			opts: self.opts,
			events: self.events,
			account_adapter,
			settings_registry: Arc::new(self.settings_registry),
			settings: RwLock::new(Arc::new(settings)),
			extensions: self.extensions,
		}))
	}
}

// vim: ts=4

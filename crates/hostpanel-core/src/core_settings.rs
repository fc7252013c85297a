//! Core panel settings registration
//!
//! Registers the panel-wide settings: new account defaults and panel URLs.

use crate::prelude::*;
use crate::settings::{SettingDefinition, SettingValue, SettingsRegistry};

/// Register all core settings
pub fn register_settings(registry: &mut SettingsRegistry) -> ClResult<()> {
	// New account defaults
	registry.register(
		SettingDefinition::builder("user.initial_lang")
			.description("Initial interface language of new accounts")
			.default(SettingValue::String("browser".into()))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("user.initial_theme")
			.description("Initial interface theme of new accounts")
			.default(SettingValue::String("default".into()))
			.build()?,
	)?;

	// Panel
	registry.register(
		SettingDefinition::builder("panel.base_url")
			.description("Public base URL of the panel, used in notification mails")
			.default(SettingValue::String(String::new()))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("panel.users_url")
			.description("Location of the account listing")
			.default(SettingValue::String("/admin/users".into()))
			.build()?,
	)?;

	Ok(())
}


// vim: ts=4

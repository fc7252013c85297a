//! Settings subsystem types

pub mod types;

pub use types::{
	Setting, SettingDefinition, SettingDefinitionBuilder, SettingValidator, SettingValue, Settings,
	SettingsRegistry, string_value,
};

// vim: ts=4

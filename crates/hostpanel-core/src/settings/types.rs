//! Settings types and the named settings collection
//!
//! `Settings` maps setting names to values. Adding a setting with an existing
//! name replaces it; removing a name that is not present is a no-op.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::prelude::*;

/// Setting value types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)] // No type tag - type inferred from SettingDefinition
pub enum SettingValue {
	Bool(bool), // Must be before Int to avoid bool -> int coercion
	Int(i64),
	String(String),
	Json(serde_json::Value),
}

impl SettingValue {
	/// Check if this value matches the type of another value
	pub fn matches_type(&self, other: &SettingValue) -> bool {
		matches!(
			(self, other),
			(SettingValue::String(_), SettingValue::String(_))
				| (SettingValue::Int(_), SettingValue::Int(_))
				| (SettingValue::Bool(_), SettingValue::Bool(_))
				| (SettingValue::Json(_), SettingValue::Json(_))
		)
	}

	/// Get the type name for error messages
	pub fn type_name(&self) -> &'static str {
		match self {
			SettingValue::String(_) => "string",
			SettingValue::Int(_) => "int",
			SettingValue::Bool(_) => "bool",
			SettingValue::Json(_) => "json",
		}
	}
}

impl From<&str> for SettingValue {
	fn from(value: &str) -> Self {
		SettingValue::String(value.to_string())
	}
}

impl From<i64> for SettingValue {
	fn from(value: i64) -> Self {
		SettingValue::Int(value)
	}
}

impl From<bool> for SettingValue {
	fn from(value: bool) -> Self {
		SettingValue::Bool(value)
	}
}

/// A named setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
	pub name: String,
	pub value: SettingValue,
}

impl Setting {
	pub fn new(name: impl Into<String>, value: impl Into<SettingValue>) -> Self {
		Self { name: name.into(), value: value.into() }
	}
}

/// Named settings collection
#[derive(Debug, Clone, Default)]
pub struct Settings {
	settings: HashMap<String, Setting>,
}

impl Settings {
	pub fn new() -> Self {
		Self::default()
	}

	/// Collection holding the default value of every registered setting
	pub fn with_defaults(registry: &SettingsRegistry) -> Self {
		let mut settings = Self::new();
		for def in registry.list() {
			if let Some(default) = &def.default {
				settings.add(Setting { name: def.key.clone(), value: default.clone() });
			}
		}
		settings
	}

	/// Overlay settings on top of the current ones
	pub fn merge(&mut self, settings: impl IntoIterator<Item = Setting>) -> &mut Self {
		for setting in settings {
			self.add(setting);
		}
		self
	}

	/// Overlay stored values on top of the current ones
	///
	/// Unknown names and values the definition rejects are skipped with a
	/// warning.
	pub fn merge_stored(
		&mut self,
		registry: &SettingsRegistry,
		stored: HashMap<String, serde_json::Value>,
	) -> &mut Self {
		for (name, json) in stored {
			let Some(def) = registry.get(&name) else {
				warn!("Ignoring unknown stored setting: {}", name);
				continue;
			};
			let value = match serde_json::from_value::<SettingValue>(json) {
				Ok(value) => value,
				Err(err) => {
					warn!("Ignoring invalid stored setting {}: {}", name, err);
					continue;
				}
			};
			if let Err(err) = def.validate(&value) {
				warn!("Ignoring stored setting {}: {}", name, err);
				continue;
			}
			self.add(Setting { name, value });
		}
		self
	}

	/// Optional string setting: unset and empty values are both `None`
	pub fn get_opt_str(&self, name: &str) -> ClResult<Option<&str>> {
		match self.get_str(name) {
			Ok("") | Err(Error::NotFound) => Ok(None),
			Ok(s) => Ok(Some(s)),
			Err(err) => Err(err),
		}
	}

	/// Get a setting value by name
	pub fn get(&self, name: &str) -> ClResult<&SettingValue> {
		self.get_setting(name).map(|setting| &setting.value)
	}

	pub fn get_setting(&self, name: &str) -> ClResult<&Setting> {
		self.settings.get(name).ok_or_else(|| {
			debug!("Couldn't find setting by name: {}", name);
			Error::NotFound
		})
	}

	pub fn get_str(&self, name: &str) -> ClResult<&str> {
		match self.get(name)? {
			SettingValue::String(s) => Ok(s),
			_ => Err(Error::ConfigError(format!("Setting {} is not a string", name))),
		}
	}

	pub fn get_int(&self, name: &str) -> ClResult<i64> {
		match self.get(name)? {
			SettingValue::Int(i) => Ok(*i),
			_ => Err(Error::ConfigError(format!("Setting {} is not an int", name))),
		}
	}

	pub fn get_bool(&self, name: &str) -> ClResult<bool> {
		match self.get(name)? {
			SettingValue::Bool(b) => Ok(*b),
			_ => Err(Error::ConfigError(format!("Setting {} is not a bool", name))),
		}
	}

	/// Add a setting, replacing any setting with the same name
	pub fn add(&mut self, setting: Setting) -> &mut Self {
		self.settings.insert(setting.name.clone(), setting);
		self
	}

	pub fn remove(&mut self, setting: &Setting) -> &mut Self {
		self.remove_by_name(&setting.name)
	}

	pub fn remove_by_name(&mut self, name: &str) -> &mut Self {
		self.settings.remove(name);
		self
	}

	pub fn contains(&self, name: &str) -> bool {
		self.settings.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.settings.len()
	}

	pub fn is_empty(&self) -> bool {
		self.settings.is_empty()
	}

	/// Iterate over the settings in no particular order
	pub fn iter(&self) -> impl Iterator<Item = &Setting> {
		self.settings.values()
	}
}

impl<'a> IntoIterator for &'a Settings {
	type Item = &'a Setting;
	type IntoIter = std::collections::hash_map::Values<'a, String, Setting>;

	fn into_iter(self) -> Self::IntoIter {
		self.settings.values()
	}
}

impl FromIterator<Setting> for Settings {
	fn from_iter<T: IntoIterator<Item = Setting>>(iter: T) -> Self {
		let mut settings = Settings::new();
		for setting in iter {
			settings.add(setting);
		}
		settings
	}
}

/// Validation function of a setting value
pub type SettingValidator = Arc<dyn Fn(&SettingValue) -> ClResult<()> + Send + Sync>;

/// Setting definition - defines metadata for each setting
#[derive(Clone)]
pub struct SettingDefinition {
	/// Dot-separated key (e.g., "email.smtp.host")
	pub key: String,
	pub description: String,
	/// Default value, `None` means the setting is unset until configured
	pub default: Option<SettingValue>,
	pub validator: Option<SettingValidator>,
}

impl std::fmt::Debug for SettingDefinition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingDefinition")
			.field("key", &self.key)
			.field("description", &self.description)
			.field("default", &self.default)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl SettingDefinition {
	pub fn builder(key: impl Into<String>) -> SettingDefinitionBuilder {
		SettingDefinitionBuilder { key: key.into(), description: None, default: None, validator: None }
	}

	/// Check a value before it is stored or loaded
	///
	/// The value must have the type of the default (when there is one) and
	/// pass the validator (when there is one).
	pub fn validate(&self, value: &SettingValue) -> ClResult<()> {
		if let Some(default) = &self.default
			&& !default.matches_type(value)
		{
			return Err(Error::ValidationError(format!(
				"Setting {} expects {}, got {}",
				self.key,
				default.type_name(),
				value.type_name()
			)));
		}
		if let Some(validator) = &self.validator {
			validator(value)?;
		}
		Ok(())
	}
}

/// Validator for settings holding a plain string
pub fn string_value(value: &SettingValue) -> ClResult<()> {
	match value {
		SettingValue::String(_) => Ok(()),
		_ => Err(Error::ValidationError(format!("Expected string, got {}", value.type_name()))),
	}
}

/// Builder for SettingDefinition with fluent API
pub struct SettingDefinitionBuilder {
	key: String,
	description: Option<String>,
	default: Option<SettingValue>,
	validator: Option<SettingValidator>,
}

impl SettingDefinitionBuilder {
	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn default(mut self, value: impl Into<SettingValue>) -> Self {
		self.default = Some(value.into());
		self
	}

	/// Set a validation function
	pub fn validator<F>(mut self, f: F) -> Self
	where
		F: Fn(&SettingValue) -> ClResult<()> + Send + Sync + 'static,
	{
		self.validator = Some(Arc::new(f));
		self
	}

	pub fn build(self) -> ClResult<SettingDefinition> {
		let description = self
			.description
			.ok_or_else(|| Error::ConfigError("Setting description is required".into()))?;
		if let (Some(default), Some(validator)) = (&self.default, &self.validator) {
			validator(default).map_err(|e| {
				Error::ConfigError(format!("Default of setting {} is invalid: {}", self.key, e))
			})?;
		}
		Ok(SettingDefinition {
			key: self.key,
			description,
			default: self.default,
			validator: self.validator,
		})
	}
}

/// Registry of known settings
#[derive(Debug, Default)]
pub struct SettingsRegistry {
	definitions: HashMap<String, SettingDefinition>,
}

impl SettingsRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register(&mut self, def: SettingDefinition) -> ClResult<()> {
		if self.definitions.contains_key(&def.key) {
			return Err(Error::ConfigError(format!("Setting '{}' is already registered", def.key)));
		}

		debug!("Registering setting: {}", def.key);
		self.definitions.insert(def.key.clone(), def);
		Ok(())
	}

	pub fn get(&self, key: &str) -> Option<&SettingDefinition> {
		self.definitions.get(key)
	}

	pub fn list(&self) -> impl Iterator<Item = &SettingDefinition> {
		self.definitions.values()
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}


// vim: ts=4

//! Email settings registration

use crate::prelude::*;
use hostpanel_core::settings::{SettingDefinition, SettingValue, SettingsRegistry, string_value};

/// Register all email settings
pub fn register_settings(registry: &mut SettingsRegistry) -> ClResult<()> {
	registry.register(
		SettingDefinition::builder("email.enabled")
			.description("Enable email sending (disable for testing)")
			.default(SettingValue::Bool(false))
			.build()?,
	)?;

	// No default: mails are skipped until a host is configured
	registry.register(
		SettingDefinition::builder("email.smtp.host")
			.description("SMTP server hostname. If not set, emails are skipped.")
			.validator(string_value)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("email.smtp.port")
			.description("SMTP server port (typically 25, 465, or 587)")
			.default(SettingValue::Int(587))
			.validator(|v| match v {
				SettingValue::Int(port) if (1..=65535).contains(port) => Ok(()),
				_ => Err(Error::ValidationError("Port must be between 1 and 65535".into())),
			})
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("email.smtp.username")
			.description("SMTP authentication username")
			.validator(string_value)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("email.smtp.password")
			.description("SMTP authentication password")
			.validator(string_value)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("email.smtp.tls_mode")
			.description("SMTP TLS mode: none, starttls, or tls")
			.default(SettingValue::String("starttls".into()))
			.validator(|v| match v {
				SettingValue::String(mode) if ["none", "starttls", "tls"].contains(&mode.as_str()) => {
					Ok(())
				}
				_ => Err(Error::ValidationError("TLS mode must be: none, starttls, or tls".into())),
			})
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("email.smtp.timeout_seconds")
			.description("SMTP connection timeout in seconds")
			.default(SettingValue::Int(30))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("email.from.address")
			.description("Sender address of notification mails")
			.validator(|v| match v {
				SettingValue::String(email) if email.contains('@') && email.contains('.') => Ok(()),
				_ => Err(Error::ValidationError("Invalid email address format".into())),
			})
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("email.from.name")
			.description("Sender display name of notification mails")
			.default(SettingValue::String("Hosting Panel".into()))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("email.template_dir")
			.description("Directory with email templates, built-in templates are used when unset")
			.validator(string_value)
			.build()?,
	)?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn registry() -> SettingsRegistry {
		let mut registry = SettingsRegistry::new();
		register_settings(&mut registry).unwrap();
		registry
	}

	fn validate(registry: &SettingsRegistry, key: &str, value: SettingValue) -> ClResult<()> {
		registry.get(key).unwrap().validate(&value)
	}

	#[test]
	fn test_unset_strings_only_accept_strings() {
		let registry = registry();
		for key in ["email.smtp.host", "email.smtp.username", "email.smtp.password", "email.template_dir"] {
			assert!(validate(&registry, key, SettingValue::Int(5)).is_err(), "{}", key);
			assert!(validate(&registry, key, "value".into()).is_ok(), "{}", key);
		}
	}

	#[test]
	fn test_value_checks() {
		let registry = registry();
		assert!(validate(&registry, "email.smtp.port", SettingValue::Int(70000)).is_err());
		assert!(validate(&registry, "email.smtp.port", SettingValue::Int(465)).is_ok());
		assert!(validate(&registry, "email.smtp.tls_mode", "ssl".into()).is_err());
		assert!(validate(&registry, "email.smtp.tls_mode", "tls".into()).is_ok());
		assert!(validate(&registry, "email.from.address", "nobody".into()).is_err());
		assert!(validate(&registry, "email.from.address", "panel@example.com".into()).is_ok());
	}
}

// vim: ts=4

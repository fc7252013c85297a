//! PHP permissions a reseller may grant to customers
//!
//! Submitted values are resolved in a fixed order: `memory_limit` before
//! `post_max_size` before `upload_max_filesize`, since the latter two are
//! bounded by the value resolved before them.

use hostpanel_types::account_adapter::{PhpConfigLevel, PhpPermissions};

use crate::prelude::*;
use crate::validation::{ValidationErrors, is_unsigned_int};

/// Lowest and highest value accepted for numeric PHP directives
pub const DIRECTIVE_MIN: i64 = 1;
pub const DIRECTIVE_MAX: i64 = 10_000;

/// Raw submitted PHP permission values, keyed by form field
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpIniInput<'a> {
	pub php_ini_system: &'a str,
	pub config_level: &'a str,
	pub allow_url_fopen: &'a str,
	pub display_errors: &'a str,
	pub disable_functions: &'a str,
	pub mail_function: &'a str,
	pub memory_limit: &'a str,
	pub post_max_size: &'a str,
	pub upload_max_filesize: &'a str,
	pub max_execution_time: &'a str,
	pub max_input_time: &'a str,
}

/// PHP permission resolver
#[derive(Debug, Clone, Default)]
pub struct PhpIni {
	permissions: PhpPermissions,
}

impl PhpIni {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn permissions(&self) -> &PhpPermissions {
		&self.permissions
	}

	pub fn into_permissions(self) -> PhpPermissions {
		self.permissions
	}

	pub fn has_system_permission(&self) -> bool {
		self.permissions.php_ini_system
	}

	/// Resolve submitted reseller permissions
	///
	/// Invalid values leave the corresponding permission at its default and add
	/// an error on the offending field.
	pub fn set_reseller_permissions(
		&mut self,
		input: &PhpIniInput<'_>,
		errors: &mut ValidationErrors,
	) -> ClResult<()> {
		self.permissions.php_ini_system = yes_no(input.php_ini_system, "php_ini_system", errors)
			.unwrap_or(self.permissions.php_ini_system);

		if !self.permissions.php_ini_system {
			return Ok(());
		}

		match input.config_level.parse::<PhpConfigLevel>() {
			Ok(level) => self.permissions.config_level = level,
			Err(_) => errors.add(
				"php_ini_al_config_level",
				format!("Invalid PHP configuration level: {}", input.config_level),
			),
		}

		let perms = &mut self.permissions;
		if let Some(v) = yes_no(input.allow_url_fopen, "php_ini_al_allow_url_fopen", errors) {
			perms.allow_url_fopen = v;
		}
		if let Some(v) = yes_no(input.display_errors, "php_ini_al_display_errors", errors) {
			perms.display_errors = v;
		}
		if let Some(v) = yes_no(input.disable_functions, "php_ini_al_disable_functions", errors) {
			perms.disable_functions = v;
		}
		if let Some(v) = yes_no(input.mail_function, "php_ini_al_mail_function", errors) {
			perms.mail_function = v;
		}

		if let Some(v) = directive(input.memory_limit, "memory_limit", errors)? {
			perms.memory_limit = v;
		}
		if let Some(v) = directive(input.post_max_size, "post_max_size", errors)? {
			if v > perms.memory_limit {
				errors.add("post_max_size", "post_max_size cannot be greater than memory_limit.");
			} else {
				perms.post_max_size = v;
			}
		}
		if let Some(v) = directive(input.upload_max_filesize, "upload_max_filesize", errors)? {
			if v > perms.post_max_size {
				errors.add(
					"upload_max_filesize",
					"upload_max_filesize cannot be greater than post_max_size.",
				);
			} else {
				perms.upload_max_filesize = v;
			}
		}
		if let Some(v) = directive(input.max_execution_time, "max_execution_time", errors)? {
			perms.max_execution_time = v;
		}
		if let Some(v) = directive(input.max_input_time, "max_input_time", errors)? {
			perms.max_input_time = v;
		}

		Ok(())
	}
}

/// Form value of a yes/no toggle
pub fn yes_no_str(value: bool) -> &'static str {
	if value { "yes" } else { "no" }
}

fn yes_no(value: &str, field: &str, errors: &mut ValidationErrors) -> Option<bool> {
	match value {
		"yes" => Some(true),
		"no" => Some(false),
		_ => {
			errors.add(field, format!("Invalid value for {}.", field));
			None
		}
	}
}

fn directive(value: &str, name: &str, errors: &mut ValidationErrors) -> ClResult<Option<i64>> {
	let parsed = if is_unsigned_int(value)? { value.parse::<i64>().ok() } else { None };
	Ok(match parsed {
		Some(v) if (DIRECTIVE_MIN..=DIRECTIVE_MAX).contains(&v) => Some(v),
		_ => {
			errors.add(
				name,
				format!(
					"Value for the PHP {} directive must be in range {} to {}.",
					name, DIRECTIVE_MIN, DIRECTIVE_MAX
				),
			);
			None
		}
	})
}


// vim: ts=4

//! HTML pages of the admin area

use handlebars::Handlebars;
use serde_json::json;
use std::path::Path;

use crate::account_form::AccountInput;
use crate::form::ResellerInput;
use crate::limits::LIMIT_FIELDS;
use crate::prelude::*;
use hostpanel_core::app::VERSION;
use hostpanel_core::php_ini::{DIRECTIVE_MAX, DIRECTIVE_MIN};
use hostpanel_core::validation::ValidationErrors;
use hostpanel_types::account_adapter::{PhpConfigLevel, ServerIp, UserListItem};

pub const RESELLER_ADD_TITLE: &str = "Admin / Users / Add Reseller";
pub const USERS_TITLE: &str = "Admin / Users";

/// Shown instead of the wildcard address
const ANY_IP: &str = "0.0.0.0";

const PHP_TOGGLES: [(&str, &str); 4] = [
	("php_ini_al_allow_url_fopen", "Can edit the PHP allow_url_fopen configuration option"),
	("php_ini_al_display_errors", "Can edit the PHP display_errors configuration option"),
	("php_ini_al_disable_functions", "Can edit the PHP disable_functions configuration option"),
	("php_ini_al_mail_function", "Can use the PHP mail function"),
];

/// Everything the reseller form shows
#[derive(Debug)]
pub struct ResellerPage<'a> {
	pub action: &'a str,
	pub users_url: &'a str,
	pub server_ips: &'a [ServerIp],
	pub input: &'a ResellerInput,
	pub account: &'a AccountInput,
	pub errors: &'a ValidationErrors,
}

pub struct AdminPages {
	hbs: Handlebars<'static>,
}

impl std::fmt::Debug for AdminPages {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AdminPages").finish_non_exhaustive()
	}
}

fn builtin_template(name: &str) -> Option<&'static str> {
	match name {
		"header" => Some(include_str!("../templates/header.html.hbs")),
		"footer" => Some(include_str!("../templates/footer.html.hbs")),
		"reseller_add" => Some(include_str!("../templates/reseller_add.html.hbs")),
		"users" => Some(include_str!("../templates/users.html.hbs")),
		_ => None,
	}
}

/// Template source, `<dir>/<name>.html.hbs` when present, the built-in one otherwise
fn load_template(template_dir: Option<&Path>, name: &str) -> ClResult<String> {
	if let Some(dir) = template_dir {
		let path = dir.join(format!("{}.html.hbs", name));
		match std::fs::read_to_string(&path) {
			Ok(content) => {
				info!("Using page template override: {}", path.display());
				return Ok(content);
			}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
			Err(e) => warn!("Page template {} not loaded ({}), using built-in", path.display(), e),
		}
	}

	builtin_template(name)
		.map(ToString::to_string)
		.ok_or_else(|| Error::ConfigError(format!("Page template not found: {}", name)))
}

impl AdminPages {
	pub fn new(template_dir: Option<&Path>) -> ClResult<Self> {
		let mut hbs = Handlebars::new();
		for name in ["header", "footer"] {
			let source = load_template(template_dir, name)?;
			hbs.register_partial(name, source).map_err(|e| {
				Error::ConfigError(format!("failed to register partial {}: {}", name, e))
			})?;
		}
		for name in ["reseller_add", "users"] {
			let source = load_template(template_dir, name)?;
			hbs.register_template_string(name, source).map_err(|e| {
				Error::ConfigError(format!("failed to register template {}: {}", name, e))
			})?;
		}

		Ok(Self { hbs })
	}

	fn render(&self, name: &str, ctx: &serde_json::Value) -> ClResult<String> {
		self.hbs.render(name, ctx).map_err(|e| {
			warn!(template = name, error = %e, "Page rendering failed");
			Error::Internal(format!("failed to render {}", name))
		})
	}

	pub fn render_reseller_add(&self, page: &ResellerPage<'_>) -> ClResult<String> {
		self.render("reseller_add", &reseller_add_context(page))
	}

	pub fn render_users(&self, users: &[UserListItem], add_reseller_url: &str) -> ClResult<String> {
		let ctx = json!({
			"title": USERS_TITLE,
			"version": VERSION,
			"messages": [],
			"add_reseller_url": add_reseller_url,
			"users": users,
		});
		self.render("users", &ctx)
	}
}

fn reseller_add_context(page: &ResellerPage<'_>) -> serde_json::Value {
	let errors = page.errors;
	let input = page.input;

	let error_fields: serde_json::Map<String, serde_json::Value> =
		errors.fields().iter().map(|f| (f.clone(), json!(true))).collect();

	let ips: Vec<_> = page
		.server_ips
		.iter()
		.map(|ip| {
			let id = ip.ip_id.to_string();
			json!({
				"ip_id": ip.ip_id,
				"label": if ip.ip_number.as_ref() == ANY_IP { "Any" } else { ip.ip_number.as_ref() },
				"selected": input.reseller_ips.contains(&id),
			})
		})
		.collect();

	let limits: Vec<_> = LIMIT_FIELDS
		.iter()
		.map(|field| {
			json!({
				"name": field.name,
				"title": field.title,
				"help": if field.allow_disabled { "-1 disabled, 0 unlimited" } else { "0 unlimited" },
				"value": input.limit(field.name).unwrap_or_default(),
				"error": errors.has_field(field.name),
			})
		})
		.collect();

	let account = page.account.page_values();
	let account_field = |name: &str, label: &str, input_type: &str| {
		json!({
			"name": name,
			"label": label,
			"input_type": input_type,
			"value": if input_type == "password" { json!("") } else { account[name].clone() },
			"error": errors.has_field(name),
		})
	};
	let account_fields = vec![
		account_field("admin_name", "User name", "text"),
		account_field("admin_pass", "Password", "password"),
		account_field("admin_pass_confirmation", "Password confirmation", "password"),
		account_field("email", "Email", "email"),
		account_field("fname", "First name", "text"),
		account_field("lname", "Last name", "text"),
		account_field("firm", "Company", "text"),
		account_field("street1", "Street 1", "text"),
		account_field("street2", "Street 2", "text"),
		account_field("zip", "Zip/Postal code", "text"),
		account_field("city", "City", "text"),
		account_field("state", "State/Province", "text"),
		account_field("country", "Country", "text"),
		account_field("phone", "Phone", "text"),
		account_field("fax", "Fax", "text"),
	];

	let gender = account["gender"].as_str().unwrap_or("U");
	let genders: Vec<_> = [("M", "Male"), ("F", "Female"), ("U", "Unknown")]
		.into_iter()
		.map(|(value, label)| json!({ "value": value, "label": label, "selected": value == gender }))
		.collect();

	let config_levels: Vec<_> = [
		(PhpConfigLevel::PerSite, "Per site"),
		(PhpConfigLevel::PerDomain, "Per domain"),
		(PhpConfigLevel::PerUser, "Per user"),
	]
	.into_iter()
	.map(|(level, label)| {
		json!({
			"value": level.as_str(),
			"label": label,
			"checked": input.php_ini_al_config_level == level.as_str(),
		})
	})
	.collect();

	let toggle_value = |name: &str| match name {
		"php_ini_al_allow_url_fopen" => &input.php_ini_al_allow_url_fopen,
		"php_ini_al_display_errors" => &input.php_ini_al_display_errors,
		"php_ini_al_disable_functions" => &input.php_ini_al_disable_functions,
		_ => &input.php_ini_al_mail_function,
	};
	let php_toggles: Vec<_> = PHP_TOGGLES
		.iter()
		.map(|(name, title)| {
			json!({
				"name": name,
				"title": title,
				"yes": toggle_value(name) == "yes",
				"error": errors.has_field(name),
			})
		})
		.collect();

	let php_directives: Vec<_> = [
		("memory_limit", &input.memory_limit, "MiB"),
		("post_max_size", &input.post_max_size, "MiB"),
		("upload_max_filesize", &input.upload_max_filesize, "MiB"),
		("max_execution_time", &input.max_execution_time, "Sec."),
		("max_input_time", &input.max_input_time, "Sec."),
	]
	.into_iter()
	.map(|(name, value, unit)| {
		json!({
			"name": name,
			"value": value,
			"unit": unit,
			"min": DIRECTIVE_MIN,
			"max": DIRECTIVE_MAX,
			"error": errors.has_field(name),
		})
	})
	.collect();

	json!({
		"title": RESELLER_ADD_TITLE,
		"version": VERSION,
		"action": page.action,
		"users_url": page.users_url,
		"messages": errors.messages(),
		"errors": error_fields,
		"account_fields": account_fields,
		"genders": genders,
		"ips": ips,
		"limits": limits,
		"input": input,
		"config_levels": config_levels,
		"php_toggles": php_toggles,
		"php_directives": php_directives,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::form::FormData;

	fn server_ips() -> Vec<ServerIp> {
		vec![
			ServerIp { ip_id: 1, ip_number: "0.0.0.0".into() },
			ServerIp { ip_id: 2, ip_number: "10.0.0.1".into() },
		]
	}

	#[test]
	fn test_render_empty_form() {
		let pages = AdminPages::new(None).unwrap();
		let ips = server_ips();
		let input = ResellerInput::default();
		let account = AccountInput::default();
		let errors = ValidationErrors::new();

		let html = pages
			.render_reseller_add(&ResellerPage {
				action: "/admin/reseller/add",
				users_url: "/admin/users",
				server_ips: &ips,
				input: &input,
				account: &account,
				errors: &errors,
			})
			.unwrap();

		assert!(html.contains(RESELLER_ADD_TITLE));
		assert!(html.contains(r#"<option value="1">Any</option>"#));
		assert!(html.contains(r#"<option value="2">10.0.0.1</option>"#));
		assert!(html.contains(r#"name="max_dmn_cnt" id="max_dmn_cnt" value="0""#));
		assert!(html.contains(r#"name="memory_limit" id="memory_limit" min="1" max="10000" value="128""#));
		assert!(!html.contains(r#"class="error""#));
	}

	#[test]
	fn test_render_keeps_values_and_highlights_errors() {
		let pages = AdminPages::new(None).unwrap();
		let ips = server_ips();
		let form = FormData::new(vec![
			("admin_name".into(), "reseller1".into()),
			("admin_pass".into(), "secret123".into()),
			("max_dmn_cnt".into(), "abc".into()),
			("reseller_ips[]".into(), "2".into()),
		]);
		let input = ResellerInput::collect(&form);
		let account = AccountInput::collect(&form);
		let mut errors = ValidationErrors::new();
		errors.add("max_dmn_cnt", "Incorrect limit for domain.");

		let html = pages
			.render_reseller_add(&ResellerPage {
				action: "/admin/reseller/add",
				users_url: "/admin/users",
				server_ips: &ips,
				input: &input,
				account: &account,
				errors: &errors,
			})
			.unwrap();

		assert!(html.contains("Incorrect limit for domain."));
		assert!(html.contains(r#"<option value="2" selected>10.0.0.1</option>"#));
		assert!(html.contains(r#"value="reseller1""#));
		assert!(!html.contains("secret123"));
		assert!(html.contains(r#"class="error""#));
	}

	#[test]
	fn test_template_override() {
		let dir = tempfile::TempDir::new().unwrap();
		std::fs::write(dir.path().join("users.html.hbs"), "{{#each users}}[{{username}}]{{/each}}")
			.unwrap();

		let pages = AdminPages::new(Some(dir.path())).unwrap();
		let html = pages.render_users(&[], "/admin/reseller/add").unwrap();
		assert_eq!(html, "");

		// Templates missing from the directory fall back to the built-in ones
		let html = pages
			.render_reseller_add(&ResellerPage {
				action: "/admin/reseller/add",
				users_url: "/admin/users",
				server_ips: &server_ips(),
				input: &ResellerInput::default(),
				account: &AccountInput::default(),
				errors: &ValidationErrors::new(),
			})
			.unwrap();
		assert!(html.contains(RESELLER_ADD_TITLE));
	}
}

// vim: ts=4

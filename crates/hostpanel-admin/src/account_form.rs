//! Login and personal data of a new account

use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::form::{FormData, clean_input};
use crate::prelude::*;
use hostpanel_core::validation::ValidationErrors;
use hostpanel_types::account_adapter::NewAccount;

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 30;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PERSONAL_MAX_LEN: usize = 200;

const GENDERS: [&str; 3] = ["M", "F", "U"];

static USER_NAME: LazyLock<Result<Regex, regex::Error>> =
	LazyLock::new(|| Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?$"));

/// Optional personal data fields
pub const PERSONAL_FIELDS: [&str; 11] =
	["fname", "lname", "firm", "zip", "city", "state", "country", "phone", "fax", "street1", "street2"];

#[derive(Debug, Clone, Default)]
pub struct AccountInput {
	pub admin_name: String,
	pub admin_pass: String,
	pub admin_pass_confirmation: String,
	pub email: String,
	pub gender: String,
	pub fname: String,
	pub lname: String,
	pub firm: String,
	pub zip: String,
	pub city: String,
	pub state: String,
	pub country: String,
	pub phone: String,
	pub fax: String,
	pub street1: String,
	pub street2: String,
}

impl AccountInput {
	pub fn collect(form: &FormData) -> Self {
		let field = |name: &str| form.get(name).map(clean_input).unwrap_or_default();

		Self {
			admin_name: field("admin_name"),
			// Passwords are taken as submitted
			admin_pass: form.get("admin_pass").unwrap_or_default().to_string(),
			admin_pass_confirmation: form
				.get("admin_pass_confirmation")
				.unwrap_or_default()
				.to_string(),
			email: field("email"),
			gender: field("gender"),
			fname: field("fname"),
			lname: field("lname"),
			firm: field("firm"),
			zip: field("zip"),
			city: field("city"),
			state: field("state"),
			country: field("country"),
			phone: field("phone"),
			fax: field("fax"),
			street1: field("street1"),
			street2: field("street2"),
		}
	}

	pub fn personal(&self, name: &str) -> Option<&str> {
		let value = match name {
			"fname" => &self.fname,
			"lname" => &self.lname,
			"firm" => &self.firm,
			"zip" => &self.zip,
			"city" => &self.city,
			"state" => &self.state,
			"country" => &self.country,
			"phone" => &self.phone,
			"fax" => &self.fax,
			"street1" => &self.street1,
			"street2" => &self.street2,
			_ => return None,
		};
		Some(value)
	}

	/// Validate and normalize the input
	///
	/// The gender defaults to `U`, the domain of the email address is IDNA
	/// encoded. Whether the name is still free is checked by the caller.
	pub fn validate(&mut self, errors: &mut ValidationErrors) -> ClResult<()> {
		let name_re = USER_NAME
			.as_ref()
			.map_err(|e| Error::Internal(format!("user name regex compilation failed: {}", e)))?;

		let name_len = self.admin_name.chars().count();
		if self.admin_name.is_empty() {
			errors.add("admin_name", "The user name is required.");
		} else if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&name_len) {
			errors.add(
				"admin_name",
				format!(
					"The user name must be between {} and {} characters.",
					NAME_MIN_LEN, NAME_MAX_LEN
				),
			);
		} else if !name_re.is_match(&self.admin_name) {
			errors.add("admin_name", "The user name contains invalid characters.");
		}

		if self.admin_pass.chars().count() < PASSWORD_MIN_LEN {
			errors.add(
				"admin_pass",
				format!("The password must be at least {} characters long.", PASSWORD_MIN_LEN),
			);
		} else if self.admin_pass != self.admin_pass_confirmation {
			errors.add("admin_pass_confirmation", "Passwords do not match.");
		}

		match encode_email(&self.email) {
			Some(email) => self.email = email,
			None if self.email.is_empty() => errors.add("email", "The email address is required."),
			None => errors.add("email", "Invalid email address."),
		}

		if self.gender.is_empty() {
			self.gender = "U".into();
		} else if !GENDERS.contains(&self.gender.as_str()) {
			errors.add("gender", "Invalid gender.");
		}

		for name in PERSONAL_FIELDS {
			let len = self.personal(name).map_or(0, |v| v.chars().count());
			if len > PERSONAL_MAX_LEN {
				errors.add(name, format!("{} is too long.", name));
			}
		}

		Ok(())
	}

	/// Whether the user name passed validation
	pub fn name_is_valid(&self, errors: &ValidationErrors) -> bool {
		!self.admin_name.is_empty() && !errors.has_field("admin_name")
	}

	/// Account row of the validated input
	pub fn new_account<'a>(&'a self, admin_type: &'a str, created_by: UserId) -> NewAccount<'a> {
		let opt = |v: &'a str| (!v.is_empty()).then_some(v);

		NewAccount {
			admin_name: &self.admin_name,
			password: &self.admin_pass,
			admin_type,
			created_by,
			fname: opt(&self.fname),
			lname: opt(&self.lname),
			firm: opt(&self.firm),
			zip: opt(&self.zip),
			city: opt(&self.city),
			state: opt(&self.state),
			country: opt(&self.country),
			email: &self.email,
			phone: opt(&self.phone),
			fax: opt(&self.fax),
			street1: opt(&self.street1),
			street2: opt(&self.street2),
			gender: opt(&self.gender),
		}
	}

	/// Values shown when the form is rendered again, passwords left out
	pub fn page_values(&self) -> serde_json::Value {
		let mut values = json!({
			"admin_name": self.admin_name,
			"email": self.email,
			"gender": if self.gender.is_empty() { "U" } else { self.gender.as_str() },
		});
		for name in PERSONAL_FIELDS {
			values[name] = json!(self.personal(name).unwrap_or_default());
		}
		values
	}
}

/// Syntax check of an email address, returns it with an IDNA encoded domain
pub fn encode_email(email: &str) -> Option<String> {
	let (local, domain) = email.split_once('@')?;
	if local.is_empty()
		|| domain.contains('@')
		|| !domain.contains('.')
		|| domain.starts_with('.')
		|| domain.ends_with('.')
		|| email.chars().any(char::is_whitespace)
	{
		return None;
	}

	match url::Host::parse(domain).ok()? {
		url::Host::Domain(domain) => Some(format!("{}@{}", local, domain)),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn input(fields: &[(&str, &str)]) -> AccountInput {
		AccountInput::collect(&FormData::new(
			fields.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect(),
		))
	}

	fn valid() -> Vec<(&'static str, &'static str)> {
		vec![
			("admin_name", "reseller1"),
			("admin_pass", "secret123"),
			("admin_pass_confirmation", "secret123"),
			("email", "jane@example.com"),
		]
	}

	#[test]
	fn test_valid_input() {
		let mut account = input(&valid());
		let mut errors = ValidationErrors::new();
		account.validate(&mut errors).unwrap();

		assert!(errors.is_empty(), "{:?}", errors);
		assert_eq!(account.gender, "U");
		assert!(account.name_is_valid(&errors));

		let row = account.new_account("reseller", UserId(1));
		assert_eq!(row.admin_name, "reseller1");
		assert_eq!(row.fname, None);
		assert_eq!(row.gender, Some("U"));
	}

	#[test]
	fn test_user_name_rules() {
		for name in ["a", "-abc", "abc.", "ab cd", "üser"] {
			let mut fields = valid();
			fields[0] = ("admin_name", name);
			let mut errors = ValidationErrors::new();
			input(&fields).validate(&mut errors).unwrap();
			assert!(errors.has_field("admin_name"), "{} should be rejected", name);
		}

		for name in ["ab", "a.b-c_d", "Reseller42"] {
			let mut fields = valid();
			fields[0] = ("admin_name", name);
			let mut errors = ValidationErrors::new();
			input(&fields).validate(&mut errors).unwrap();
			assert!(errors.is_empty(), "{} should be accepted", name);
		}
	}

	#[test]
	fn test_password_rules() {
		let mut errors = ValidationErrors::new();
		input(&[("admin_pass", "short"), ("admin_pass_confirmation", "short")])
			.validate(&mut errors)
			.unwrap();
		assert!(errors.has_field("admin_pass"));

		let mut errors = ValidationErrors::new();
		input(&[("admin_pass", "secret123"), ("admin_pass_confirmation", "secret124")])
			.validate(&mut errors)
			.unwrap();
		assert!(errors.has_field("admin_pass_confirmation"));
		assert!(!errors.has_field("admin_pass"));
	}

	#[test]
	fn test_gender_and_personal_data() {
		let long = "x".repeat(PERSONAL_MAX_LEN + 1);
		let mut fields: Vec<(&str, &str)> = valid();
		fields.push(("gender", "X"));
		fields.push(("city", &long));

		let mut errors = ValidationErrors::new();
		input(&fields).validate(&mut errors).unwrap();
		assert_eq!(errors.fields(), ["gender", "city"]);
	}

	#[test]
	fn test_encode_email() {
		assert_eq!(encode_email("jane@example.com").as_deref(), Some("jane@example.com"));
		assert_eq!(encode_email("jane@bücher.example").as_deref(), Some("jane@xn--bcher-kva.example"));
		assert_eq!(encode_email("jane@Example.COM").as_deref(), Some("jane@example.com"));
		assert_eq!(encode_email("jane"), None);
		assert_eq!(encode_email("@example.com"), None);
		assert_eq!(encode_email("jane@localhost"), None);
		assert_eq!(encode_email("jane@a@b.com"), None);
		assert_eq!(encode_email("ja ne@example.com"), None);
		assert_eq!(encode_email("jane@1.2.3.4"), None);
	}

	#[test]
	fn test_page_values_skip_password() {
		let values = input(&valid()).page_values();
		assert_eq!(values["admin_name"], "reseller1");
		assert_eq!(values["gender"], "U");
		assert_eq!(values["city"], "");
		assert!(values.get("admin_pass").is_none());
	}
}

// vim: ts=4

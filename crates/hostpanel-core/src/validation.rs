//! Accumulated form validation errors and shared value syntax checks

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::prelude::*;

static UNSIGNED_INT: LazyLock<Result<Regex, regex::Error>> =
	LazyLock::new(|| Regex::new(r"^(0|[1-9][0-9]*)$"));

/// Whether `value` is a non-negative integer without sign or leading zeros
pub fn is_unsigned_int(value: &str) -> ClResult<bool> {
	let re = UNSIGNED_INT
		.as_ref()
		.map_err(|e| Error::Internal(format!("integer regex compilation failed: {}", e)))?;
	Ok(re.is_match(value))
}

/// Validation errors collected over a whole form
///
/// Every check adds to the same value instead of returning early, so a form
/// can show all of its problems at once.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationErrors {
	messages: Vec<String>,
	fields: Vec<String>,
}

impl ValidationErrors {
	pub fn new() -> Self {
		Self::default()
	}

	/// Record an error, highlighting `field`
	pub fn add(&mut self, field: &str, message: impl Into<String>) {
		self.messages.push(message.into());
		if !self.has_field(field) {
			self.fields.push(field.to_string());
		}
	}

	/// Record an error that is not tied to a single field
	pub fn add_message(&mut self, message: impl Into<String>) {
		self.messages.push(message.into());
	}

	pub fn extend(&mut self, other: ValidationErrors) {
		self.messages.extend(other.messages);
		for field in other.fields {
			if !self.has_field(&field) {
				self.fields.push(field);
			}
		}
	}

	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}

	pub fn len(&self) -> usize {
		self.messages.len()
	}

	pub fn messages(&self) -> &[String] {
		&self.messages
	}

	/// Names of the fields to highlight
	pub fn fields(&self) -> &[String] {
		&self.fields
	}

	pub fn has_field(&self, field: &str) -> bool {
		self.fields.iter().any(|f| f == field)
	}
}


// vim: ts=4

//! Notification mails with templates and SMTP delivery
//!
//! This crate provides:
//! - Template rendering with variable substitution (Handlebars)
//! - SMTP email sending with lettre
//! - Welcome mails for newly created accounts

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod sender;
pub mod settings;
pub mod template;

pub use sender::{EmailSender, SendStatus};
pub use template::TemplateEngine;

mod prelude;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::prelude::*;
use hostpanel_core::settings::{Settings, SettingsRegistry};

/// Email message to be sent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
	pub to: String,
	pub subject: String,
	pub text_body: String,
	pub html_body: Option<String>,
}

/// Welcome mail for a newly created account
#[derive(Debug, Clone, Copy)]
pub struct WelcomeMail<'a> {
	/// Account that created the new one
	pub created_by: UserId,
	pub username: &'a str,
	/// Plain password, mailed once
	pub password: &'a str,
	pub email: &'a str,
	pub fname: Option<&'a str>,
	pub lname: Option<&'a str>,
	/// Account type label, e.g. "Reseller"
	pub user_type: &'a str,
}

impl WelcomeMail<'_> {
	/// Full name of the recipient, the user name when no name was given
	pub fn display_name(&self) -> String {
		let name = [self.fname, self.lname]
			.into_iter()
			.flatten()
			.map(str::trim)
			.filter(|s| !s.is_empty())
			.collect::<Vec<_>>()
			.join(" ");
		if name.is_empty() { self.username.to_string() } else { name }
	}
}

/// Email module - main orchestrator for email operations
#[derive(Debug, Default)]
pub struct EmailModule {
	pub template_engine: Arc<TemplateEngine>,
	pub sender: Arc<EmailSender>,
}

impl EmailModule {
	pub fn new() -> Self {
		Self { template_engine: Arc::new(TemplateEngine::new()), sender: Arc::new(EmailSender::new()) }
	}

	/// Render a template into a message
	pub fn compose(
		&self,
		settings: &Settings,
		to: &str,
		template_name: &str,
		vars: &serde_json::Value,
	) -> ClResult<EmailMessage> {
		let template_dir = settings.get_opt_str("email.template_dir")?.map(Path::new);
		let rendered = self.template_engine.render(template_dir, template_name, vars)?;

		Ok(EmailMessage {
			to: to.to_string(),
			subject: rendered.subject.unwrap_or_else(|| template_name.to_string()),
			text_body: rendered.text_body,
			html_body: Some(rendered.html_body),
		})
	}

	pub fn compose_welcome_mail(
		&self,
		settings: &Settings,
		mail: &WelcomeMail<'_>,
	) -> ClResult<EmailMessage> {
		let vars = serde_json::json!({
			"username": mail.username,
			"password": mail.password,
			"name": mail.display_name(),
			"user_type": mail.user_type,
			"base_url": settings.get_opt_str("panel.base_url")?.unwrap_or_default(),
		});
		self.compose(settings, mail.email, "welcome", &vars)
	}

	/// Send immediately
	pub async fn send_now(&self, settings: &Settings, message: EmailMessage) -> ClResult<SendStatus> {
		self.sender.send(settings, message).await
	}
}

pub fn register_settings(registry: &mut SettingsRegistry) -> ClResult<()> {
	settings::register_settings(registry)
}

/// Send the welcome mail of a new account
pub async fn send_welcome_mail(app: &App, mail: &WelcomeMail<'_>) -> ClResult<SendStatus> {
	let email = app.ext::<EmailModule>()?;
	let settings = app.settings();

	let message = email.compose_welcome_mail(&settings, mail)?;
	let status = email.send_now(&settings, message).await?;
	debug!(to = mail.email, created_by = %mail.created_by, ?status, "Welcome mail processed");
	Ok(status)
}


// vim: ts=4

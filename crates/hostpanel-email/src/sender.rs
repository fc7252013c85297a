//! SMTP email sender using lettre
//!
//! Reads the SMTP configuration from the settings at send time, so changed
//! settings apply to the next mail.

use lettre::message::{MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

use crate::EmailMessage;
use crate::prelude::*;
use hostpanel_core::settings::Settings;

/// Outcome of a send attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
	Sent,
	/// Email is disabled or no SMTP host is configured
	Skipped,
}

/// SMTP email sender
#[derive(Debug, Default)]
pub struct EmailSender;

impl EmailSender {
	pub fn new() -> Self {
		Self
	}

	/// Send email using the SMTP settings
	pub async fn send(&self, settings: &Settings, message: EmailMessage) -> ClResult<SendStatus> {
		if !settings.get_bool("email.enabled")? {
			info!("Email sending disabled, skipping send to {}", message.to);
			return Ok(SendStatus::Skipped);
		}

		let Some(host) = settings.get_opt_str("email.smtp.host")? else {
			info!("No SMTP host configured, skipping send to {}", message.to);
			return Ok(SendStatus::Skipped);
		};

		let port = u16::try_from(settings.get_int("email.smtp.port")?)
			.map_err(|_| Error::ConfigError("Invalid SMTP port".into()))?;
		let tls_mode = settings.get_str("email.smtp.tls_mode")?;
		let timeout_seconds = u64::try_from(settings.get_int("email.smtp.timeout_seconds")?)
			.map_err(|_| Error::ConfigError("Invalid SMTP timeout".into()))?;
		let from_address = settings
			.get_opt_str("email.from.address")?
			.ok_or_else(|| Error::ConfigError("email.from.address is not set".into()))?;
		let from_name = settings.get_opt_str("email.from.name")?;

		debug!("Sending email to {} via {}:{} with TLS mode: {}", message.to, host, port, tls_mode);

		let email = build_message(from_name, from_address, message.clone())?;

		let tls = match tls_mode {
			"tls" => Tls::Wrapper(tls_parameters(host)?),
			"starttls" => Tls::Required(tls_parameters(host)?),
			"none" => Tls::None,
			_ => {
				return Err(Error::ConfigError(format!(
					"Invalid TLS mode: {}. Must be 'none', 'starttls', or 'tls'",
					tls_mode
				)));
			}
		};

		let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
			.port(port)
			.timeout(Some(Duration::from_secs(timeout_seconds)))
			.tls(tls);

		if let Some(username) = settings.get_opt_str("email.smtp.username")? {
			let password = settings.get_opt_str("email.smtp.password")?.unwrap_or_default();
			builder = builder.credentials(Credentials::new(username.into(), password.into()));
		}

		match builder.build().send(email).await {
			Ok(response) => {
				info!("Email sent successfully to {} (response: {:?})", message.to, response.code());
				Ok(SendStatus::Sent)
			}
			Err(e) => {
				warn!("Failed to send email to {}: {}", message.to, e);
				Err(Error::ServiceUnavailable(format!("SMTP send failed: {}", e)))
			}
		}
	}
}

fn tls_parameters(host: &str) -> ClResult<TlsParameters> {
	TlsParameters::builder(host.to_string())
		.build()
		.map_err(|e| Error::ConfigError(format!("TLS configuration error: {}", e)))
}

/// Build a multipart (text + HTML) or text-only message
pub fn build_message(
	from_name: Option<&str>,
	from_address: &str,
	message: EmailMessage,
) -> ClResult<Message> {
	let from = match from_name {
		Some(name) => format!("{} <{}>", name, from_address),
		None => from_address.to_string(),
	};

	let builder = Message::builder()
		.from(from.parse().map_err(|_| Error::ValidationError("Invalid from email format".into()))?)
		.to(message
			.to
			.parse()
			.map_err(|_| Error::ValidationError("Invalid recipient email format".into()))?)
		.subject(message.subject);

	let email = if let Some(html_body) = message.html_body {
		builder.multipart(
			MultiPart::alternative()
				.singlepart(SinglePart::plain(message.text_body))
				.singlepart(SinglePart::html(html_body)),
		)
	} else {
		builder.singlepart(SinglePart::plain(message.text_body))
	};

	email.map_err(|e| Error::ValidationError(format!("Failed to build email: {}", e)))
}


// vim: ts=4

//! Reseller provisioning
//!
//! The workflow collects the submitted form, validates all of it, creates the
//! account with its GUI and reseller properties in one transaction and then
//! performs the post-commit steps (welcome mail, audit log).

use crate::account_form::AccountInput;
use crate::form::{FormData, ResellerInput, assign_ips};
use crate::limits::validate_limits;
use crate::prelude::*;
use hostpanel_core::audit;
use hostpanel_core::events::Event;
use hostpanel_core::php_ini::PhpIni;
use hostpanel_core::validation::ValidationErrors;
use hostpanel_email::{WelcomeMail, send_welcome_mail};
use hostpanel_types::account_adapter::{CreateReseller, GuiProps, ServerIp};
use hostpanel_types::identity::{AuthIdentity, USER_TYPE_RESELLER, UserIdentity};

/// Account type label used in the welcome mail
pub const RESELLER_LABEL: &str = "Reseller";

/// Collected and validated reseller form
#[derive(Debug)]
pub struct ResellerSubmission {
	pub input: ResellerInput,
	pub account: AccountInput,
	pub errors: ValidationErrors,
}

#[derive(Debug)]
pub enum AddResellerOutcome {
	Created(UserId),
	/// Nothing was written, the form has to be shown again
	Invalid(ResellerSubmission),
}

/// Create a reseller from a submitted form
///
/// Validation errors are accumulated and returned as `Invalid`. Storage
/// errors are returned as errors, in which case nothing is stored.
pub async fn add_reseller(
	app: &App,
	actor: &AuthIdentity,
	server_ips: &[ServerIp],
	form: &FormData,
) -> ClResult<AddResellerOutcome> {
	let input = ResellerInput::collect(form);
	let mut account = AccountInput::collect(form);
	let mut errors = ValidationErrors::new();

	// Login and personal data
	account.validate(&mut errors)?;
	if account.name_is_valid(&errors)
		&& app.account_adapter.user_name_exists(&account.admin_name).await?
	{
		errors.add("admin_name", "This user name is not available.");
	}

	// IP addresses
	let ips = assign_ips(&input.reseller_ips, server_ips);
	if ips.is_empty() {
		errors.add_message("You must assign at least one IP to this reseller.");
	}

	// Limits
	let limits = validate_limits(&input, &mut errors)?;
	let support_system = input.support_system(&mut errors);

	// PHP permissions
	let mut php_ini = PhpIni::new();
	php_ini.set_reseller_permissions(&input.php_ini_input(), &mut errors)?;

	if !errors.is_empty() {
		debug!(
			actor = actor.username(),
			errors = errors.len(),
			fields = ?errors.fields(),
			"Reseller form rejected"
		);
		return Ok(AddResellerOutcome::Invalid(ResellerSubmission { input, account, errors }));
	}

	let settings = app.settings();
	let php = php_ini.into_permissions();
	let data = CreateReseller {
		account: account.new_account(USER_TYPE_RESELLER, actor.user_id()),
		gui: GuiProps {
			lang: settings.get_str("user.initial_lang")?,
			layout: settings.get_str("user.initial_theme")?,
		},
		ips: &ips,
		limits: &limits,
		support_system,
		php: &php,
	};

	app.events.trigger(&Event::BeforeAddUser { user_data: &data.account })?;

	let user_id = app
		.account_adapter
		.create_reseller(&data, &|user_id| {
			app.events.trigger(&Event::AfterAddUser { user_id, user_data: &data.account })
		})
		.await?;

	info!(reseller = %account.admin_name, id = %user_id, actor = actor.username(), "Reseller added");

	// Post-commit steps are best-effort, the reseller exists already
	let mail = WelcomeMail {
		created_by: actor.user_id(),
		username: &account.admin_name,
		password: &account.admin_pass,
		email: &account.email,
		fname: data.account.fname,
		lname: data.account.lname,
		user_type: RESELLER_LABEL,
	};
	if let Err(err) = send_welcome_mail(app, &mail).await {
		warn!(reseller = %account.admin_name, error = %err, "Failed to send welcome mail");
	}

	audit::write_log(
		actor,
		&format!("The {} reseller has been added by {}", account.admin_name, actor.username()),
	);

	Ok(AddResellerOutcome::Created(user_id))
}

// vim: ts=4

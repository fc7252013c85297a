//! Admin page handlers

use axum::{
	Form,
	extract::State,
	response::{Html, IntoResponse, Redirect, Response},
};

use crate::account_form::AccountInput;
use crate::form::{FormData, ResellerInput};
use crate::page::{AdminPages, ResellerPage};
use crate::prelude::*;
use crate::reseller::{AddResellerOutcome, add_reseller};
use crate::RESELLER_ADD_PATH;
use hostpanel_core::extract::Auth;
use hostpanel_core::validation::ValidationErrors;
use hostpanel_types::account_adapter::ServerIp;
use hostpanel_types::identity::USER_TYPE_ADMIN;

/// Server IPs, `None` when there are none and the page can not be used
async fn server_ips(app: &App) -> ClResult<Option<Vec<ServerIp>>> {
	let server_ips = app.account_adapter.list_server_ips().await?;
	if server_ips.is_empty() {
		error!("Unable to get the IP address list, no server IPs are defined");
		return Ok(None);
	}
	Ok(Some(server_ips))
}

/// GET /admin/users - Account listing
pub async fn get_users(State(app): State<App>, auth: Auth) -> ClResult<Html<String>> {
	auth.require_type(USER_TYPE_ADMIN)?;

	let users = app.account_adapter.list_users().await?;
	let html = app.ext::<AdminPages>()?.render_users(&users, RESELLER_ADD_PATH)?;
	Ok(Html(html))
}

/// GET /admin/reseller/add - Empty reseller form
pub async fn get_reseller_add(State(app): State<App>, auth: Auth) -> ClResult<Response> {
	auth.require_type(USER_TYPE_ADMIN)?;

	let settings = app.settings();
	let users_url = settings.get_str("panel.users_url")?;
	let Some(server_ips) = server_ips(&app).await? else {
		return Ok(Redirect::to(users_url).into_response());
	};

	let html = app.ext::<AdminPages>()?.render_reseller_add(&ResellerPage {
		action: RESELLER_ADD_PATH,
		users_url,
		server_ips: &server_ips,
		input: &ResellerInput::default(),
		account: &AccountInput::default(),
		errors: &ValidationErrors::new(),
	})?;
	Ok(Html(html).into_response())
}

/// POST /admin/reseller/add - Create a reseller
pub async fn post_reseller_add(
	State(app): State<App>,
	auth: Auth,
	Form(fields): Form<Vec<(String, String)>>,
) -> ClResult<Response> {
	auth.require_type(USER_TYPE_ADMIN)?;

	let settings = app.settings();
	let users_url = settings.get_str("panel.users_url")?;
	let Some(server_ips) = server_ips(&app).await? else {
		return Ok(Redirect::to(users_url).into_response());
	};

	let form = FormData::from(fields);
	match add_reseller(&app, &auth.0, &server_ips, &form).await? {
		AddResellerOutcome::Created(_) => Ok(Redirect::to(users_url).into_response()),
		AddResellerOutcome::Invalid(submission) => {
			let html = app.ext::<AdminPages>()?.render_reseller_add(&ResellerPage {
				action: RESELLER_ADD_PATH,
				users_url,
				server_ips: &server_ips,
				input: &submission.input,
				account: &submission.account,
				errors: &submission.errors,
			})?;
			Ok(Html(html).into_response())
		}
	}
}

// vim: ts=4

//! Administrator pages: reseller provisioning and the account listing

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod account_form;
pub mod form;
pub mod handler;
pub mod limits;
pub mod page;
pub mod reseller;

mod prelude;

use axum::{Router, routing::get};

use crate::prelude::*;

pub const USERS_PATH: &str = "/admin/users";
pub const RESELLER_ADD_PATH: &str = "/admin/reseller/add";

/// Admin routes, to be wrapped by the identity middleware
pub fn router() -> Router<App> {
	Router::new()
		.route(USERS_PATH, get(handler::get_users))
		.route(
			RESELLER_ADD_PATH,
			get(handler::get_reseller_add).post(handler::post_reseller_add),
		)
}

// vim: ts=4

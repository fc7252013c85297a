//! Custom extractors for hostpanel request data

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::prelude::*;
use hostpanel_types::identity::{AuthIdentity, UserIdentity};

// Auth //
//******//
#[derive(Debug, Clone)]
pub struct Auth(pub AuthIdentity);

impl Auth {
	/// Fail with `PermissionDenied` unless the effective identity has the given type
	pub fn require_type(&self, typ: &str) -> ClResult<()> {
		if self.0.user_type() == typ {
			Ok(())
		} else {
			debug!(
				user = self.0.username(),
				required = typ,
				actual = self.0.user_type(),
				"Account type not allowed"
			);
			Err(Error::PermissionDenied)
		}
	}
}

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(auth) = parts.extensions.get::<Auth>().cloned() {
			Ok(auth)
		} else {
			Err(Error::PermissionDenied)
		}
	}
}

// vim: ts=4

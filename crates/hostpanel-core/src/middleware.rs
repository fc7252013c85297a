//! Identity middleware
//!
//! The panel sits behind a trusted reverse proxy that authenticates the user
//! and passes the account name in `X-Auth-User`. While the user has switched
//! into another account, the proxy also passes that account's name in
//! `X-Auth-Su-User`.

use axum::{
	body::Body,
	extract::State,
	http::{Request, response::Response},
	middleware::Next,
};
use std::sync::Arc;

use crate::extract::Auth;
use crate::prelude::*;
use hostpanel_types::identity::{
	AuthIdentity, Identity, SuIdentity, USER_TYPE_ADMIN, USER_TYPE_RESELLER, UserIdentity,
};

pub const HEADER_AUTH_USER: &str = "x-auth-user";
pub const HEADER_AUTH_SU_USER: &str = "x-auth-su-user";

fn header_value(req: &Request<Body>, name: &str) -> Option<String> {
	req.headers()
		.get(name)
		.and_then(|h| h.to_str().ok())
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.map(ToString::to_string)
}

async fn load_identity(app: &App, name: &str) -> ClResult<Identity> {
	app.account_adapter.read_identity_by_name(name).await.map_err(|err| match err {
		Error::NotFound => {
			warn!(user = name, "Unknown account in auth header");
			Error::Unauthorized
		}
		err => err,
	})
}

/// Whether `real` may act as `target`
///
/// Administrators may switch into any non-administrator account, resellers
/// only into accounts they created.
pub fn can_switch_to(real: &Identity, target: &Identity) -> bool {
	match real.user_type() {
		USER_TYPE_ADMIN => target.user_type() != USER_TYPE_ADMIN,
		USER_TYPE_RESELLER => target.user_created_by() == real.user_id(),
		_ => false,
	}
}

pub async fn require_auth(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> ClResult<Response<Body>> {
	let user_name = header_value(&req, HEADER_AUTH_USER).ok_or(Error::Unauthorized)?;
	let identity = load_identity(&app, &user_name).await?;

	let auth = match header_value(&req, HEADER_AUTH_SU_USER) {
		None => AuthIdentity::User(Arc::new(identity)),
		Some(su_name) => {
			let target = load_identity(&app, &su_name).await?;
			if !can_switch_to(&identity, &target) {
				warn!(user = %user_name, target = %su_name, "Account switch denied");
				return Err(Error::PermissionDenied);
			}
			AuthIdentity::Su(SuIdentity::new(Arc::new(identity), Arc::new(target)))
		}
	};

	req.extensions_mut().insert(Auth(auth));

	Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::app::{AppBuilder, AppOpts};
	use async_trait::async_trait;
	use axum::{Router, http::StatusCode, routing::get};
	use hostpanel_types::account_adapter::{
		AccountAdapter, AfterInsertFn, CreateReseller, NewAccount, ResellerProps, ServerIp,
		UserGuiProps, UserListItem,
	};
	use hostpanel_types::identity::USER_TYPE_USER;
	use std::collections::HashMap;
	use std::path::Path;
	use tower::ServiceExt;

	#[derive(Debug)]
	struct MockAdapter {
		identities: Vec<Identity>,
	}

	#[async_trait]
	impl AccountAdapter for MockAdapter {
		async fn list_server_ips(&self) -> ClResult<Vec<ServerIp>> {
			Ok(Vec::new())
		}
		async fn create_server_ip(&self, _ip_number: &str) -> ClResult<i64> {
			Err(Error::DbError)
		}
		async fn read_identity(&self, user_id: UserId) -> ClResult<Identity> {
			self.identities.iter().find(|i| i.user_id == user_id).cloned().ok_or(Error::NotFound)
		}
		async fn read_identity_by_name(&self, admin_name: &str) -> ClResult<Identity> {
			self.identities
				.iter()
				.find(|i| &*i.username == admin_name)
				.cloned()
				.ok_or(Error::NotFound)
		}
		async fn user_name_exists(&self, admin_name: &str) -> ClResult<bool> {
			Ok(self.identities.iter().any(|i| &*i.username == admin_name))
		}
		async fn list_users(&self) -> ClResult<Vec<UserListItem>> {
			Ok(Vec::new())
		}
		async fn create_account(&self, _account: &NewAccount<'_>) -> ClResult<UserId> {
			Err(Error::DbError)
		}
		async fn create_reseller(
			&self,
			_data: &CreateReseller<'_>,
			_after_insert: &AfterInsertFn<'_>,
		) -> ClResult<UserId> {
			Err(Error::DbError)
		}
		async fn read_gui_props(&self, _user_id: UserId) -> ClResult<UserGuiProps> {
			Err(Error::NotFound)
		}
		async fn read_reseller_props(&self, _reseller_id: UserId) -> ClResult<ResellerProps> {
			Err(Error::NotFound)
		}
		async fn list_settings(&self) -> ClResult<HashMap<String, serde_json::Value>> {
			Ok(HashMap::new())
		}
		async fn update_setting(
			&self,
			_name: &str,
			_value: Option<serde_json::Value>,
		) -> ClResult<()> {
			Ok(())
		}
	}

	fn identity(id: i64, name: &str, typ: &str, created_by: i64) -> Identity {
		Identity {
			user_id: UserId(id),
			username: name.into(),
			password_hash: "".into(),
			email: format!("{}@example.com", name).into(),
			typ: typ.into(),
			created_by: UserId(created_by),
		}
	}

	async fn router() -> Router {
		let adapter = MockAdapter {
			identities: vec![
				identity(1, "admin", USER_TYPE_ADMIN, 0),
				identity(2, "reseller1", USER_TYPE_RESELLER, 1),
				identity(3, "customer1", USER_TYPE_USER, 2),
				identity(4, "customer2", USER_TYPE_USER, 1),
			],
		};
		let opts = AppOpts { listen: "127.0.0.1:0".into(), db_dir: Path::new(".").into(), template_dir: None };
		let app = AppBuilder::new(opts).account_adapter(Arc::new(adapter)).build().await.unwrap();

		Router::new()
			.route(
				"/whoami",
				get(|Auth(auth): Auth| async move {
					format!("{}/{}", auth.real().username(), auth.username())
				}),
			)
			.route_layer(axum::middleware::from_fn_with_state(app.clone(), require_auth))
			.with_state(app)
	}

	async fn call(headers: &[(&str, &str)]) -> (StatusCode, String) {
		let mut req = Request::builder().uri("/whoami");
		for (name, value) in headers {
			req = req.header(*name, *value);
		}
		let res = router().await.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
		let status = res.status();
		let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
		(status, String::from_utf8_lossy(&body).into_owned())
	}

	#[tokio::test]
	async fn test_missing_header_is_unauthorized() {
		let (status, _) = call(&[]).await;
		assert_eq!(status, StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn test_unknown_user_is_unauthorized() {
		let (status, _) = call(&[(HEADER_AUTH_USER, "nobody")]).await;
		assert_eq!(status, StatusCode::UNAUTHORIZED);
	}

	#[tokio::test]
	async fn test_plain_identity() {
		let (status, body) = call(&[(HEADER_AUTH_USER, "admin")]).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, "admin/admin");
	}

	#[tokio::test]
	async fn test_switched_identity() {
		let (status, body) =
			call(&[(HEADER_AUTH_USER, "admin"), (HEADER_AUTH_SU_USER, "reseller1")]).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, "admin/reseller1");
	}

	#[tokio::test]
	async fn test_reseller_switch_limited_to_own_customers() {
		let (status, body) =
			call(&[(HEADER_AUTH_USER, "reseller1"), (HEADER_AUTH_SU_USER, "customer1")]).await;
		assert_eq!(status, StatusCode::OK);
		assert_eq!(body, "reseller1/customer1");

		let (status, _) =
			call(&[(HEADER_AUTH_USER, "reseller1"), (HEADER_AUTH_SU_USER, "customer2")]).await;
		assert_eq!(status, StatusCode::FORBIDDEN);
	}
}

// vim: ts=4

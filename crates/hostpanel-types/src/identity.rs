//! Identity of an authenticated panel user
//!
//! `UserIdentity` is the capability every identity exposes to session and
//! handler code. `SuIdentity` is used while an administrator (or reseller)
//! has switched into another account: it answers the usual accessors for the
//! account being acted as, and the `su_*` accessors for the principal who is
//! really logged in.

use serde::Serialize;
use std::sync::Arc;

use crate::types::UserId;

/// Account types stored in `admin.admin_type`
pub const USER_TYPE_ADMIN: &str = "admin";
pub const USER_TYPE_RESELLER: &str = "reseller";
pub const USER_TYPE_USER: &str = "user";

pub trait UserIdentity {
	fn user_id(&self) -> UserId;
	fn username(&self) -> &str;
	/// Password hash (never the plain password)
	fn user_password(&self) -> &str;
	fn user_email(&self) -> &str;
	fn user_type(&self) -> &str;
	fn user_created_by(&self) -> UserId;
}

/// Identity record as read from the `admin` table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
	pub user_id: UserId,
	pub username: Box<str>,
	#[serde(skip)]
	pub password_hash: Box<str>,
	pub email: Box<str>,
	pub typ: Box<str>,
	pub created_by: UserId,
}

impl UserIdentity for Identity {
	fn user_id(&self) -> UserId {
		self.user_id
	}
	fn username(&self) -> &str {
		&self.username
	}
	fn user_password(&self) -> &str {
		&self.password_hash
	}
	fn user_email(&self) -> &str {
		&self.email
	}
	fn user_type(&self) -> &str {
		&self.typ
	}
	fn user_created_by(&self) -> UserId {
		self.created_by
	}
}

/// Switched-user identity
#[derive(Debug)]
pub struct SuIdentity<I: UserIdentity = Identity> {
	su_identity: Arc<I>,
	user_identity: Arc<I>,
}

// Manual impl: cloning only clones the Arcs, so `I: Clone` is not required
impl<I: UserIdentity> Clone for SuIdentity<I> {
	fn clone(&self) -> Self {
		Self { su_identity: self.su_identity.clone(), user_identity: self.user_identity.clone() }
	}
}

impl<I: UserIdentity> SuIdentity<I> {
	pub fn new(su_identity: Arc<I>, user_identity: Arc<I>) -> Self {
		Self { su_identity, user_identity }
	}

	pub fn su_user_id(&self) -> UserId {
		self.su_identity.user_id()
	}
	pub fn su_username(&self) -> &str {
		self.su_identity.username()
	}
	pub fn su_user_password(&self) -> &str {
		self.su_identity.user_password()
	}
	pub fn su_user_email(&self) -> &str {
		self.su_identity.user_email()
	}
	pub fn su_user_type(&self) -> &str {
		self.su_identity.user_type()
	}
	pub fn su_user_created_by(&self) -> UserId {
		self.su_identity.user_created_by()
	}

	pub fn su_identity(&self) -> &Arc<I> {
		&self.su_identity
	}
	pub fn user_identity(&self) -> &Arc<I> {
		&self.user_identity
	}
}

impl<I: UserIdentity> UserIdentity for SuIdentity<I> {
	fn user_id(&self) -> UserId {
		self.user_identity.user_id()
	}
	fn username(&self) -> &str {
		self.user_identity.username()
	}
	fn user_password(&self) -> &str {
		self.user_identity.user_password()
	}
	fn user_email(&self) -> &str {
		self.user_identity.user_email()
	}
	fn user_type(&self) -> &str {
		self.user_identity.user_type()
	}
	fn user_created_by(&self) -> UserId {
		self.user_identity.user_created_by()
	}
}

/// Identity attached to an authenticated request
#[derive(Debug, Clone)]
pub enum AuthIdentity {
	User(Arc<Identity>),
	Su(SuIdentity),
}

impl AuthIdentity {
	pub fn is_su(&self) -> bool {
		matches!(self, AuthIdentity::Su(_))
	}

	/// The principal who is really logged in
	pub fn real(&self) -> &Identity {
		match self {
			AuthIdentity::User(identity) => identity,
			AuthIdentity::Su(su) => su.su_identity(),
		}
	}

	fn effective(&self) -> &Identity {
		match self {
			AuthIdentity::User(identity) => identity,
			AuthIdentity::Su(su) => su.user_identity(),
		}
	}
}

impl UserIdentity for AuthIdentity {
	fn user_id(&self) -> UserId {
		self.effective().user_id()
	}
	fn username(&self) -> &str {
		self.effective().username()
	}
	fn user_password(&self) -> &str {
		self.effective().user_password()
	}
	fn user_email(&self) -> &str {
		self.effective().user_email()
	}
	fn user_type(&self) -> &str {
		self.effective().user_type()
	}
	fn user_created_by(&self) -> UserId {
		self.effective().user_created_by()
	}
}


// vim: ts=4

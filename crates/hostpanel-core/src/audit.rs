//! Audit log
//!
//! Entries are `info` events with the `audit` target, so the subscriber can
//! route them separately (`RUST_LOG=audit=info`).

use hostpanel_types::identity::{AuthIdentity, UserIdentity};

pub const TARGET: &str = "audit";

/// Record an action performed by `actor`
pub fn write_log(actor: &AuthIdentity, message: &str) {
	match actor {
		AuthIdentity::User(identity) => {
			tracing::info!(target: TARGET, actor = identity.username(), "{}", message);
		}
		AuthIdentity::Su(su) => {
			tracing::info!(
				target: TARGET,
				actor = su.username(),
				su_actor = su.su_username(),
				"{}",
				message
			);
		}
	}
}

// vim: ts=4

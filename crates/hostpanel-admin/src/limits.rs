//! Reseller limit validation
//!
//! A limit is a non-negative integer where `0` means unlimited. Most limits
//! also accept `-1`, which disables the feature altogether.

use crate::form::ResellerInput;
use crate::prelude::*;
use hostpanel_core::validation::{ValidationErrors, is_unsigned_int};
use hostpanel_types::account_adapter::ResellerLimits;

/// The disabled sentinel
pub const DISABLED: i64 = -1;

#[derive(Debug, Clone, Copy)]
pub struct LimitField {
	pub name: &'static str,
	/// Used in error messages
	pub label: &'static str,
	/// Shown on the form
	pub title: &'static str,
	pub allow_disabled: bool,
}

pub const LIMIT_FIELDS: [LimitField; 9] = [
	LimitField { name: "max_dmn_cnt", label: "domain", title: "Domains limit", allow_disabled: false },
	LimitField {
		name: "max_sub_cnt",
		label: "subdomains",
		title: "Subdomains limit",
		allow_disabled: true,
	},
	LimitField {
		name: "max_als_cnt",
		label: "domain aliases",
		title: "Domain aliases limit",
		allow_disabled: true,
	},
	LimitField {
		name: "max_mail_cnt",
		label: "mail accounts",
		title: "Mail accounts limit",
		allow_disabled: true,
	},
	LimitField {
		name: "max_ftp_cnt",
		label: "Ftp accounts",
		title: "FTP accounts limit",
		allow_disabled: true,
	},
	LimitField {
		name: "max_sql_db_cnt",
		label: "SQL databases",
		title: "SQL databases limit",
		allow_disabled: true,
	},
	LimitField {
		name: "max_sql_user_cnt",
		label: "SQL users",
		title: "SQL users limit",
		allow_disabled: true,
	},
	LimitField {
		name: "max_traff_amnt",
		label: "traffic",
		title: "Monthly traffic limit [MiB]",
		allow_disabled: false,
	},
	LimitField {
		name: "max_disk_amnt",
		label: "Disk space",
		title: "Disk space limit [MiB]",
		allow_disabled: false,
	},
];

/// Parsed limit, `None` when the value is not acceptable
pub fn check_limit(value: &str, allow_disabled: bool) -> ClResult<Option<i64>> {
	if allow_disabled && value == "-1" {
		return Ok(Some(DISABLED));
	}
	if !is_unsigned_int(value)? {
		return Ok(None);
	}
	Ok(value.parse().ok())
}

/// Validate every limit of the form
///
/// Invalid limits are reported on their own field and left at `0` in the
/// result. The SQL database and SQL user limits must both be disabled or
/// both enabled; when only one is disabled the other one is flagged.
pub fn validate_limits(
	input: &ResellerInput,
	errors: &mut ValidationErrors,
) -> ClResult<ResellerLimits> {
	let mut values = [None; LIMIT_FIELDS.len()];
	for (field, value) in LIMIT_FIELDS.iter().zip(values.iter_mut()) {
		let raw = input.limit(field.name).unwrap_or_default();
		*value = check_limit(raw, field.allow_disabled)?;
		if value.is_none() {
			errors.add(field.name, format!("Incorrect limit for {}.", field.label));
		}
	}

	let [dmn, sub, als, mail, ftp, sql_db, sql_user, traff, disk] = values;

	match (sql_db, sql_user) {
		(Some(DISABLED), Some(user)) if user != DISABLED => errors.add(
			"max_sql_user_cnt",
			"SQL database limit is disabled but SQL user limit is not.",
		),
		(Some(db), Some(DISABLED)) if db != DISABLED => errors.add(
			"max_sql_db_cnt",
			"SQL user limit is disabled but SQL database limit is not.",
		),
		_ => {}
	}

	Ok(ResellerLimits {
		max_dmn_cnt: dmn.unwrap_or_default(),
		max_sub_cnt: sub.unwrap_or_default(),
		max_als_cnt: als.unwrap_or_default(),
		max_mail_cnt: mail.unwrap_or_default(),
		max_ftp_cnt: ftp.unwrap_or_default(),
		max_sql_db_cnt: sql_db.unwrap_or_default(),
		max_sql_user_cnt: sql_user.unwrap_or_default(),
		max_traff_amnt: traff.unwrap_or_default(),
		max_disk_amnt: disk.unwrap_or_default(),
	})
}


// vim: ts=4

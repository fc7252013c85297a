//! Password hashing

use hostpanel_types::prelude::*;
use hostpanel_types::worker::WorkerPool;

const BCRYPT_COST: u32 = 10;

fn generate_password_hash_sync(password: &str) -> ClResult<Box<str>> {
	let hash = bcrypt::hash(password, BCRYPT_COST).map_err(|err| {
		warn!("bcrypt: {}", err);
		Error::Internal("password hashing failed".into())
	})?;

	Ok(hash.into())
}

/// Hash a password on the worker pool, bcrypt is too slow for the async runtime
pub(crate) async fn generate_password_hash(
	worker: &WorkerPool,
	password: Box<str>,
) -> ClResult<Box<str>> {
	worker.try_run_immed(move || generate_password_hash_sync(&password)).await
}

#[cfg(test)]
pub(crate) fn check_password(password: &str, password_hash: &str) -> bool {
	bcrypt::verify(password, password_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_hash_and_verify() {
		let worker = WorkerPool::new(1, 0);
		let hash = generate_password_hash(&worker, "secret123".into()).await.unwrap();

		assert!(hash.starts_with("$2"));
		assert!(check_password("secret123", &hash));
		assert!(!check_password("secret124", &hash));
	}
}

// vim: ts=4

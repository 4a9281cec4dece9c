//! Token cache contract and the built-in bounded in-memory implementation.

pub mod memory;

pub use memory::MemoryTokenCache;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TenantId, Username},
};

/// Boxed future returned by [`TokenCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Expiry-aware token storage keyed by (tenant, user).
///
/// Implementations own their synchronization: concurrent `put`/`get` calls on the same or
/// different keys must neither corrupt state nor lose updates. A plain miss or an expired entry is
/// `Ok(None)`; [`CacheError`] is reserved for genuine backend faults.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Inserts or fully replaces the entry for `(tenant, user)`.
	fn put<'a>(
		&'a self,
		tenant: &'a TenantId,
		user: &'a Username,
		token: AccessToken,
		expires_at: OffsetDateTime,
	) -> CacheFuture<'a, ()>;

	/// Returns the cached token if present and not yet expired.
	fn get<'a>(
		&'a self,
		tenant: &'a TenantId,
		user: &'a Username,
	) -> CacheFuture<'a, Option<AccessToken>>;
}

/// Error type produced by [`TokenCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Unique key identifying a cached token.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
	/// Tenant component.
	pub tenant: TenantId,
	/// Username component.
	pub user: Username,
}
impl CacheKey {
	/// Builds a key for the provided tenant and user.
	pub fn new(tenant: &TenantId, user: &Username) -> Self {
		Self { tenant: tenant.clone(), user: user.clone() }
	}
}

/// Cached token plus its absolute expiry instant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
	/// Token value.
	pub token: AccessToken,
	/// Instant from which the entry is logically dead.
	pub expires_at: OffsetDateTime,
}
impl CacheEntry {
	/// Creates a new entry.
	pub fn new(token: AccessToken, expires_at: OffsetDateTime) -> Self {
		Self { token, expires_at }
	}

	/// Returns `true` once `instant` has reached the expiry instant.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		instant >= self.expires_at
	}

	/// Expiry instant as milliseconds since the Unix epoch.
	pub fn expires_at_millis(&self) -> i64 {
		epoch_millis(self.expires_at)
	}
}

/// Converts an instant into milliseconds since the Unix epoch.
pub fn epoch_millis(instant: OffsetDateTime) -> i64 {
	i64::try_from(instant.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn cache_error_converts_into_access_error_with_source() {
		let cache_error = CacheError::Backend { message: "disk unreachable".into() };
		let error: Error = cache_error.clone().into();

		assert!(matches!(error, Error::CacheAccess(_)));
		assert!(error.to_string().contains("disk unreachable"));

		let source = StdError::source(&error)
			.expect("Client error should expose the original cache error as its source.");

		assert_eq!(source.to_string(), cache_error.to_string());
	}

	#[test]
	fn entry_expiry_is_inclusive() {
		let expires_at = macros::datetime!(2025-11-10 12:00 UTC);
		let entry = CacheEntry::new(AccessToken::new("t"), expires_at);

		assert!(!entry.is_expired_at(expires_at - Duration::milliseconds(1)));
		assert!(entry.is_expired_at(expires_at));
		assert_eq!(entry.expires_at_millis(), 1_762_776_000_000);
	}

	#[test]
	fn cache_key_equality_is_exact_on_both_fields() {
		let tenant = TenantId::new("t1").expect("Tenant fixture should be valid.");
		let user_a = Username::new("u1").expect("First user fixture should be valid.");
		let user_b = Username::new("U1").expect("Second user fixture should be valid.");

		assert_eq!(CacheKey::new(&tenant, &user_a), CacheKey::new(&tenant, &user_a));
		assert_ne!(CacheKey::new(&tenant, &user_a), CacheKey::new(&tenant, &user_b));
	}
}

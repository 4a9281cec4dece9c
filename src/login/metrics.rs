// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing how a client resolved its tokens.
#[derive(Debug, Default)]
pub struct AcquireMetrics {
	cache_hits: AtomicU64,
	credential_lookups: AtomicU64,
	expiry_logins: AtomicU64,
	legacy_logins: AtomicU64,
	failures: AtomicU64,
}
impl AcquireMetrics {
	/// Calls answered from the cache.
	pub fn cache_hits(&self) -> u64 {
		self.cache_hits.load(Ordering::Relaxed)
	}

	/// Times the credential provider was consulted.
	pub fn credential_lookups(&self) -> u64 {
		self.credential_lookups.load(Ordering::Relaxed)
	}

	/// Tokens issued by the expiry endpoint.
	pub fn expiry_logins(&self) -> u64 {
		self.expiry_logins.load(Ordering::Relaxed)
	}

	/// Successful legacy logins, with or without a token header.
	pub fn legacy_logins(&self) -> u64 {
		self.legacy_logins.load(Ordering::Relaxed)
	}

	/// Calls that returned an error.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_cache_hit(&self) {
		self.cache_hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_credential_lookup(&self) {
		self.credential_lookups.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_expiry_login(&self) {
		self.expiry_logins.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_legacy_login(&self) {
		self.legacy_logins.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}

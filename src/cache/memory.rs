//! Bounded, thread-safe in-memory [`TokenCache`] with least-recently-used eviction.

// std
use std::num::NonZeroUsize;
// crates.io
use lru::LruCache;
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TenantId, Username},
	cache::{CacheEntry, CacheFuture, CacheKey, TokenCache},
	error::ConfigError,
};

/// Thread-safe token cache holding at most `capacity` (tenant, user) entries.
///
/// Clones share the same underlying state. Both `put` and a live `get` mark an entry as recently
/// used; a full cache evicts the least recently used entry regardless of its remaining lifetime.
#[derive(Clone)]
pub struct MemoryTokenCache {
	state: Arc<Mutex<LruCache<CacheKey, CacheEntry>>>,
	capacity: NonZeroUsize,
}
impl MemoryTokenCache {
	/// Creates a cache bounded to `capacity` entries.
	pub fn new(capacity: usize) -> Result<Self, ConfigError> {
		let capacity = NonZeroUsize::new(capacity).ok_or(ConfigError::ZeroCacheCapacity)?;

		Ok(Self::with_capacity(capacity))
	}

	/// Creates a cache from an already validated capacity.
	pub fn with_capacity(capacity: NonZeroUsize) -> Self {
		Self { state: Arc::new(Mutex::new(LruCache::new(capacity))), capacity }
	}

	/// Maximum number of entries retained simultaneously.
	pub fn capacity(&self) -> usize {
		self.capacity.get()
	}

	/// Number of physically present entries, including dead ones not yet purged.
	pub fn len(&self) -> usize {
		self.state.lock().len()
	}

	/// Returns `true` when no entries are present.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Drops every entry whose expiry has passed, returning how many were removed.
	pub fn purge_expired(&self) -> usize {
		let now = OffsetDateTime::now_utc();
		let mut state = self.state.lock();
		let dead = state
			.iter()
			.filter(|(_, entry)| entry.is_expired_at(now))
			.map(|(key, _)| key.clone())
			.collect::<Vec<_>>();

		for key in &dead {
			state.pop(key);
		}

		dead.len()
	}

	fn put_now(&self, key: CacheKey, entry: CacheEntry) {
		// Replacing an existing key promotes it; a new key at capacity evicts the oldest entry.
		self.state.lock().put(key, entry);
	}

	fn get_now(&self, key: &CacheKey, now: OffsetDateTime) -> Option<AccessToken> {
		let mut state = self.state.lock();

		if state.peek(key)?.is_expired_at(now) {
			state.pop(key);

			return None;
		}

		state.get(key).map(|entry| entry.token.clone())
	}
}
impl Debug for MemoryTokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MemoryTokenCache")
			.field("capacity", &self.capacity)
			.field("len", &self.len())
			.finish()
	}
}
impl TokenCache for MemoryTokenCache {
	fn put<'a>(
		&'a self,
		tenant: &'a TenantId,
		user: &'a Username,
		token: AccessToken,
		expires_at: OffsetDateTime,
	) -> CacheFuture<'a, ()> {
		let key = CacheKey::new(tenant, user);

		Box::pin(async move {
			self.put_now(key, CacheEntry::new(token, expires_at));

			Ok(())
		})
	}

	fn get<'a>(
		&'a self,
		tenant: &'a TenantId,
		user: &'a Username,
	) -> CacheFuture<'a, Option<AccessToken>> {
		let key = CacheKey::new(tenant, user);

		Box::pin(async move { Ok(self.get_now(&key, OffsetDateTime::now_utc())) })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn tenant(value: &str) -> TenantId {
		TenantId::new(value).expect("Tenant fixture should be valid.")
	}

	fn user(value: &str) -> Username {
		Username::new(value).expect("User fixture should be valid.")
	}

	fn later() -> OffsetDateTime {
		OffsetDateTime::now_utc() + Duration::hours(1)
	}

	#[test]
	fn zero_capacity_is_rejected() {
		assert!(matches!(MemoryTokenCache::new(0), Err(ConfigError::ZeroCacheCapacity)));
		assert_eq!(MemoryTokenCache::new(3).expect("Capacity 3 should be valid.").capacity(), 3);
	}

	#[tokio::test]
	async fn get_after_put_returns_value() {
		let cache = MemoryTokenCache::new(4).expect("Cache should build.");
		let (t, u) = (tenant("t1"), user("u1"));

		cache.put(&t, &u, AccessToken::new("abc"), later()).await.expect("Put should succeed.");

		let hit = cache.get(&t, &u).await.expect("Get should succeed.");

		assert_eq!(hit.as_ref().map(AccessToken::expose), Some("abc"));
		assert!(
			cache.get(&t, &user("u2")).await.expect("Get should succeed.").is_none(),
			"Different user must miss."
		);
	}

	#[tokio::test]
	async fn expired_entries_miss_and_are_removed() {
		let cache = MemoryTokenCache::new(4).expect("Cache should build.");
		let (t, u) = (tenant("t1"), user("u1"));
		let now = OffsetDateTime::now_utc();

		cache.put(&t, &u, AccessToken::new("stale"), now).await.expect("Put should succeed.");

		assert_eq!(cache.len(), 1);
		assert!(cache.get(&t, &u).await.expect("Get should succeed.").is_none());
		assert_eq!(cache.len(), 0, "Dead entry should be dropped on read.");
	}

	#[tokio::test]
	async fn put_replaces_unexpired_value() {
		let cache = MemoryTokenCache::new(1).expect("Cache should build.");
		let (t, u) = (tenant("t1"), user("u1"));

		cache.put(&t, &u, AccessToken::new("old"), later()).await.expect("Put should succeed.");
		cache.put(&t, &u, AccessToken::new("new"), later()).await.expect("Put should succeed.");

		let hit = cache.get(&t, &u).await.expect("Get should succeed.");

		assert_eq!(hit.as_ref().map(AccessToken::expose), Some("new"));
		assert_eq!(cache.len(), 1);
	}

	#[tokio::test]
	async fn replacing_an_entry_marks_it_recent() {
		let cache = MemoryTokenCache::new(2).expect("Cache should build.");
		let t = tenant("t1");
		let (a, b, c) = (user("a"), user("b"), user("c"));

		cache.put(&t, &a, AccessToken::new("A1"), later()).await.expect("Put should succeed.");
		cache.put(&t, &b, AccessToken::new("B"), later()).await.expect("Put should succeed.");
		cache.put(&t, &a, AccessToken::new("A2"), later()).await.expect("Put should succeed.");
		cache.put(&t, &c, AccessToken::new("C"), later()).await.expect("Put should succeed.");

		let hit = cache.get(&t, &a).await.expect("Get should succeed.");

		assert_eq!(hit.as_ref().map(AccessToken::expose), Some("A2"));
		assert!(cache.get(&t, &b).await.expect("Get should succeed.").is_none());
	}

	#[tokio::test]
	async fn overflow_evicts_least_recently_touched() {
		let cache = MemoryTokenCache::new(2).expect("Cache should build.");
		let t = tenant("t1");
		let (a, b, c) = (user("a"), user("b"), user("c"));

		cache.put(&t, &a, AccessToken::new("A"), later()).await.expect("Put should succeed.");
		cache.put(&t, &b, AccessToken::new("B"), later()).await.expect("Put should succeed.");
		// Reading `a` makes `b` the eviction candidate.
		cache.get(&t, &a).await.expect("Get should succeed.");
		cache.put(&t, &c, AccessToken::new("C"), later()).await.expect("Put should succeed.");

		assert_eq!(cache.len(), 2);
		assert!(cache.get(&t, &b).await.expect("Get should succeed.").is_none());
		assert!(cache.get(&t, &a).await.expect("Get should succeed.").is_some());
		assert!(cache.get(&t, &c).await.expect("Get should succeed.").is_some());
	}

	#[tokio::test]
	async fn eviction_ignores_remaining_ttl() {
		let cache = MemoryTokenCache::new(2).expect("Cache should build.");
		let t = tenant("t1");
		let (a, b, c) = (user("a"), user("b"), user("c"));
		let now = OffsetDateTime::now_utc();

		cache
			.put(&t, &a, AccessToken::new("long"), now + Duration::days(1))
			.await
			.expect("Put should succeed.");
		cache
			.put(&t, &b, AccessToken::new("short"), now + Duration::minutes(1))
			.await
			.expect("Put should succeed.");
		cache.put(&t, &c, AccessToken::new("C"), later()).await.expect("Put should succeed.");

		assert!(cache.get(&t, &a).await.expect("Get should succeed.").is_none());
		assert!(cache.get(&t, &b).await.expect("Get should succeed.").is_some());
	}

	#[tokio::test]
	async fn purge_expired_counts_removed_entries() {
		let cache = MemoryTokenCache::new(4).expect("Cache should build.");
		let t = tenant("t1");
		let now = OffsetDateTime::now_utc();

		cache.put(&t, &user("a"), AccessToken::new("A"), now).await.expect("Put should succeed.");
		cache
			.put(&t, &user("b"), AccessToken::new("B"), later())
			.await
			.expect("Put should succeed.");

		assert_eq!(cache.purge_expired(), 1);
		assert_eq!(cache.len(), 1);
	}

	#[tokio::test]
	async fn concurrent_puts_never_exceed_capacity() {
		let cache = MemoryTokenCache::new(8).expect("Cache should build.");
		let tasks = (0..64)
			.map(|i| {
				let cache = cache.clone();

				tokio::spawn(async move {
					let t = tenant("shared");
					let u = user(&format!("user-{i}"));

					cache
						.put(&t, &u, AccessToken::new(format!("token-{i}")), later())
						.await
						.expect("Concurrent put should succeed.");
					cache.get(&t, &u).await.expect("Concurrent get should succeed.");
				})
			})
			.collect::<Vec<_>>();

		for task in tasks {
			task.await.expect("Cache task should not panic.");
		}

		assert_eq!(cache.len(), 8);
	}
}

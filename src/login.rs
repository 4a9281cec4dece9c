//! Token acquisition against an Okapi login service.
//!
//! [`TokenClient`] serves tokens from a shared [`TokenCache`] and, on a miss, logs in through the
//! cookie-issuing expiry endpoint, falling back to the legacy endpoint only on a 404 or a 201
//! without the access cookie. Credentials are resolved lazily, right before the first network
//! call. A per-client login guard keeps concurrent misses from stampeding the login service.

pub mod cookie;
pub mod response;

mod acquire;
mod metrics;

pub use cookie::{AccessCookie, extract_access_token};
pub use metrics::AcquireMetrics;
pub use response::{ExpiryOutcome, classify_expiry_response, classify_legacy_response};

// self
use crate::{
	_prelude::*,
	auth::{CredentialProvider, TenantId, Username},
	cache::TokenCache,
	endpoint::AuthEndpoint,
	http::LoginHttpClient,
	obs::Telemetry,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;

#[cfg(feature = "reqwest")]
/// Token client specialized for the crate's default reqwest transport.
pub type ReqwestTokenClient = TokenClient<ReqwestHttpClient>;

/// Acquires and caches access tokens for one (tenant, user) pair.
///
/// Clones share the transport, cache, credential provider, metrics, and login guard.
pub struct TokenClient<C>
where
	C: ?Sized + LoginHttpClient,
{
	/// HTTP client used for every login request.
	pub http_client: Arc<C>,
	/// Token cache, possibly shared with other clients.
	pub cache: Arc<dyn TokenCache>,
	/// Login service description.
	pub endpoint: AuthEndpoint,
	/// Tenant the token is issued for.
	pub tenant: TenantId,
	/// User the token is issued for.
	pub username: Username,
	/// Password source consulted only on a cache miss.
	pub credentials: Arc<dyn CredentialProvider>,
	/// In-process acquisition counters.
	pub metrics: Arc<AcquireMetrics>,
	telemetry: Telemetry,
	login_guard: Option<Arc<AsyncMutex<()>>>,
}
impl<C> TokenClient<C>
where
	C: ?Sized + LoginHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	pub fn with_http_client(
		cache: Arc<dyn TokenCache>,
		endpoint: AuthEndpoint,
		tenant: TenantId,
		username: Username,
		credentials: Arc<dyn CredentialProvider>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			http_client: http_client.into(),
			cache,
			endpoint,
			tenant,
			username,
			credentials,
			metrics: Default::default(),
			telemetry: Telemetry::default(),
			login_guard: Some(Default::default()),
		}
	}

	/// Routes spans and events through the provided telemetry handle.
	pub fn with_telemetry(mut self, telemetry: Telemetry) -> Self {
		self.telemetry = telemetry;

		self
	}

	/// Lets concurrent cache misses log in independently; the last cache write wins.
	pub fn without_single_flight(mut self) -> Self {
		self.login_guard = None;

		self
	}
}
#[cfg(feature = "reqwest")]
impl TokenClient<ReqwestHttpClient> {
	/// Creates a client backed by a default reqwest transport.
	///
	/// Use [`TokenClient::with_http_client`] with [`ReqwestHttpClient::with_timeout`] to bound
	/// login latency.
	pub fn new(
		cache: Arc<dyn TokenCache>,
		endpoint: AuthEndpoint,
		tenant: TenantId,
		username: Username,
		credentials: Arc<dyn CredentialProvider>,
	) -> Self {
		Self::with_http_client(
			cache,
			endpoint,
			tenant,
			username,
			credentials,
			ReqwestHttpClient::default(),
		)
	}
}
impl<C> Clone for TokenClient<C>
where
	C: ?Sized + LoginHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			cache: self.cache.clone(),
			endpoint: self.endpoint.clone(),
			tenant: self.tenant.clone(),
			username: self.username.clone(),
			credentials: self.credentials.clone(),
			metrics: self.metrics.clone(),
			telemetry: self.telemetry.clone(),
			login_guard: self.login_guard.clone(),
		}
	}
}
impl<C> Debug for TokenClient<C>
where
	C: ?Sized + LoginHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenClient")
			.field("endpoint", &self.endpoint)
			.field("tenant", &self.tenant)
			.field("username", &self.username)
			.field("single_flight", &self.login_guard.is_some())
			.finish()
	}
}

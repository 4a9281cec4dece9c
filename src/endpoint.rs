//! Validated description of the remote Okapi login service.
//!
//! [`AuthEndpoint`] resolves the expiry and legacy login URLs against a base URL, carries the
//! tenant/token header names and the access-token cookie name, and owns the [`TtlPolicy`] that
//! turns login responses into cache lifetimes. Build one with [`AuthEndpoint::builder`] or load it
//! from JSON with [`AuthEndpoint::from_json`].

/// Builder and serde-facing configuration for [`AuthEndpoint`].
pub mod builder;

pub use builder::*;

// crates.io
use http::HeaderName;
// self
use crate::_prelude::*;

/// Default path of the cookie-issuing login endpoint.
pub const DEFAULT_EXPIRY_PATH: &str = "/authn/login-with-expiry";
/// Default path of the legacy login endpoint.
pub const DEFAULT_LEGACY_PATH: &str = "/authn/login";
/// Default tenant header.
pub const DEFAULT_TENANT_HEADER: &str = "X-Okapi-Tenant";
/// Default token header, used both for legacy responses and outbound requests.
pub const DEFAULT_TOKEN_HEADER: &str = "X-Okapi-Token";
/// Default name of the cookie carrying the access token.
pub const DEFAULT_ACCESS_COOKIE: &str = "folioAccessToken";
/// Seconds subtracted from a cookie's max-age before caching.
pub const DEFAULT_SKEW_SECS: i64 = 10;
/// Cache lifetime assigned to legacy tokens.
pub const DEFAULT_LEGACY_TTL_SECS: i64 = 86_400;

/// Login URLs resolved against the configured base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginEndpoints {
	/// `login-with-expiry` endpoint, always tried first.
	pub expiry: Url,
	/// Legacy `login` endpoint, only reached after a fallback.
	pub legacy: Url,
}

/// Header names used on login requests and signed outbound requests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginHeaders {
	/// Header carrying the tenant identifier.
	pub tenant: HeaderName,
	/// Header carrying the access token.
	pub token: HeaderName,
}

/// Lifetimes applied when populating the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TtlPolicy {
	/// Safety margin subtracted from a cookie's max-age.
	pub skew: Duration,
	/// Fixed lifetime for tokens from the legacy endpoint.
	pub legacy_ttl: Duration,
}
impl TtlPolicy {
	/// Computes `max(0, max_age - skew)`; an unknown max-age yields zero.
	pub fn expiry_ttl(&self, max_age: Option<i64>) -> Duration {
		let Some(secs) = max_age else {
			return Duration::ZERO;
		};

		Duration::seconds(secs).checked_sub(self.skew).unwrap_or(Duration::ZERO).max(Duration::ZERO)
	}

	/// Absolute expiry for a token issued at `now` that may live for `ttl`.
	pub fn expires_at(now: OffsetDateTime, ttl: Duration) -> OffsetDateTime {
		now.saturating_add(ttl)
	}
}
impl Default for TtlPolicy {
	fn default() -> Self {
		Self {
			skew: Duration::seconds(DEFAULT_SKEW_SECS),
			legacy_ttl: Duration::seconds(DEFAULT_LEGACY_TTL_SECS),
		}
	}
}

/// Immutable login service description consumed by [`TokenClient`](crate::login::TokenClient).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthEndpoint {
	/// Base URL every login path is appended to.
	pub base_url: Url,
	/// Resolved login URLs.
	pub endpoints: LoginEndpoints,
	/// Header names.
	pub headers: LoginHeaders,
	/// Name of the cookie carrying the access token.
	pub access_cookie: String,
	/// Cache lifetime policy.
	pub ttl: TtlPolicy,
}
impl AuthEndpoint {
	/// Creates a new builder for the provided base URL.
	pub fn builder(base_url: Url) -> AuthEndpointBuilder {
		AuthEndpointBuilder::new(base_url)
	}

	/// Builds an endpoint with Okapi defaults for every setting.
	pub fn okapi(base_url: Url) -> Result<Self, AuthEndpointError> {
		Self::builder(base_url).build()
	}

	/// Parses and validates a JSON configuration document.
	pub fn from_json(raw: &str) -> Result<Self> {
		let de = &mut serde_json::Deserializer::from_str(raw);
		let builder: AuthEndpointBuilder = serde_path_to_error::deserialize(de)
			.map_err(|source| crate::error::ConfigError::EndpointParse { source })?;

		builder.build().map_err(|e| crate::error::ConfigError::from(e).into())
	}
}

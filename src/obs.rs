//! Optional observability helpers for token acquisition.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `okapi_token.acquire` with `tenant`, `user`, and `stage`
//!   fields, plus events for cache failures and login fallbacks. Spans and events go through the
//!   [`Telemetry`] handle injected into the client.
//! - Enable `metrics` to increment `okapi_token_acquire_total` (labeled by `outcome`) and
//!   `okapi_token_login_total` (labeled by `endpoint` + `status`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Login endpoints contacted by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoginEndpointKind {
	/// Cookie-issuing `login-with-expiry` endpoint.
	Expiry,
	/// Header-issuing legacy `login` endpoint.
	Legacy,
}
impl LoginEndpointKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			LoginEndpointKind::Expiry => "expiry",
			LoginEndpointKind::Legacy => "legacy",
		}
	}
}
impl Display for LoginEndpointKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each acquisition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AcquireOutcome {
	/// Entry to `get_token`.
	Attempt,
	/// Served from the cache.
	CacheHit,
	/// Token issued by the expiry endpoint.
	ExpiryLogin,
	/// Token issued by the legacy endpoint.
	LegacyLogin,
	/// Legacy login succeeded without a token header.
	NoToken,
	/// Failure propagated back to the caller.
	Failure,
}
impl AcquireOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AcquireOutcome::Attempt => "attempt",
			AcquireOutcome::CacheHit => "cache_hit",
			AcquireOutcome::ExpiryLogin => "expiry_login",
			AcquireOutcome::LegacyLogin => "legacy_login",
			AcquireOutcome::NoToken => "no_token",
			AcquireOutcome::Failure => "failure",
		}
	}
}
impl Display for AcquireOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

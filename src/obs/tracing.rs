// self
use crate::{
	_prelude::*,
	auth::{TenantId, Username},
	cache::CacheError,
	obs::LoginEndpointKind,
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedAcquire<F> =
	tracing::instrument::WithDispatch<tracing::instrument::Instrumented<F>>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedAcquire<F> = F;

/// Logging capability injected into a client.
///
/// Without an explicit dispatcher, spans and events go to whatever dispatcher is current where
/// the acquisition is created, so the host process keeps ownership of subscriber lifecycles.
#[derive(Clone, Debug, Default)]
pub struct Telemetry {
	#[cfg(feature = "tracing")]
	dispatch: Option<tracing::Dispatch>,
}
impl Telemetry {
	/// Routes every span and event of the client through `dispatch`.
	#[cfg(feature = "tracing")]
	pub fn with_dispatch(dispatch: tracing::Dispatch) -> Self {
		Self { dispatch: Some(dispatch) }
	}

	/// Creates the span for one acquisition.
	pub fn span(&self, tenant: &TenantId, user: &Username, stage: &'static str) -> AcquireSpan {
		#[cfg(feature = "tracing")]
		{
			let dispatch = self
				.dispatch
				.clone()
				.unwrap_or_else(|| tracing::dispatcher::get_default(tracing::Dispatch::clone));
			let span = tracing::dispatcher::with_default(&dispatch, || {
				tracing::info_span!(
					"okapi_token.acquire",
					tenant = %tenant,
					user = %user,
					stage
				)
			});

			AcquireSpan { span, dispatch }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (tenant, user, stage);

			AcquireSpan {}
		}
	}
}

/// Span wrapping a single `get_token` call.
#[derive(Clone, Debug)]
pub struct AcquireSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
	#[cfg(feature = "tracing")]
	dispatch: tracing::Dispatch,
}
impl AcquireSpan {
	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedAcquire<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::{Instrument, instrument::WithSubscriber};

			fut.instrument(self.span.clone()).with_subscriber(self.dispatch.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

pub(crate) fn emit_cache_failure(err: &CacheError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(error = %err, "Failed to access the token cache.");
	#[cfg(not(feature = "tracing"))]
	let _ = err;
}

pub(crate) fn emit_fallback(reason: &'static str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(reason, "Falling back to the legacy login endpoint.");
	#[cfg(not(feature = "tracing"))]
	let _ = reason;
}

pub(crate) fn emit_token_cached(endpoint: LoginEndpointKind, ttl: Duration) {
	#[cfg(feature = "tracing")]
	tracing::debug!(
		endpoint = endpoint.as_str(),
		ttl_secs = ttl.whole_seconds(),
		"Cached access token."
	);
	#[cfg(not(feature = "tracing"))]
	let _ = (endpoint, ttl);
}

pub(crate) fn emit_missing_legacy_token() {
	#[cfg(feature = "tracing")]
	tracing::warn!("Legacy login succeeded without a token header.");
}

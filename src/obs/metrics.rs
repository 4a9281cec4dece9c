// self
use crate::obs::{AcquireOutcome, LoginEndpointKind};

/// Records an acquisition outcome via the global metrics recorder (when enabled).
pub fn record_acquire_outcome(outcome: AcquireOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("okapi_token_acquire_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

/// Records the status returned by a login endpoint (when enabled).
pub fn record_login_response(endpoint: LoginEndpointKind, status: u16) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"okapi_token_login_total",
			"endpoint" => endpoint.as_str(),
			"status" => status.to_string()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (endpoint, status);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_are_safe_without_installed_recorder() {
		record_acquire_outcome(AcquireOutcome::Failure);
		record_login_response(LoginEndpointKind::Expiry, 404);
	}
}

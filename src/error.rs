//! Client-level error types shared across the cache, transport, and login protocol.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Token cache failed on read or write; no login was attempted after a failed read.
	#[error("Failed to access the token cache: {0}")]
	CacheAccess(
		#[from]
		#[source]
		crate::cache::CacheError,
	),
	/// Credential provider failed to produce a password.
	#[error(transparent)]
	Credential(#[from] crate::auth::CredentialError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// A login endpoint answered with an unexpected status.
	#[error("Login endpoint returned HTTP {status}: {body}")]
	AuthService {
		/// HTTP status code returned by the endpoint.
		status: u16,
		/// Raw response body kept as the diagnostic message.
		body: String,
	},
	/// A tenant or token value cannot be carried in an HTTP header.
	#[error("The {header} value is not a valid HTTP header value.")]
	InvalidHeaderValue {
		/// Which value was rejected (`tenant` or `token`).
		header: &'static str,
		/// Underlying header encoding failure.
		#[source]
		source: http::header::InvalidHeaderValue,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Auth endpoint description failed validation.
	#[error(transparent)]
	Endpoint(#[from] crate::endpoint::AuthEndpointError),
	/// Auth endpoint configuration could not be deserialized.
	#[error("Auth endpoint configuration is malformed.")]
	EndpointParse {
		/// Structured parsing failure including the offending field path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token cache capacity must hold at least one entry.
	#[error("Token cache capacity must be at least 1.")]
	ZeroCacheCapacity,
	/// Login payload could not be serialized.
	#[error("Login payload could not be serialized.")]
	Payload(#[from] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the login endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the login endpoint.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}

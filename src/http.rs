//! Transport primitives for Okapi login calls.
//!
//! [`LoginHttpClient`] is the client's only dependency on an HTTP stack. The protocol layer hands
//! it a fully prepared [`LoginRequest`] and expects back the raw status, headers, and body as a
//! [`LoginResponse`]; classification of that response stays in [`crate::login`]. Custom
//! transports own their own timeout policy, while [`ReqwestHttpClient::with_timeout`] covers the
//! default stack.

// std
#[cfg(feature = "reqwest")] use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use http::{HeaderMap, StatusCode};
// self
use crate::_prelude::*;
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Boxed future returned by [`LoginHttpClient::post`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<LoginResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of issuing login requests.
///
/// Implementations must be `Send + Sync + 'static` so a client can be shared behind `Arc` across
/// tasks, and the returned futures must be `Send` so callers may spawn acquisitions.
pub trait LoginHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Sends `request` as a `POST` and returns the complete response.
	fn post(&self, request: LoginRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// Prepared login request.
#[derive(Clone, Debug)]
pub struct LoginRequest {
	/// Absolute endpoint URL.
	pub url: Url,
	/// Request headers, including the tenant header.
	pub headers: HeaderMap,
	/// Serialized JSON body.
	pub body: Vec<u8>,
}

/// Raw login response handed back by the transport.
#[derive(Clone, Debug)]
pub struct LoginResponse {
	/// HTTP status.
	pub status: StatusCode,
	/// Response headers; repeated headers such as `Set-Cookie` keep every value.
	pub headers: HeaderMap,
	/// Response body decoded as text.
	pub body: String,
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client whose requests fail once `timeout` elapses.
	pub fn with_timeout(timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).build()?;

		Ok(Self(client))
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl LoginHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn post(&self, request: LoginRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let response = client
				.post(request.url)
				.headers(request.headers)
				.body(request.body)
				.send()
				.await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.text().await?;

			Ok(LoginResponse { status, headers, body })
		})
	}
}

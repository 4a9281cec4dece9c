//! Request signing contracts that attach access tokens to outbound HTTP requests.

// crates.io
use http::{HeaderMap, HeaderName, HeaderValue, Request};

/// Describes how a request type carries the access token header.
///
/// Implementations replace any value already present under `name`, so signing the same request
/// twice leaves exactly one token header.
pub trait SignableRequest
where
	Self: Sized,
{
	/// Returns the request with `value` set under `name`.
	fn attach_token(self, name: HeaderName, value: HeaderValue) -> Self;
}
impl SignableRequest for HeaderMap {
	fn attach_token(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.insert(name, value);

		self
	}
}
impl<B> SignableRequest for Request<B> {
	fn attach_token(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers_mut().insert(name, value);

		self
	}
}
#[cfg(feature = "reqwest")]
impl SignableRequest for reqwest::Request {
	fn attach_token(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers_mut().insert(name, value);

		self
	}
}
#[cfg(feature = "reqwest")]
impl SignableRequest for reqwest::RequestBuilder {
	fn attach_token(self, name: HeaderName, value: HeaderValue) -> Self {
		self.header(name, value)
	}
}

//! Okapi access tokens on demand: a bounded, TTL-aware LRU token cache plus a login client that
//! prefers the cookie-issuing expiry endpoint and falls back to the legacy header-issuing one.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod cache;
pub mod endpoint;
pub mod error;
pub mod ext;
pub mod http;
pub mod login;
pub mod obs;
#[cfg(feature = "reqwest")]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{CredentialProvider, Password, TenantId, Username},
		cache::{MemoryTokenCache, TokenCache},
		endpoint::AuthEndpoint,
		http::ReqwestHttpClient,
		login::TokenClient,
	};

	/// Token client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestTokenClient = TokenClient<ReqwestHttpClient>;

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`TokenClient`] against `base_url` with default Okapi settings, a
	/// 16-entry in-memory cache, a static password, and the reqwest transport used across
	/// integration tests.
	pub fn build_reqwest_test_client(
		base_url: &str,
		tenant: &str,
		user: &str,
		password: &str,
	) -> (ReqwestTestTokenClient, Arc<MemoryTokenCache>) {
		let base_url = Url::parse(base_url).expect("Test base URL should parse.");
		let endpoint = AuthEndpoint::okapi(base_url).expect("Default Okapi endpoint should build.");
		let cache_backend =
			Arc::new(MemoryTokenCache::new(16).expect("Test cache capacity should be valid."));
		let cache: Arc<dyn TokenCache> = cache_backend.clone();
		let credentials: Arc<dyn CredentialProvider> = Arc::new(Password::new(password));
		let client = TokenClient::with_http_client(
			cache,
			endpoint,
			TenantId::new(tenant).expect("Test tenant should be valid."),
			Username::new(user).expect("Test user should be valid."),
			credentials,
			test_reqwest_http_client(),
		);

		(client, cache_backend)
	}
}

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};

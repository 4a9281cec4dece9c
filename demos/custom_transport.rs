//! Demonstrates plugging a non-reqwest transport into [`TokenClient`].
//!
//! 1. Implement [`LoginHttpClient`] and return the raw status, headers, and body.
//! 2. Pass the transport to [`TokenClient::with_http_client`].
//! 3. Transport errors surface as [`Error::Transport`].

// std
use std::{
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
};
// crates.io
use color_eyre::Result;
use http::{HeaderMap, HeaderValue, StatusCode};
use url::Url;
// self
use okapi_token_client::{
	auth::{Password, TenantId, Username},
	cache::MemoryTokenCache,
	endpoint::AuthEndpoint,
	error::Error,
	http::{LoginHttpClient, LoginRequest, LoginResponse, TransportFuture},
	login::TokenClient,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let endpoint = AuthEndpoint::okapi(Url::parse("https://okapi.example.com")?)?;
	let client: TokenClient<LegacyOnlyClient> = TokenClient::with_http_client(
		Arc::new(MemoryTokenCache::new(10)?),
		endpoint.clone(),
		TenantId::new("diku")?,
		Username::new("diku_admin")?,
		Arc::new(Password::new("admin")),
		LegacyOnlyClient { reachable: true },
	);

	if let Some(token) = client.get_token().await? {
		println!("Token issued through the legacy fallback: {}.", token.expose());
	}

	let offline: TokenClient<LegacyOnlyClient> = TokenClient::with_http_client(
		Arc::new(MemoryTokenCache::new(10)?),
		endpoint,
		TenantId::new("diku")?,
		Username::new("diku_admin")?,
		Arc::new(Password::new("admin")),
		LegacyOnlyClient { reachable: false },
	);

	match offline.get_token().await {
		Err(e @ Error::Transport(_)) => println!("Transport failure surfaced to the caller: {e}."),
		other => println!("Unexpected outcome: {other:?}."),
	}

	Ok(())
}

#[derive(Debug)]
struct Unreachable;
impl Display for Unreachable {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("login service is unreachable")
	}
}
impl StdError for Unreachable {}

/// Answers like a backend without the expiry endpoint.
struct LegacyOnlyClient {
	reachable: bool,
}
impl LoginHttpClient for LegacyOnlyClient {
	type TransportError = Unreachable;

	fn post(&self, request: LoginRequest) -> TransportFuture<'_, Self::TransportError> {
		let reachable = self.reachable;

		Box::pin(async move {
			if !reachable {
				return Err(Unreachable);
			}

			let mut headers = HeaderMap::new();
			let status = if request.url.path().ends_with("/login-with-expiry") {
				StatusCode::NOT_FOUND
			} else {
				headers.insert("x-okapi-token", HeaderValue::from_static("legacy-access"));

				StatusCode::CREATED
			};

			Ok(LoginResponse { status, headers, body: String::new() })
		})
	}
}

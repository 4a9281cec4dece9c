//! Demonstrates acquiring and reusing an Okapi token with the default reqwest transport and the
//! in-memory token cache.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use url::Url;
// self
use okapi_token_client::{
	auth::{CredentialProvider, Password, TenantId, Username},
	cache::{MemoryTokenCache, TokenCache},
	endpoint::AuthEndpoint,
	login::TokenClient,
	reqwest::{Method, Request},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let login_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/authn/login-with-expiry").header("x-okapi-tenant", "diku");
			then.status(201).header("set-cookie", "folioAccessToken=demo-access; Max-Age=600");
		})
		.await;
	let cache: Arc<dyn TokenCache> = Arc::new(MemoryTokenCache::new(100)?);
	let credentials: Arc<dyn CredentialProvider> = Arc::new(Password::new("admin"));
	let client = TokenClient::new(
		cache,
		AuthEndpoint::okapi(Url::parse(&server.base_url())?)?,
		TenantId::new("diku")?,
		Username::new("diku_admin")?,
		credentials,
	);

	if let Some(token) = client.get_token().await? {
		println!("Access token issued by the expiry endpoint: {}.", token.expose());
	}

	let request = client.sign(Request::new(Method::GET, Url::parse(&server.url("/users"))?)).await?;

	println!("Signed request carries {} header(s).", request.headers().len());
	println!("Cache hits so far: {}.", client.metrics.cache_hits());

	login_mock.assert_async().await;

	Ok(())
}

//! The per-call acquisition protocol: cache, credentials, expiry login, legacy login, delivery.

// crates.io
use http::{
	HeaderMap, HeaderValue,
	header::{ACCEPT, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Password},
	endpoint::TtlPolicy,
	error::{ConfigError, TransportError},
	ext::SignableRequest,
	http::{LoginHttpClient, LoginRequest, LoginResponse},
	login::{
		TokenClient,
		response::{self, ExpiryOutcome},
	},
	obs::{self, AcquireOutcome, LoginEndpointKind},
};

#[derive(Serialize)]
struct LoginPayload<'a> {
	username: &'a str,
	password: &'a Password,
}

impl<C> TokenClient<C>
where
	C: ?Sized + LoginHttpClient,
{
	/// Returns a usable access token, logging in only when the cache has none.
	///
	/// `Ok(None)` means the legacy endpoint accepted the credentials without returning a token
	/// header; nothing is cached in that case.
	pub async fn get_token(&self) -> Result<Option<AccessToken>> {
		let span = self.telemetry.span(&self.tenant, &self.username, "get_token");

		obs::record_acquire_outcome(AcquireOutcome::Attempt);

		let result = span.instrument(self.acquire()).await;

		if result.is_err() {
			self.metrics.record_failure();
			obs::record_acquire_outcome(AcquireOutcome::Failure);
		}

		result
	}

	/// Resolves a token and attaches it to `request` under the configured token header.
	///
	/// When no token is resolved the request is returned untouched.
	pub async fn sign<R>(&self, request: R) -> Result<R>
	where
		R: Send + SignableRequest,
	{
		let Some(token) = self.get_token().await? else {
			return Ok(request);
		};
		let mut value = HeaderValue::from_str(token.expose())
			.map_err(|source| Error::InvalidHeaderValue { header: "token", source })?;

		value.set_sensitive(true);

		Ok(request.attach_token(self.endpoint.headers.token.clone(), value))
	}

	async fn acquire(&self) -> Result<Option<AccessToken>> {
		if let Some(token) = self.cached().await? {
			return Ok(Some(token));
		}

		let _login = match self.login_guard.as_deref() {
			Some(guard) => {
				let held = guard.lock().await;

				// Another caller may have logged in while this one waited.
				if let Some(token) = self.cached().await? {
					return Ok(Some(token));
				}

				Some(held)
			},
			None => None,
		};

		// An unsendable tenant must fail before any secret is fetched.
		let headers = self.login_headers()?;

		self.metrics.record_credential_lookup();

		let password = self.credentials.password().await?;
		let payload = LoginPayload { username: &self.username, password: &password };
		let body = serde_json::to_vec(&payload).map_err(ConfigError::from)?;

		if let Some(token) = self.login_with_expiry(&headers, &body).await? {
			return Ok(Some(token));
		}

		self.login_legacy(&headers, &body).await
	}

	async fn cached(&self) -> Result<Option<AccessToken>> {
		let token = self.cache.get(&self.tenant, &self.username).await.map_err(|err| {
			obs::emit_cache_failure(&err);

			Error::from(err)
		})?;

		if token.is_some() {
			self.metrics.record_cache_hit();
			obs::record_acquire_outcome(AcquireOutcome::CacheHit);
		}

		Ok(token)
	}

	async fn login_with_expiry(
		&self,
		headers: &HeaderMap,
		body: &[u8],
	) -> Result<Option<AccessToken>> {
		let response = self.send(LoginEndpointKind::Expiry, headers, body).await?;

		match response::classify_expiry_response(response, &self.endpoint.access_cookie)? {
			ExpiryOutcome::Issued(cookie) => {
				let now = OffsetDateTime::now_utc();
				let ttl = self.endpoint.ttl.expiry_ttl(cookie.max_age_at(now));

				self.store(LoginEndpointKind::Expiry, cookie.value.clone(), now, ttl).await?;
				self.metrics.record_expiry_login();
				obs::record_acquire_outcome(AcquireOutcome::ExpiryLogin);

				Ok(Some(cookie.value))
			},
			ExpiryOutcome::Unsupported => {
				obs::emit_fallback("expiry endpoint not found");

				Ok(None)
			},
			ExpiryOutcome::MissingCookie => {
				obs::emit_fallback("access cookie missing from expiry response");

				Ok(None)
			},
		}
	}

	async fn login_legacy(&self, headers: &HeaderMap, body: &[u8]) -> Result<Option<AccessToken>> {
		let response = self.send(LoginEndpointKind::Legacy, headers, body).await?;
		let token = response::classify_legacy_response(response, &self.endpoint.headers.token)?;

		self.metrics.record_legacy_login();

		match token {
			Some(token) => {
				let now = OffsetDateTime::now_utc();
				let ttl = self.endpoint.ttl.legacy_ttl;

				self.store(LoginEndpointKind::Legacy, token.clone(), now, ttl).await?;
				obs::record_acquire_outcome(AcquireOutcome::LegacyLogin);

				Ok(Some(token))
			},
			None => {
				obs::emit_missing_legacy_token();
				obs::record_acquire_outcome(AcquireOutcome::NoToken);

				Ok(None)
			},
		}
	}

	async fn store(
		&self,
		endpoint: LoginEndpointKind,
		token: AccessToken,
		now: OffsetDateTime,
		ttl: Duration,
	) -> Result<()> {
		let expires_at = TtlPolicy::expires_at(now, ttl);

		self.cache.put(&self.tenant, &self.username, token, expires_at).await.map_err(|err| {
			obs::emit_cache_failure(&err);

			Error::from(err)
		})?;
		obs::emit_token_cached(endpoint, ttl);

		Ok(())
	}

	async fn send(
		&self,
		endpoint: LoginEndpointKind,
		headers: &HeaderMap,
		body: &[u8],
	) -> Result<LoginResponse> {
		let url = match endpoint {
			LoginEndpointKind::Expiry => &self.endpoint.endpoints.expiry,
			LoginEndpointKind::Legacy => &self.endpoint.endpoints.legacy,
		};
		let request =
			LoginRequest { url: url.clone(), headers: headers.clone(), body: body.to_vec() };
		let response = self.http_client.post(request).await.map_err(TransportError::network)?;

		obs::record_login_response(endpoint, response.status.as_u16());

		Ok(response)
	}

	fn login_headers(&self) -> Result<HeaderMap> {
		let tenant = HeaderValue::from_str(&self.tenant)
			.map_err(|source| Error::InvalidHeaderValue { header: "tenant", source })?;
		let mut headers = HeaderMap::new();

		headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
		headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		headers.insert(self.endpoint.headers.tenant.clone(), tenant);

		Ok(headers)
	}
}

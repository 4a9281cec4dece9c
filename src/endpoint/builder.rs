// crates.io
use http::HeaderName;
// self
use crate::{
	_prelude::*,
	endpoint::{
		AuthEndpoint, DEFAULT_ACCESS_COOKIE, DEFAULT_EXPIRY_PATH, DEFAULT_LEGACY_PATH,
		DEFAULT_LEGACY_TTL_SECS, DEFAULT_SKEW_SECS, DEFAULT_TENANT_HEADER, DEFAULT_TOKEN_HEADER,
		LoginEndpoints, LoginHeaders, TtlPolicy,
	},
};

/// Errors raised while constructing or validating an [`AuthEndpoint`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum AuthEndpointError {
	/// Base URL must be an absolute `http` or `https` URL.
	#[error("Base URL must be an absolute http(s) URL: {url}.")]
	UnsupportedBaseUrl {
		/// URL that failed validation.
		url: String,
	},
	/// Login paths must be absolute.
	#[error("The {endpoint} path must start with `/`: {path}.")]
	RelativePath {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Offending path.
		path: String,
	},
	/// Header names must be valid HTTP header names.
	#[error("The {header} header name is invalid: {name}.")]
	InvalidHeaderName {
		/// Which header failed validation.
		header: &'static str,
		/// Offending header name.
		name: String,
	},
	/// The access cookie name cannot be empty.
	#[error("Access cookie name cannot be empty.")]
	EmptyCookieName,
	/// Skew cannot be negative.
	#[error("Token skew must not be negative, got {secs} seconds.")]
	NegativeSkew {
		/// Supplied skew in seconds.
		secs: i64,
	},
	/// Legacy tokens need a positive lifetime.
	#[error("Legacy token TTL must be positive, got {secs} seconds.")]
	NonPositiveLegacyTtl {
		/// Supplied TTL in seconds.
		secs: i64,
	},
}

/// Builder for [`AuthEndpoint`] values; also the shape of the JSON configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuthEndpointBuilder {
	/// Okapi base URL.
	pub base_url: Url,
	/// Path of the cookie-issuing login endpoint.
	#[serde(default = "default_expiry_path")]
	pub expiry_path: String,
	/// Path of the legacy login endpoint.
	#[serde(default = "default_legacy_path")]
	pub legacy_path: String,
	/// Tenant header name.
	#[serde(default = "default_tenant_header")]
	pub tenant_header: String,
	/// Token header name.
	#[serde(default = "default_token_header")]
	pub token_header: String,
	/// Access-token cookie name.
	#[serde(default = "default_access_cookie")]
	pub access_cookie: String,
	/// Seconds subtracted from a cookie's max-age.
	#[serde(default = "default_skew_secs")]
	pub skew_secs: i64,
	/// Cache lifetime of legacy tokens in seconds.
	#[serde(default = "default_legacy_ttl_secs")]
	pub legacy_ttl_secs: i64,
}
impl AuthEndpointBuilder {
	/// Creates a new builder seeded with Okapi defaults.
	pub fn new(base_url: Url) -> Self {
		Self {
			base_url,
			expiry_path: default_expiry_path(),
			legacy_path: default_legacy_path(),
			tenant_header: default_tenant_header(),
			token_header: default_token_header(),
			access_cookie: default_access_cookie(),
			skew_secs: DEFAULT_SKEW_SECS,
			legacy_ttl_secs: DEFAULT_LEGACY_TTL_SECS,
		}
	}

	/// Overrides the expiry login path.
	pub fn expiry_path(mut self, path: impl Into<String>) -> Self {
		self.expiry_path = path.into();

		self
	}

	/// Overrides the legacy login path.
	pub fn legacy_path(mut self, path: impl Into<String>) -> Self {
		self.legacy_path = path.into();

		self
	}

	/// Overrides the tenant header name.
	pub fn tenant_header(mut self, name: impl Into<String>) -> Self {
		self.tenant_header = name.into();

		self
	}

	/// Overrides the token header name.
	pub fn token_header(mut self, name: impl Into<String>) -> Self {
		self.token_header = name.into();

		self
	}

	/// Overrides the access-token cookie name.
	pub fn access_cookie(mut self, name: impl Into<String>) -> Self {
		self.access_cookie = name.into();

		self
	}

	/// Overrides the skew (seconds).
	pub fn skew_secs(mut self, secs: i64) -> Self {
		self.skew_secs = secs;

		self
	}

	/// Overrides the legacy token TTL (seconds).
	pub fn legacy_ttl_secs(mut self, secs: i64) -> Self {
		self.legacy_ttl_secs = secs;

		self
	}

	/// Validates the configuration and resolves the login URLs.
	pub fn build(self) -> Result<AuthEndpoint, AuthEndpointError> {
		if !matches!(self.base_url.scheme(), "http" | "https") || self.base_url.cannot_be_a_base()
		{
			return Err(AuthEndpointError::UnsupportedBaseUrl { url: self.base_url.to_string() });
		}

		let expiry = join_path(&self.base_url, "expiry", &self.expiry_path)?;
		let legacy = join_path(&self.base_url, "legacy", &self.legacy_path)?;
		let tenant = parse_header("tenant", &self.tenant_header)?;
		let token = parse_header("token", &self.token_header)?;

		if self.access_cookie.is_empty() {
			return Err(AuthEndpointError::EmptyCookieName);
		}
		if self.skew_secs < 0 {
			return Err(AuthEndpointError::NegativeSkew { secs: self.skew_secs });
		}
		if self.legacy_ttl_secs <= 0 {
			return Err(AuthEndpointError::NonPositiveLegacyTtl { secs: self.legacy_ttl_secs });
		}

		Ok(AuthEndpoint {
			base_url: self.base_url,
			endpoints: LoginEndpoints { expiry, legacy },
			headers: LoginHeaders { tenant, token },
			access_cookie: self.access_cookie,
			ttl: TtlPolicy {
				skew: Duration::seconds(self.skew_secs),
				legacy_ttl: Duration::seconds(self.legacy_ttl_secs),
			},
		})
	}
}

/// Appends `path` to the base URL path verbatim, so `http://host/okapi` keeps its prefix.
fn join_path(base: &Url, endpoint: &'static str, path: &str) -> Result<Url, AuthEndpointError> {
	if !path.starts_with('/') {
		return Err(AuthEndpointError::RelativePath { endpoint, path: path.to_owned() });
	}

	let mut url = base.clone();
	let joined = format!("{}{path}", base.path().trim_end_matches('/'));

	url.set_path(&joined);

	Ok(url)
}

fn parse_header(header: &'static str, name: &str) -> Result<HeaderName, AuthEndpointError> {
	HeaderName::from_bytes(name.as_bytes())
		.map_err(|_| AuthEndpointError::InvalidHeaderName { header, name: name.to_owned() })
}

fn default_expiry_path() -> String {
	DEFAULT_EXPIRY_PATH.into()
}

fn default_legacy_path() -> String {
	DEFAULT_LEGACY_PATH.into()
}

fn default_tenant_header() -> String {
	DEFAULT_TENANT_HEADER.into()
}

fn default_token_header() -> String {
	DEFAULT_TOKEN_HEADER.into()
}

fn default_access_cookie() -> String {
	DEFAULT_ACCESS_COOKIE.into()
}

fn default_skew_secs() -> i64 {
	DEFAULT_SKEW_SECS
}

fn default_legacy_ttl_secs() -> i64 {
	DEFAULT_LEGACY_TTL_SECS
}

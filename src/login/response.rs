//! Pure classification of login responses into protocol outcomes.

// crates.io
use http::{HeaderName, StatusCode};
// self
use crate::{
	_prelude::*,
	auth::AccessToken,
	http::LoginResponse,
	login::cookie::{self, AccessCookie},
};

/// Result of a call to the expiry endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpiryOutcome {
	/// 201 with the access cookie.
	Issued(AccessCookie),
	/// 404: the backend does not offer the endpoint.
	Unsupported,
	/// 201 without the access cookie.
	MissingCookie,
}

/// Maps an expiry-endpoint response; any status other than 201/404 is an error.
pub fn classify_expiry_response(
	response: LoginResponse,
	cookie_name: &str,
) -> Result<ExpiryOutcome> {
	match response.status {
		StatusCode::CREATED => Ok(cookie::extract_access_token(&response.headers, cookie_name)
			.map_or(ExpiryOutcome::MissingCookie, ExpiryOutcome::Issued)),
		StatusCode::NOT_FOUND => Ok(ExpiryOutcome::Unsupported),
		status => Err(auth_service_error(status, response.body)),
	}
}

/// Maps a legacy-endpoint response; `Ok(None)` is a 201 lacking the token header.
pub fn classify_legacy_response(
	response: LoginResponse,
	token_header: &HeaderName,
) -> Result<Option<AccessToken>> {
	if response.status != StatusCode::CREATED {
		return Err(auth_service_error(response.status, response.body));
	}

	Ok(response
		.headers
		.get(token_header)
		.and_then(|value| value.to_str().ok())
		.filter(|value| !value.is_empty())
		.map(AccessToken::new))
}

fn auth_service_error(status: StatusCode, body: String) -> Error {
	Error::AuthService { status: status.as_u16(), body }
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::{HeaderMap, HeaderValue, header::SET_COOKIE};
	// self
	use super::*;

	fn response(status: u16, headers: &[(&str, &str)], body: &str) -> LoginResponse {
		let mut map = HeaderMap::new();

		for (name, value) in headers {
			map.append(
				HeaderName::from_bytes(name.as_bytes()).expect("Fixture header name is valid."),
				HeaderValue::from_str(value).expect("Fixture header value is valid."),
			);
		}

		LoginResponse {
			status: StatusCode::from_u16(status).expect("Fixture status is valid."),
			headers: map,
			body: body.into(),
		}
	}

	#[test]
	fn expiry_created_with_cookie_is_issued() {
		let outcome = classify_expiry_response(
			response(201, &[("set-cookie", "folioAccessToken=abc; Max-Age=3600")], ""),
			"folioAccessToken",
		)
		.expect("201 should classify.");

		match outcome {
			ExpiryOutcome::Issued(cookie) => {
				assert_eq!(cookie.value.expose(), "abc");
				assert_eq!(cookie.max_age, Some(3600));
			},
			other => panic!("Unexpected outcome: {other:?}."),
		}
	}

	#[test]
	fn expiry_fallbacks_are_distinguished() {
		let missing = classify_expiry_response(
			response(201, &[(SET_COOKIE.as_str(), "other=1")], ""),
			"folioAccessToken",
		)
		.expect("Cookie-less 201 should classify.");
		let unsupported = classify_expiry_response(response(404, &[], "nope"), "folioAccessToken")
			.expect("404 should classify.");

		assert_eq!(missing, ExpiryOutcome::MissingCookie);
		assert_eq!(unsupported, ExpiryOutcome::Unsupported);
	}

	#[test]
	fn expiry_other_status_carries_body() {
		let err = classify_expiry_response(response(500, &[], "boom"), "folioAccessToken")
			.expect_err("500 should fail.");

		assert!(matches!(err, Error::AuthService { status: 500, ref body } if body == "boom"));

		// 200 is not the expected success code either.
		assert!(classify_expiry_response(response(200, &[], ""), "folioAccessToken").is_err());
	}

	#[test]
	fn legacy_reads_token_header() {
		let header = HeaderName::from_static("x-okapi-token");
		let token =
			classify_legacy_response(response(201, &[("X-Okapi-Token", "xyz")], ""), &header)
				.expect("201 should classify.");

		assert_eq!(token.as_ref().map(AccessToken::expose), Some("xyz"));
		assert_eq!(
			classify_legacy_response(response(201, &[], ""), &header)
				.expect("201 without a header should classify."),
			None
		);
	}

	#[test]
	fn legacy_rejects_non_created() {
		let header = HeaderName::from_static("x-okapi-token");
		let err = classify_legacy_response(response(422, &[], "Bad credentials"), &header)
			.expect_err("422 should fail.");

		assert!(matches!(
			err,
			Error::AuthService { status: 422, ref body } if body == "Bad credentials"
		));
	}
}

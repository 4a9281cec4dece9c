//! Strict `Set-Cookie` decoding used to pull the access token out of expiry-login responses.

// crates.io
use http::{HeaderMap, header::SET_COOKIE};
use time::{PrimitiveDateTime, macros::format_description};
// self
use crate::{_prelude::*, auth::AccessToken};

/// Access-token cookie extracted from a login response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessCookie {
	/// Token carried in the cookie value.
	pub value: AccessToken,
	/// `Max-Age` attribute in seconds, if present and numeric.
	pub max_age: Option<i64>,
	/// `Expires` attribute, if present and well formed.
	pub expires: Option<OffsetDateTime>,
}
impl AccessCookie {
	/// Remaining lifetime in seconds as seen at `now`; `Max-Age` wins over `Expires`.
	pub fn max_age_at(&self, now: OffsetDateTime) -> Option<i64> {
		self.max_age.or_else(|| self.expires.map(|at| (at - now).whole_seconds()))
	}
}

struct SetCookie<'a> {
	name: &'a str,
	value: &'a str,
	max_age: Option<i64>,
	expires: Option<OffsetDateTime>,
}

/// Returns the first `Set-Cookie` header whose cookie is named `cookie_name` and carries a value.
///
/// Malformed cookies are skipped rather than treated as errors. An empty value counts as absent,
/// matching how an empty legacy token header is treated.
pub fn extract_access_token(headers: &HeaderMap, cookie_name: &str) -> Option<AccessCookie> {
	headers
		.get_all(SET_COOKIE)
		.iter()
		.filter_map(|raw| raw.to_str().ok())
		.filter_map(parse_set_cookie)
		.find(|cookie| cookie.name == cookie_name && !cookie.value.is_empty())
		.map(|cookie| AccessCookie {
			value: AccessToken::new(cookie.value),
			max_age: cookie.max_age,
			expires: cookie.expires,
		})
}

fn parse_set_cookie(raw: &str) -> Option<SetCookie<'_>> {
	let mut parts = raw.split(';');
	let (name, value) = parts.next()?.split_once('=')?;
	let name = name.trim();
	let value = unquote(value.trim())?;

	if name.is_empty() || !name.bytes().all(is_token_byte) || !value.bytes().all(is_cookie_octet) {
		return None;
	}

	let mut cookie = SetCookie { name, value, max_age: None, expires: None };

	for attribute in parts {
		let (key, val) = match attribute.split_once('=') {
			Some((key, val)) => (key.trim(), val.trim()),
			None => (attribute.trim(), ""),
		};

		if key.eq_ignore_ascii_case("max-age") {
			if let Ok(secs) = val.parse::<i64>() {
				cookie.max_age = Some(secs);
			}
		} else if key.eq_ignore_ascii_case("expires") {
			cookie.expires = parse_http_date(val);
		}
	}

	Some(cookie)
}

fn unquote(value: &str) -> Option<&str> {
	match value.strip_prefix('"') {
		Some(rest) => rest.strip_suffix('"'),
		None => Some(value),
	}
}

// RFC 6265 token: visible ASCII minus separators.
fn is_token_byte(b: u8) -> bool {
	(0x21..=0x7E).contains(&b) && !b"()<>@,;:\\\"/[]?={}".contains(&b)
}

// RFC 6265 cookie-octet.
fn is_cookie_octet(b: u8) -> bool {
	matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

fn parse_http_date(raw: &str) -> Option<OffsetDateTime> {
	PrimitiveDateTime::parse(
		raw,
		format_description!(
			"[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
		),
	)
	.ok()
	.map(PrimitiveDateTime::assume_utc)
}

#[cfg(test)]
mod tests {
	// crates.io
	use http::HeaderValue;
	use time::macros;
	// self
	use super::*;

	const NAME: &str = "folioAccessToken";

	fn headers(values: &[&str]) -> HeaderMap {
		let mut map = HeaderMap::new();

		for value in values {
			map.append(SET_COOKIE, HeaderValue::from_str(value).expect("Fixture header is valid."));
		}

		map
	}

	#[test]
	fn extracts_value_and_max_age() {
		let cookie = extract_access_token(
			&headers(&["folioAccessToken=abc; Max-Age=3600; Path=/; HttpOnly"]),
			NAME,
		)
		.expect("Access cookie should be found.");

		assert_eq!(cookie.value.expose(), "abc");
		assert_eq!(cookie.max_age, Some(3600));
	}

	#[test]
	fn skips_other_cookies_and_keeps_first_match() {
		let cookie = extract_access_token(
			&headers(&[
				"folioRefreshToken=refresh; Max-Age=604800",
				"folioAccessToken=first; Max-Age=600",
				"folioAccessToken=second; Max-Age=60",
			]),
			NAME,
		)
		.expect("Access cookie should be found among several.");

		assert_eq!(cookie.value.expose(), "first");
		assert_eq!(cookie.max_age, Some(600));
	}

	#[test]
	fn missing_cookie_yields_none() {
		assert!(extract_access_token(&headers(&["other=1; Max-Age=5"]), NAME).is_none());
		assert!(extract_access_token(&HeaderMap::new(), NAME).is_none());
		// Names are case-sensitive.
		assert!(extract_access_token(&headers(&["FOLIOACCESSTOKEN=x"]), NAME).is_none());
	}

	#[test]
	fn empty_access_cookie_counts_as_absent() {
		let empty = headers(&["folioAccessToken=; Max-Age=3600"]);
		let quoted = headers(&["folioAccessToken=\"\"; Max-Age=60"]);

		assert!(extract_access_token(&empty, NAME).is_none());
		assert!(extract_access_token(&quoted, NAME).is_none());

		let cookie = extract_access_token(
			&headers(&["folioAccessToken=; Max-Age=0", "folioAccessToken=real; Max-Age=60"]),
			NAME,
		)
		.expect("A later non-empty cookie should still be found.");

		assert_eq!(cookie.value.expose(), "real");
	}

	#[test]
	fn attributes_are_case_insensitive_and_lenient() {
		let cookie = extract_access_token(&headers(&["folioAccessToken=\"q\"; max-age=30"]), NAME)
			.expect("Quoted cookie should parse.");

		assert_eq!(cookie.value.expose(), "q");
		assert_eq!(cookie.max_age, Some(30));

		let cookie = extract_access_token(&headers(&["folioAccessToken=v; Max-Age=soon"]), NAME)
			.expect("Unparsable max-age should be ignored, not fatal.");

		assert_eq!(cookie.max_age, None);
	}

	#[test]
	fn strict_decoding_rejects_malformed_pairs() {
		assert!(parse_set_cookie("novalue").is_none());
		assert!(parse_set_cookie("=abc").is_none());
		assert!(parse_set_cookie("bad name=abc").is_none());
		assert!(parse_set_cookie("name=a,b").is_none());
		assert!(parse_set_cookie("name=\"unterminated").is_none());
		assert!(parse_set_cookie("name=").is_some(), "Empty values are legal.");
	}

	#[test]
	fn expires_is_used_when_max_age_is_absent() {
		let cookie = extract_access_token(
			&headers(&["folioAccessToken=e; Expires=Wed, 21 Oct 2015 07:28:00 GMT"]),
			NAME,
		)
		.expect("Cookie with Expires should parse.");
		let expires = macros::datetime!(2015-10-21 07:28:00 UTC);

		assert_eq!(cookie.expires, Some(expires));
		assert_eq!(cookie.max_age_at(expires - Duration::seconds(90)), Some(90));

		let both = AccessCookie { max_age: Some(5), ..cookie };

		assert_eq!(both.max_age_at(expires - Duration::seconds(90)), Some(5));
	}
}

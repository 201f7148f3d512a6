//! Transport primitives shared by the login and listing calls.
//!
//! The module exposes [`ReqwestHttpClient`], the thin reqwest wrapper every request goes through,
//! and [`RateStatus`], the throttle telemetry the API attaches to each response.

// std
use std::ops::Deref;
// crates.io
use reqwest::{
	RequestBuilder, Response,
	header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, USER_AGENT},
	redirect::Policy,
};
use tokio_util::sync::CancellationToken;
// self
use crate::{_prelude::*, error::TransportError};

/// Fixed client identifier sent as `User-Agent` on every request.
pub const CLIENT_USER_AGENT: &str = concat!("reddit-stats/v", env!("CARGO_PKG_VERSION"));

/// Header carrying the remaining request budget.
pub const RATELIMIT_REMAINING: &str = "x-ratelimit-remaining";
/// Header carrying the seconds until the budget resets.
pub const RATELIMIT_RESET: &str = "x-ratelimit-reset";
/// Header carrying the requests used in the current window.
pub const RATELIMIT_USED: &str = "x-ratelimit-used";

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Redirects are never followed: both the token endpoint and the listing endpoint answer
/// directly, and a redirect usually means a login page or a renamed subreddit.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds the default client: fixed user agent, no redirects.
	pub fn try_default() -> Result<Self> {
		let client = ReqwestClient::builder()
			.user_agent(CLIENT_USER_AGENT)
			.redirect(Policy::none())
			.build()
			.map_err(crate::error::ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Sends `request`, aborting as soon as `cancel` fires.
	pub(crate) async fn send(
		&self,
		op: &'static str,
		request: RequestBuilder,
		cancel: &CancellationToken,
	) -> Result<Response> {
		tokio::select! {
			biased;
			_ = cancel.cancelled() => Err(Error::Cancelled),
			res = request.send() => res.map_err(|e| TransportError::network(op, e).into()),
		}
	}

	/// Reads the full body of `response`, aborting as soon as `cancel` fires.
	pub(crate) async fn body(
		op: &'static str,
		response: Response,
		cancel: &CancellationToken,
	) -> Result<Vec<u8>> {
		tokio::select! {
			biased;
			_ = cancel.cancelled() => Err(Error::Cancelled),
			res = response.bytes() => res
				.map(|bytes| bytes.to_vec())
				.map_err(|e| TransportError::network(op, e).into()),
		}
	}
}
impl Default for ReqwestHttpClient {
	fn default() -> Self {
		// Builder failures only come from TLS backend initialization; fall back to reqwest's own
		// defaults so construction stays infallible.
		Self::try_default().unwrap_or_else(|_| Self(ReqwestClient::new()))
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// `Content-Type` of listing requests.
pub const JSON_CONTENT: &str = "application/json";
/// `Content-Type` of the token request body.
pub const FORM_CONTENT: &str = "application/x-www-form-urlencoded";

/// Applies the standard header set, plus a bearer token when one is supplied.
pub(crate) fn std_headers(
	request: RequestBuilder,
	content_type: &'static str,
	bearer: Option<&str>,
) -> RequestBuilder {
	let request = request.header(CONTENT_TYPE, content_type).header(USER_AGENT, CLIENT_USER_AGENT);

	match bearer {
		Some(value) => request.header(AUTHORIZATION, value),
		None => request,
	}
}

/// Throttle telemetry reported by the API on every response.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RateStatus {
	/// Requests used in the current window.
	pub used: u64,
	/// Requests remaining in the current window; the API reports this as a decimal.
	pub remaining: f64,
	/// Seconds until the window resets.
	pub reset: u64,
}
impl RateStatus {
	/// Parses the `X-Ratelimit-*` headers. Absent headers read as zero.
	pub fn from_headers(headers: &HeaderMap) -> Result<Self> {
		Ok(Self {
			used: parse_header(headers, RATELIMIT_USED)?.unwrap_or_default(),
			remaining: parse_header(headers, RATELIMIT_REMAINING)?.unwrap_or_default(),
			reset: parse_header(headers, RATELIMIT_RESET)?.unwrap_or_default(),
		})
	}

	/// Time until the window resets.
	pub fn resets_in(&self) -> Duration {
		Duration::seconds(i64::try_from(self.reset).unwrap_or(i64::MAX))
	}
}

fn parse_header<T>(headers: &HeaderMap, name: &'static str) -> Result<Option<T>>
where
	T: std::str::FromStr,
{
	let Some(value) = headers.get(name) else {
		return Ok(None);
	};
	let invalid = || Error::InvalidRateHeader {
		header: name,
		value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
	};
	let raw = value.to_str().map_err(|_| invalid())?.trim();

	raw.parse().map(Some).map_err(|_| invalid())
}

//! Password-grant token exchange.
//!
//! [`Client::login`] validates its inputs before touching the network, posts a form-encoded
//! password grant to the token endpoint with HTTP Basic client authentication, and stores the
//! returned access token. The token's `expires_in` is logged but not tracked; there is no
//! automatic refresh.

// crates.io
use reqwest::{StatusCode, header::AUTHORIZATION};
use tokio_util::sync::CancellationToken;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	client::{Client, Endpoints},
	error::DecodeError,
	http::{self, ReqwestHttpClient},
	obs::{self, Operation, Outcome},
};

const OP: &str = "login";
const GRANT_TYPE: &str = "password";

#[derive(Debug, Deserialize)]
struct AccessTokenResponse {
	access_token: TokenSecret,
	#[serde(default)]
	expires_in: Option<u64>,
	#[serde(default)]
	#[allow(dead_code)]
	scope: Option<String>,
	#[serde(default, alias = "type")]
	#[allow(dead_code)]
	token_type: Option<String>,
}

impl Client {
	/// Exchanges the account credentials for a bearer token used by every listing call.
	///
	/// Calling it again overwrites the stored token. A success response carrying an empty token
	/// fails with [`Error::NotAuthenticated`] and leaves the stored token unchanged.
	pub async fn login(&mut self, cancel: &CancellationToken) -> Result<()> {
		let span = self.span.operation(Operation::Login, Endpoints::TOKEN_PATH);

		obs::record_outcome(Operation::Login, Outcome::Attempt);

		let result = span.instrument(self.exchange_password(cancel)).await;

		obs::record_outcome(Operation::Login, Outcome::of(&result));

		let token = result?;

		self.token = Some(token);

		Ok(())
	}

	async fn exchange_password(&self, cancel: &CancellationToken) -> Result<TokenSecret> {
		self.validate_login_inputs()?;

		let url = self.endpoints.token_url();
		let body = form_urlencoded::Serializer::new(String::new())
			.append_pair("username", self.credentials.username())
			.append_pair("password", self.credentials.password())
			.append_pair("grant_type", GRANT_TYPE)
			.finish();
		let request = http::std_headers(self.http_client.post(url.clone()), http::FORM_CONTENT, None)
			.header(AUTHORIZATION, self.credentials.basic_authorization())
			.body(body);

		self.admit(cancel).await?;

		let response = self.http_client.send(OP, request, cancel).await?;

		if response.status() != StatusCode::OK {
			return Err(Error::UnexpectedStatus {
				method: "POST",
				url: url.to_string(),
				status: response.status().as_u16(),
			});
		}

		let body = ReqwestHttpClient::body(OP, response, cancel).await?;
		let token = DecodeError::decode::<AccessTokenResponse>(OP, &body)?;

		if token.access_token.expose().is_empty() {
			return Err(Error::NotAuthenticated);
		}

		obs::log_logged_in(token.expires_in);

		Ok(token.access_token)
	}

	fn validate_login_inputs(&self) -> Result<()> {
		if !self.credentials.is_initialized() {
			return Err(Error::NotInitialized);
		}
		if self.credentials.username().is_empty() {
			return Err(Error::MissingInput { input: "username" });
		}
		if self.credentials.password().is_empty() {
			return Err(Error::MissingInput { input: "password" });
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn token_response_accepts_either_type_field() {
		for raw in [
			r#"{"access_token": "123", "token_type": "bearer", "expires_in": 86400, "scope": "*"}"#,
			r#"{"access_token": "123", "type": "bearer", "expires_in": 86400, "scope": "*"}"#,
			r#"{"access_token": "123"}"#,
		] {
			let response = DecodeError::decode::<AccessTokenResponse>(OP, raw.as_bytes())
				.expect("Token response fixture should decode.");

			assert_eq!(response.access_token.expose(), "123");
		}
	}

	#[test]
	fn token_response_requires_access_token() {
		let err = DecodeError::decode::<AccessTokenResponse>(OP, br#"{"expires_in": 1}"#)
			.expect_err("Missing access_token must fail decoding.");

		assert!(err.to_string().contains("login"));
	}
}

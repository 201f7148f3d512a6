//! Authenticated, rate-gated client for the listing API.
//!
//! A [`Client`] owns the credentials, the HTTP transport, and the rate gate. It starts without a
//! bearer token; [`Client::login`] obtains one and requires `&mut self`, so the token can only be
//! written while nobody else holds the client. Once the client is shared (typically behind an
//! [`Arc`]) the token is read-only for the rest of the process.

pub mod listing;
pub mod login;

// crates.io
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	auth::{Credentials, TokenSecret},
	ext::{ListingFuture, ListingSource, RateGate},
	http::ReqwestHttpClient,
	listing::Listing,
	obs::ObsSpan,
};

/// Base URLs of the unauthenticated token host and the authenticated API host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
	/// Host serving `/api/v1/access_token`.
	pub auth: Url,
	/// Host serving bearer-authenticated listing paths.
	pub api: Url,
}
impl Endpoints {
	/// Path of the token endpoint on [`Endpoints::auth`].
	pub const TOKEN_PATH: &str = "/api/v1/access_token";

	/// Absolute URL of the token endpoint; any path on [`Endpoints::auth`] is replaced.
	pub fn token_url(&self) -> Url {
		let mut url = self.auth.clone();

		url.set_path(Self::TOKEN_PATH);

		url
	}

	/// Absolute URL of `path` on the API host.
	pub fn api_url(&self, path: &str) -> Url {
		let mut url = self.api.clone();

		url.set_path(path);

		url
	}
}
impl Default for Endpoints {
	fn default() -> Self {
		Self {
			auth: Url::parse("https://www.reddit.com").expect("Static auth host URL is valid."),
			api: Url::parse("https://oauth.reddit.com").expect("Static API host URL is valid."),
		}
	}
}

/// Client for the rate-limited, OAuth-protected listing API.
#[derive(Clone)]
pub struct Client {
	credentials: Credentials,
	token: Option<TokenSecret>,
	http_client: ReqwestHttpClient,
	gate: Arc<dyn RateGate>,
	endpoints: Endpoints,
	span: ObsSpan,
}
impl Client {
	/// Creates an unauthenticated client that paces every request through `gate`.
	pub fn new(credentials: Credentials, gate: Arc<dyn RateGate>) -> Self {
		Self {
			credentials,
			token: None,
			http_client: ReqwestHttpClient::default(),
			gate,
			endpoints: Endpoints::default(),
			span: ObsSpan::component("client"),
		}
	}

	/// Replaces the HTTP transport.
	pub fn with_http_client(mut self, http_client: ReqwestHttpClient) -> Self {
		self.http_client = http_client;

		self
	}

	/// Points the client at different hosts.
	pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Parents every operation span under `span`.
	pub fn with_span(mut self, span: ObsSpan) -> Self {
		self.span = span;

		self
	}

	/// Hosts this client talks to.
	pub fn endpoints(&self) -> &Endpoints {
		&self.endpoints
	}

	/// Whether a bearer token has been obtained.
	pub fn is_authenticated(&self) -> bool {
		self.token.is_some()
	}

	fn bearer(&self) -> Result<String> {
		self.token.as_ref().map(TokenSecret::bearer).ok_or(Error::NotAuthenticated)
	}

	async fn admit(&self, cancel: &CancellationToken) -> Result<()> {
		self.gate.admit(cancel).await
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("credentials", &self.credentials)
			.field("authenticated", &self.token.is_some())
			.field("endpoints", &self.endpoints)
			.finish()
	}
}
impl ListingSource for Client {
	fn fetch_listing<'a>(
		&'a self,
		cancel: &'a CancellationToken,
		path: &'a str,
	) -> ListingFuture<'a, Listing> {
		Box::pin(Client::fetch_listing(self, cancel, path))
	}

	fn fetch_all_listings<'a>(
		&'a self,
		cancel: &'a CancellationToken,
		path: &'a str,
	) -> ListingFuture<'a, Vec<Listing>> {
		Box::pin(Client::fetch_all_listings(self, cancel, path))
	}
}

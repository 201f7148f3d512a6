//! Authenticated, rate-limited Reddit listing client plus a perpetual concurrent job runner that
//! keeps subreddit statistics fresh.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod ext;
pub mod http;
pub mod listing;
pub mod obs;
pub mod orchestrator;
pub mod report;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use tokio_util::sync::CancellationToken;

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::Credentials,
		client::{Client, Endpoints},
		ext::OpenGate,
	};

	/// Client identifier used by the test helpers.
	pub const TEST_CLIENT_ID: &str = "client-id";
	/// Client secret used by the test helpers.
	pub const TEST_CLIENT_SECRET: &str = "client-secret";
	/// Account name used by the test helpers.
	pub const TEST_USERNAME: &str = "unit-tester";
	/// Account password used by the test helpers.
	pub const TEST_PASSWORD: &str = "UnITTestEr";

	/// Routes both the token host and the API host to the same mock server base URL.
	pub fn mock_endpoints(base_url: &str) -> Endpoints {
		let base = Url::parse(base_url).expect("Mock server base URL should parse.");

		Endpoints { auth: base.clone(), api: base }
	}

	/// Builds the standard test credentials.
	pub fn test_credentials() -> Credentials {
		Credentials::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET, TEST_USERNAME, TEST_PASSWORD)
	}

	/// Constructs a [`Client`] that talks to `base_url` through an [`OpenGate`].
	pub fn build_test_client(base_url: &str) -> Client {
		build_test_client_with(base_url, test_credentials())
	}

	/// Same as [`build_test_client`] but with caller-provided credentials.
	pub fn build_test_client_with(base_url: &str, credentials: Credentials) -> Client {
		Client::new(credentials, Arc::new(OpenGate)).with_endpoints(mock_endpoints(base_url))
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::Duration;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use tokio_util::sync::CancellationToken;
pub use url;
#[cfg(test)] use httpmock as _;
#[cfg(feature = "cli")] use {color_eyre as _, tracing_subscriber as _};

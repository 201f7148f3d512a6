//! Long-lived credential pair supplied once per process.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use url::form_urlencoded;
// self
use crate::_prelude::*;

/// Application and account credentials used for the password grant.
///
/// Values are opaque and immutable once constructed. Emptiness is validated at login time, not
/// here, so that misconfiguration surfaces as a typed error from the operation that needs it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	client_id: String,
	client_secret: String,
	username: String,
	password: String,
}
impl Credentials {
	/// Bundles the application id/secret with the account username/password.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			username: username.into(),
			password: password.into(),
		}
	}

	/// Application identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// Account name.
	pub fn username(&self) -> &str {
		&self.username
	}

	/// Account password. Callers must avoid logging this string.
	pub fn password(&self) -> &str {
		&self.password
	}

	/// Whether both application credentials are present.
	pub fn is_initialized(&self) -> bool {
		!self.client_id.is_empty() && !self.client_secret.is_empty()
	}

	/// `Authorization` header value for HTTP Basic auth with query-escaped id and secret.
	pub fn basic_authorization(&self) -> String {
		let pair = format!("{}:{}", query_escape(&self.client_id), query_escape(&self.client_secret));

		format!("Basic {}", STANDARD.encode(pair))
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

fn query_escape(value: &str) -> String {
	form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn basic_authorization_escapes_before_encoding() {
		let credentials = Credentials::new("id/with space", "s&cret", "user", "pass");
		let expected = format!("Basic {}", STANDARD.encode("id%2Fwith+space:s%26cret"));

		assert_eq!(credentials.basic_authorization(), expected);
	}

	#[test]
	fn debug_redacts_secrets() {
		let credentials = Credentials::new("id", "hunter2", "user", "letmein");
		let rendered = format!("{credentials:?}");

		assert!(!rendered.contains("hunter2"));
		assert!(!rendered.contains("letmein"));
		assert!(rendered.contains("user"));
	}

	#[test]
	fn initialization_requires_id_and_secret() {
		assert!(Credentials::new("id", "secret", "", "").is_initialized());
		assert!(!Credentials::new("", "secret", "u", "p").is_initialized());
		assert!(!Credentials::new("id", "", "u", "p").is_initialized());
	}
}

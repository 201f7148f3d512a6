//! Secure token secret wrapper that redacts sensitive material.

// self
use crate::_prelude::*;

/// Redacted bearer token wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Formats the value of an `Authorization` header carrying this token.
	pub fn bearer(&self) -> String {
		format!("Bearer {}", self.0)
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(secret.bearer(), "Bearer super-secret");
	}

	#[test]
	fn secret_deserializes_from_plain_string() {
		let secret: TokenSecret =
			serde_json::from_str("\"123\"").expect("Token secret should deserialize.");

		assert_eq!(secret.expose(), "123");
	}
}

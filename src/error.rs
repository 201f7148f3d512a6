//! Crate-level error types shared by the client, the orchestrator, and the reporters.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, body read).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Response body could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),

	/// A required credential or argument was empty.
	#[error("Missing required input: {input}.")]
	MissingInput {
		/// Name of the empty input.
		input: &'static str,
	},
	/// The client was built without a client identifier or secret.
	#[error("Client is uninitialized; build it with a client id and secret.")]
	NotInitialized,
	/// A protected endpoint was called before a bearer token was obtained.
	#[error("Client is not authenticated; log in first.")]
	NotAuthenticated,
	/// The remote answered with a status other than success or throttling.
	#[error("Unexpected status code {status} ({method} {url}).")]
	UnexpectedStatus {
		/// HTTP method of the failed request.
		method: &'static str,
		/// URL or path of the failed request.
		url: String,
		/// Status code returned by the remote.
		status: u16,
	},
	/// The remote throttled the request with HTTP 429.
	#[error("Rate limit exceeded; resets in {resets_in}.")]
	RateLimitExceeded {
		/// Time until the remote quota resets, taken from `X-Ratelimit-Reset`.
		resets_in: Duration,
	},
	/// A rate limit header carried a non-numeric value.
	#[error("Rate limit header `{header}` is malformed: {value:?}.")]
	InvalidRateHeader {
		/// Offending header name.
		header: &'static str,
		/// Raw header value.
		value: String,
	},
	/// The shared cancellation token fired while the operation was blocked.
	#[error("Operation cancelled.")]
	Cancelled,
	/// A report could not be written to its output sink.
	#[error("Failed to write report output.")]
	Output(#[source] std::io::Error),
	/// Wraps an error with the operation that produced it.
	#[error("{context}: {source}")]
	Context {
		/// Caller-supplied description, e.g. `fetch top posts: golang`.
		context: String,
		/// Wrapped failure.
		#[source]
		source: Box<Error>,
	},
}
impl Error {
	/// Prefixes the error with caller context.
	pub fn context(self, context: impl Into<String>) -> Self {
		Self::Context { context: context.into(), source: Box::new(self) }
	}

	/// Returns `true` when the error, or the error it wraps, is [`Error::Cancelled`].
	pub fn is_cancelled(&self) -> bool {
		match self {
			Self::Cancelled => true,
			Self::Context { source, .. } => source.is_cancelled(),
			_ => false,
		}
	}

	/// Returns the innermost error, skipping any [`Error::Context`] layers.
	pub fn root(&self) -> &Self {
		match self {
			Self::Context { source, .. } => source.root(),
			other => other,
		}
	}
}

/// Configuration loading and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required key is absent from both the environment and the `.env` source.
	#[error("Missing configuration key `{key}`.")]
	Missing {
		/// Key name.
		key: &'static str,
	},
	/// A key is present but its value cannot be used.
	#[error("Invalid configuration key `{key}`: {reason}.")]
	Invalid {
		/// Key name.
		key: &'static str,
		/// Human-readable reason.
		reason: String,
	},
	/// The `.env` source could not be read or parsed.
	#[error("Configuration source could not be parsed.")]
	Source(#[from] dotenvy::Error),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Builds an [`ConfigError::Invalid`] value.
	pub fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
		Self::Invalid { key, reason: reason.into() }
	}

	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred during {op}.")]
	Network {
		/// Operation that issued the request.
		op: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error raised by `op`.
	pub fn network(op: &'static str, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { op, source: Box::new(src) }
	}
}

/// Response decoding failures.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// Body was not the JSON shape the operation expects.
	#[error("Malformed JSON in {op} response at `{path}`.")]
	Json {
		/// Operation that received the body.
		op: &'static str,
		/// JSON path where decoding stopped.
		path: String,
		/// Structured parsing failure.
		#[source]
		source: serde_json::Error,
	},
}
impl DecodeError {
	/// Decodes `body` as `T`, recording the JSON path of any failure.
	pub fn decode<T>(op: &'static str, body: &[u8]) -> Result<T, Self>
	where
		T: serde::de::DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(body);

		serde_path_to_error::deserialize(&mut de).map_err(|e| {
			let path = e.path().to_string();

			Self::Json { op, path, source: e.into_inner() }
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn context_layers_preserve_cancellation() {
		let err = Error::Cancelled.context("fetch all listings").context("fetch top authors: rust");

		assert!(err.is_cancelled());
		assert!(matches!(err.root(), Error::Cancelled));
		assert_eq!(
			err.to_string(),
			"fetch top authors: rust: fetch all listings: Operation cancelled."
		);
		assert!(!Error::NotAuthenticated.context("fetch").is_cancelled());
	}

	#[test]
	fn unexpected_status_echoes_request() {
		let err = Error::UnexpectedStatus {
			method: "POST",
			url: "https://www.reddit.com/api/v1/access_token".into(),
			status: 401,
		};

		assert_eq!(
			err.to_string(),
			"Unexpected status code 401 (POST https://www.reddit.com/api/v1/access_token)."
		);
	}

	#[test]
	fn decode_error_reports_json_path() {
		#[derive(Debug, Deserialize)]
		struct Outer {
			#[allow(dead_code)]
			data: Inner,
		}
		#[derive(Debug, Deserialize)]
		struct Inner {
			#[allow(dead_code)]
			ups: i64,
		}

		let err = DecodeError::decode::<Outer>("fetch listing", br#"{"data":{"ups":"many"}}"#)
			.expect_err("String score must not decode into an integer.");
		let DecodeError::Json { op, path, .. } = err;

		assert_eq!(op, "fetch listing");
		assert_eq!(path, "data.ups");
	}
}

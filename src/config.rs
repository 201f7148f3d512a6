//! Process configuration read from a `.env` source and the environment.
//!
//! Every key is looked up in the process environment first and in the `.env` source second, so
//! deployments can override individual values without editing the file.

// std
use std::{io::Read, path::Path, time::Duration as StdDuration};
// self
use crate::{_prelude::*, auth::Credentials, error::ConfigError};

const CLIENT_ID: &str = "REDDIT_CLIENT_ID";
const CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";
const USERNAME: &str = "REDDIT_USERNAME";
const PASSWORD: &str = "REDDIT_PASSWORD";
const SUBREDDITS: &str = "REDDIT_SUBREDDITS";
const RATE_LIMIT: &str = "REDDIT_RATE_LIMIT";
const TOP_N_AUTHORS: &str = "REDDIT_TOP_N_AUTHORS";
const LOG_LEVEL: &str = "REDDIT_LOG_LEVEL";
const IDLE_BACKOFF: &str = "REDDIT_IDLE_BACKOFF";

/// Log verbosity accepted by `REDDIT_LOG_LEVEL`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogLevel {
	/// Everything, including per-page and rate-status events.
	Debug,
	/// Lifecycle events.
	#[default]
	Info,
	/// Degraded conditions.
	Warn,
	/// Failures only.
	Error,
}
impl LogLevel {
	/// Returns the lowercase directive understood by log filters.
	pub const fn as_str(self) -> &'static str {
		match self {
			LogLevel::Debug => "debug",
			LogLevel::Info => "info",
			LogLevel::Warn => "warn",
			LogLevel::Error => "error",
		}
	}
}
impl Display for LogLevel {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl std::str::FromStr for LogLevel {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"debug" => Ok(LogLevel::Debug),
			"info" => Ok(LogLevel::Info),
			"warn" => Ok(LogLevel::Warn),
			"error" => Ok(LogLevel::Error),
			_ => Err(ConfigError::invalid(LOG_LEVEL, "must be one of debug, info, warn, error")),
		}
	}
}

/// Validated process configuration.
#[derive(Clone, Debug)]
pub struct Config {
	/// Application and account credentials.
	pub credentials: Credentials,
	/// Subreddits to report on.
	pub subreddits: Vec<String>,
	/// Minimum spacing between outbound requests.
	pub rate_limit: StdDuration,
	/// Number of authors listed in the top-authors report.
	pub top_n_authors: usize,
	/// Log verbosity.
	pub log_level: LogLevel,
	/// Pause between successful runs of the same job.
	pub idle_backoff: StdDuration,
}
impl Config {
	/// Reads `.env` from the working directory when present and overlays the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		match dotenvy::from_path_iter(".env") {
			Ok(file) => Self::from_pairs(file, env_var),
			Err(e) if e.not_found() =>
				Self::from_pairs(std::iter::empty::<Result<(String, String), dotenvy::Error>>(), env_var),
			Err(e) => Err(e.into()),
		}
	}

	/// Reads `path` as a `.env` file and overlays the process environment.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		Self::from_pairs(dotenvy::from_path_iter(path)?, env_var)
	}

	/// Reads `.env` syntax from `reader` and overlays the process environment.
	pub fn from_reader(reader: impl Read) -> Result<Self, ConfigError> {
		Self::from_pairs(dotenvy::from_read_iter(reader), env_var)
	}

	/// Builds the configuration from parsed `.env` pairs and an environment lookup that wins over
	/// them.
	pub fn from_pairs<I, F>(pairs: I, env: F) -> Result<Self, ConfigError>
	where
		I: IntoIterator<Item = Result<(String, String), dotenvy::Error>>,
		F: Fn(&str) -> Option<String>,
	{
		let file = pairs.into_iter().collect::<Result<HashMap<_, _>, _>>()?;
		let source = Source { file, env };
		let credentials = Credentials::new(
			source.required(CLIENT_ID)?,
			source.required(CLIENT_SECRET)?,
			source.required(USERNAME)?,
			source.required(PASSWORD)?,
		);
		let subreddits = parse_subreddits(&source.optional(SUBREDDITS, "golang"))?;
		let rate_limit = parse_duration(RATE_LIMIT, &source.optional(RATE_LIMIT, "1s"))?;
		let top_n_authors = source
			.optional(TOP_N_AUTHORS, "10")
			.trim()
			.parse::<usize>()
			.map_err(|e| ConfigError::invalid(TOP_N_AUTHORS, e.to_string()))?;
		let log_level = source.optional(LOG_LEVEL, "info").parse()?;
		let idle_backoff = parse_duration(IDLE_BACKOFF, &source.optional(IDLE_BACKOFF, "0s"))?;

		Ok(Self { credentials, subreddits, rate_limit, top_n_authors, log_level, idle_backoff })
	}
}

fn env_var(key: &str) -> Option<String> {
	std::env::var(key).ok()
}

struct Source<F> {
	file: HashMap<String, String>,
	env: F,
}
impl<F> Source<F>
where
	F: Fn(&str) -> Option<String>,
{
	fn lookup(&self, key: &str) -> Option<String> {
		(self.env)(key).or_else(|| self.file.get(key).cloned())
	}

	fn required(&self, key: &'static str) -> Result<String, ConfigError> {
		self.lookup(key).ok_or(ConfigError::Missing { key })
	}

	fn optional(&self, key: &str, default: &str) -> String {
		self.lookup(key).unwrap_or_else(|| default.to_owned())
	}
}

fn parse_subreddits(raw: &str) -> Result<Vec<String>, ConfigError> {
	let subreddits = raw
		.split(',')
		.map(str::trim)
		.filter(|name| !name.is_empty())
		.map(ToOwned::to_owned)
		.collect::<Vec<_>>();

	if subreddits.is_empty() {
		return Err(ConfigError::invalid(SUBREDDITS, "at least one subreddit is required"));
	}

	Ok(subreddits)
}

/// Parses `<integer><unit>` durations where unit is `ms`, `s`, `m`, or `h`.
fn parse_duration(key: &'static str, raw: &str) -> Result<StdDuration, ConfigError> {
	let raw = raw.trim();
	let split = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
	let (amount, unit) = raw.split_at(split);
	let invalid = || ConfigError::invalid(key, format!("`{raw}` is not a duration like 500ms or 1s"));
	let amount = amount.parse::<u64>().map_err(|_| invalid())?;
	let millis = match unit {
		"ms" => Some(amount),
		"s" => amount.checked_mul(1_000),
		"m" => amount.checked_mul(60_000),
		"h" => amount.checked_mul(3_600_000),
		_ => return Err(invalid()),
	};

	millis.map(StdDuration::from_millis).ok_or_else(invalid)
}

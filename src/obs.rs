//! Optional observability helpers for the client and the orchestrator.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `reddit_stats.component` (one per client or
//!   orchestrator, handed in at construction) and `reddit_stats.op` (one per operation) with the
//!   `op` and `path` fields, plus the events raised by the `log_*` helpers.
//! - Enable `metrics` to increment the `reddit_stats_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Password-grant token exchange.
	Login,
	/// Single listing page fetch.
	FetchListing,
	/// Full cursor walk over a listing.
	FetchAllListings,
	/// One invocation of an orchestrated job.
	Job,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Login => "login",
			Operation::FetchListing => "fetch_listing",
			Operation::FetchAllListings => "fetch_all_listings",
			Operation::Job => "job",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
	/// The shared cancellation token fired.
	Cancelled,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
			Outcome::Cancelled => "cancelled",
		}
	}

	/// Classifies a finished operation.
	pub fn of<T>(result: &Result<T>) -> Self {
		match result {
			Ok(_) => Outcome::Success,
			Err(e) if e.is_cancelled() => Outcome::Cancelled,
			Err(_) => Outcome::Failure,
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

// self
use crate::{_prelude::*, http::RateStatus, obs::Operation};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// Span handle owned by a component and used as the parent of its operation spans.
#[derive(Clone, Debug)]
pub struct ObsSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl ObsSpan {
	/// Creates the root span for a named component (`client`, `orchestrator`, ...).
	pub fn component(name: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("reddit_stats.component", component = name);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = name;

			Self {}
		}
	}

	/// Wraps an existing span, e.g. one created by the application around the whole run.
	#[cfg(feature = "tracing")]
	pub fn from_span(span: tracing::Span) -> Self {
		Self { span }
	}

	/// Creates a child span for one operation against `path`.
	pub fn operation(&self, op: Operation, path: &str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!(parent: &self.span, "reddit_stats.op", op = op.as_str(), path);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (op, path);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Debug event carrying the throttle telemetry of one response.
pub fn log_rate_status(status: &RateStatus) {
	#[cfg(feature = "tracing")]
	tracing::debug!(
		used = status.used,
		remaining = status.remaining,
		reset = status.reset,
		"rate status"
	);
	#[cfg(not(feature = "tracing"))]
	let _ = status;
}

/// Debug event emitted after each page of a full listing walk.
pub fn log_page_fetched(page: usize, entries: usize) {
	#[cfg(feature = "tracing")]
	tracing::debug!(page, entries, "fetched page of listings");
	#[cfg(not(feature = "tracing"))]
	let _ = (page, entries);
}

/// Debug event emitted once a bearer token has been stored.
pub fn log_logged_in(expires_in: Option<u64>) {
	#[cfg(feature = "tracing")]
	tracing::debug!(?expires_in, "bearer token obtained");
	#[cfg(not(feature = "tracing"))]
	let _ = expires_in;
}

/// Error event emitted when a job reports a failure.
pub fn log_job_failed(job: &str, error: &Error) {
	#[cfg(feature = "tracing")]
	tracing::error!(job, error = %error, "job failed");
	#[cfg(not(feature = "tracing"))]
	let _ = (job, error);
}

/// Info event emitted when a worker stops because of cancellation.
pub fn log_job_cancelled(job: &str) {
	#[cfg(feature = "tracing")]
	tracing::info!(job, "job cancelled");
	#[cfg(not(feature = "tracing"))]
	let _ = job;
}

/// Warn event emitted when a worker cannot report because the sink is gone.
pub fn log_sink_closed(job: &str) {
	#[cfg(feature = "tracing")]
	tracing::warn!(job, "failure sink closed; dropping report");
	#[cfg(not(feature = "tracing"))]
	let _ = job;
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn operation_span_noop_without_subscriber() {
		let span = ObsSpan::component("client").operation(Operation::FetchListing, "/r/rust");

		span.instrument(async { log_page_fetched(1, 25) }).await;
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = ObsSpan::component("orchestrator").operation(Operation::Job, "instrument");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}

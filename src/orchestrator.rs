//! Perpetual concurrent job runner.
//!
//! [`Orchestrator::run`] spawns one worker task per [`Job`] and returns immediately. Every worker
//! re-runs its job until either the job fails or the shared cancellation token fires; in both
//! cases it reports exactly once on the failure sink and exits. Because each worker reports at
//! most once, the sink never holds more than one message per job, which is why an unbounded
//! channel is used.
//!
//! Pacing is explicit: after every successful run the worker waits for the configured idle
//! backoff (or just yields to the scheduler when the backoff is zero) so a job without an
//! internal blocking point cannot monopolize a thread. Network pacing still comes from the rate
//! gate inside the listing client.

// std
use std::time::Duration as StdDuration;
// crates.io
use tokio::{
	sync::mpsc::UnboundedSender,
	task::{JoinError, JoinSet},
	time,
};
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	obs::{self, ObsSpan, Operation, Outcome},
};

/// Boxed future returned by [`Job::run`].
pub type JobFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a + Send>>;

/// One independently and perpetually re-run unit of work.
pub trait Job
where
	Self: Send + Sync,
{
	/// Stable label used in logs and failure reports.
	fn name(&self) -> &str;

	/// Runs the job once.
	fn run(&self) -> JobFuture<'_>;
}

/// [`Job`] built from a named closure; see [`job_fn`].
pub struct FnJob<F> {
	name: String,
	f: F,
}
impl<F, Fut> Job for FnJob<F>
where
	F: Send + Sync + Fn() -> Fut,
	Fut: 'static + Send + Future<Output = Result<()>>,
{
	fn name(&self) -> &str {
		&self.name
	}

	fn run(&self) -> JobFuture<'_> {
		Box::pin((self.f)())
	}
}
impl<F> Debug for FnJob<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FnJob").field("name", &self.name).finish()
	}
}

/// Wraps a zero-argument async closure as a shareable [`Job`].
pub fn job_fn<F, Fut>(name: impl Into<String>, f: F) -> Arc<dyn Job>
where
	F: 'static + Send + Sync + Fn() -> Fut,
	Fut: 'static + Send + Future<Output = Result<()>>,
{
	Arc::new(FnJob { name: name.into(), f })
}

/// Terminal report emitted by a worker right before it exits.
#[derive(Debug)]
pub struct JobFailure {
	/// Name of the job whose worker exited.
	pub job: String,
	/// The job's error, or [`Error::Cancelled`] when the worker stopped on cancellation.
	pub error: Error,
}
impl JobFailure {
	/// Whether the worker stopped because of cancellation rather than a job error.
	pub fn is_cancelled(&self) -> bool {
		self.error.is_cancelled()
	}
}

/// Result of one job invocation as seen by its worker.
#[derive(Debug)]
pub enum JobOutcome {
	/// The job succeeded; the worker keeps looping.
	Completed,
	/// The job failed; the worker reports and exits.
	Failed(Error),
	/// Cancellation fired before or during the run; the worker reports and exits.
	Cancelled,
}
impl From<Result<()>> for JobOutcome {
	fn from(result: Result<()>) -> Self {
		match result {
			Ok(()) => Self::Completed,
			Err(e) if e.is_cancelled() => Self::Cancelled,
			Err(e) => Self::Failed(e),
		}
	}
}

/// Spawns and supervises perpetual job workers.
#[derive(Clone, Debug)]
pub struct Orchestrator {
	idle_backoff: StdDuration,
	span: ObsSpan,
}
impl Orchestrator {
	/// Creates an orchestrator whose workers pause `idle_backoff` between successful runs.
	pub fn new(idle_backoff: StdDuration) -> Self {
		Self { idle_backoff, span: ObsSpan::component("orchestrator") }
	}

	/// Parents every worker span under `span`.
	pub fn with_span(mut self, span: ObsSpan) -> Self {
		self.span = span;

		self
	}

	/// Launches one worker per job and returns without waiting for any of them.
	///
	/// Must be called from within a Tokio runtime. Dropping the returned [`Workers`] aborts every
	/// worker.
	pub fn run<I>(
		&self,
		cancel: &CancellationToken,
		sink: UnboundedSender<JobFailure>,
		jobs: I,
	) -> Workers
	where
		I: IntoIterator<Item = Arc<dyn Job>>,
	{
		let mut set = JoinSet::new();

		for job in jobs {
			let span = self.span.operation(Operation::Job, job.name());
			let worker = Worker {
				job,
				cancel: cancel.clone(),
				sink: sink.clone(),
				idle_backoff: self.idle_backoff,
			};

			set.spawn(span.instrument(worker.work()));
		}

		Workers { set }
	}
}
impl Default for Orchestrator {
	fn default() -> Self {
		Self::new(StdDuration::ZERO)
	}
}

/// Handle over the spawned workers.
#[derive(Debug)]
pub struct Workers {
	set: JoinSet<()>,
}
impl Workers {
	/// Number of workers that have not been joined yet.
	pub fn len(&self) -> usize {
		self.set.len()
	}

	/// Whether every worker has been joined.
	pub fn is_empty(&self) -> bool {
		self.set.is_empty()
	}

	/// Waits for every worker to exit; returns the first join failure (panic or abort), if any.
	pub async fn wait(mut self) -> Result<(), JoinError> {
		let mut first_err = None;

		while let Some(joined) = self.set.join_next().await {
			if let Err(e) = joined {
				first_err.get_or_insert(e);
			}
		}

		first_err.map_or(Ok(()), Err)
	}

	/// Aborts every worker immediately without reporting.
	pub fn abort(&mut self) {
		self.set.abort_all();
	}
}

struct Worker {
	job: Arc<dyn Job>,
	cancel: CancellationToken,
	sink: UnboundedSender<JobFailure>,
	idle_backoff: StdDuration,
}
impl Worker {
	async fn work(self) {
		loop {
			match self.attempt().await {
				JobOutcome::Completed => self.pause().await,
				JobOutcome::Failed(error) => {
					obs::log_job_failed(self.job.name(), &error);
					self.report(error);

					return;
				},
				JobOutcome::Cancelled => {
					obs::log_job_cancelled(self.job.name());
					self.report(Error::Cancelled);

					return;
				},
			}
		}
	}

	async fn attempt(&self) -> JobOutcome {
		if self.cancel.is_cancelled() {
			return JobOutcome::Cancelled;
		}

		obs::record_outcome(Operation::Job, Outcome::Attempt);

		let result = tokio::select! {
			biased;
			_ = self.cancel.cancelled() => Err(Error::Cancelled),
			result = self.job.run() => result,
		};

		obs::record_outcome(Operation::Job, Outcome::of(&result));

		result.into()
	}

	async fn pause(&self) {
		if self.idle_backoff.is_zero() {
			tokio::task::yield_now().await;

			return;
		}

		tokio::select! {
			_ = self.cancel.cancelled() => {},
			_ = time::sleep(self.idle_backoff) => {},
		}
	}

	fn report(&self, error: Error) {
		let failure = JobFailure { job: self.job.name().to_owned(), error };

		if self.sink.send(failure).is_err() {
			obs::log_sink_closed(self.job.name());
		}
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	#[test]
	fn outcome_classifies_results() {
		assert!(matches!(JobOutcome::from(Ok(())), JobOutcome::Completed));
		assert!(matches!(
			JobOutcome::from(Err(Error::Cancelled.context("fetch top posts: rust"))),
			JobOutcome::Cancelled
		));
		assert!(matches!(JobOutcome::from(Err(Error::NotAuthenticated)), JobOutcome::Failed(_)));
	}

	#[tokio::test(start_paused = true)]
	async fn idle_backoff_paces_successful_runs() {
		let runs = Arc::new(AtomicUsize::new(0));
		let counter = runs.clone();
		let job = job_fn("counter", move || {
			let counter = counter.clone();

			async move {
				counter.fetch_add(1, Ordering::SeqCst);

				Ok(())
			}
		});
		let cancel = CancellationToken::new();
		let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
		let workers =
			Orchestrator::new(StdDuration::from_secs(10)).run(&cancel, tx, [job]);

		time::sleep(StdDuration::from_secs(25)).await;
		cancel.cancel();

		let failure = rx.recv().await.expect("Cancelled worker should report once.");

		assert!(failure.is_cancelled());
		assert_eq!(runs.load(Ordering::SeqCst), 3);

		workers.wait().await.expect("Workers should exit cleanly.");
	}
}

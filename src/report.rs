//! Subreddit reports: the fetch-and-report jobs the orchestrator keeps re-running.

pub mod sink;
pub mod stats;

pub use sink::*;
pub use stats::*;

// crates.io
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	ext::ListingSource,
	orchestrator::{Job, job_fn},
};

/// Fetches listings for a subreddit, computes statistics, and publishes them to a sink.
#[derive(Clone)]
pub struct Reporter {
	source: Arc<dyn ListingSource>,
	sink: Arc<dyn ReportSink>,
}
impl Reporter {
	/// Creates a reporter reading from `source` and writing to `sink`.
	pub fn new(source: Arc<dyn ListingSource>, sink: Arc<dyn ReportSink>) -> Self {
		Self { source, sink }
	}

	/// Publishes the current top posts of `subreddit`.
	pub async fn top_posts(&self, cancel: &CancellationToken, subreddit: &str) -> Result<()> {
		let path = format!("/r/{subreddit}/top");
		let listing = self
			.source
			.fetch_listing(cancel, &path)
			.await
			.map_err(|e| e.context(format!("fetch top posts: {subreddit}")))?;

		self.sink
			.publish(&format!("Top Posts ({subreddit})"), &post_lines(&listing))
			.map_err(|e| e.context(format!("write: {subreddit}")))
	}

	/// Walks the whole `subreddit` listing and publishes its `n` most active authors.
	pub async fn top_authors(
		&self,
		cancel: &CancellationToken,
		subreddit: &str,
		n: usize,
	) -> Result<()> {
		let path = format!("/r/{subreddit}");
		let pages = self
			.source
			.fetch_all_listings(cancel, &path)
			.await
			.map_err(|e| e.context(format!("fetch top authors: {subreddit}")))?;
		let lines = top_authors(&pages, n).iter().map(ToString::to_string).collect::<Vec<_>>();

		self.sink
			.publish(&format!("Top {n} Authors ({subreddit})"), &lines)
			.map_err(|e| e.context(format!("write: {subreddit}")))
	}

	/// Builds the two jobs per subreddit: `top-posts:<name>` and `top-authors:<name>`.
	pub fn jobs(
		&self,
		cancel: &CancellationToken,
		subreddits: &[String],
		top_n_authors: usize,
	) -> Vec<Arc<dyn Job>> {
		let mut jobs = Vec::with_capacity(subreddits.len() * 2);

		for subreddit in subreddits {
			let (reporter, cancel_token, name) = (self.clone(), cancel.clone(), subreddit.clone());

			jobs.push(job_fn(format!("top-posts:{subreddit}"), move || {
				let (reporter, cancel, name) = (reporter.clone(), cancel_token.clone(), name.clone());

				async move { reporter.top_posts(&cancel, &name).await }
			}));

			let (reporter, cancel_token, name) = (self.clone(), cancel.clone(), subreddit.clone());

			jobs.push(job_fn(format!("top-authors:{subreddit}"), move || {
				let (reporter, cancel, name) = (reporter.clone(), cancel_token.clone(), name.clone());

				async move { reporter.top_authors(&cancel, &name, top_n_authors).await }
			}));
		}

		jobs
	}
}
impl Debug for Reporter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("Reporter(..)")
	}
}

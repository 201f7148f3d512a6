//! Logs in once, then keeps top-posts and top-authors reports fresh for every configured subreddit
//! until a job fails or the process receives SIGINT/SIGTERM.

// std
use std::{io, process::ExitCode, sync::Arc};
// crates.io
use color_eyre::Result;
use tokio::{signal, sync::mpsc};
use tracing_subscriber::EnvFilter;
// self
use reddit_stats::{
	CancellationToken,
	client::Client,
	config::Config,
	ext::IntervalGate,
	http::ReqwestHttpClient,
	obs::ObsSpan,
	orchestrator::Orchestrator,
	report::{Reporter, WriterSink},
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
	color_eyre::install()?;

	let config = Config::from_env()?;

	init_tracing(&config);

	let cancel = CancellationToken::new();
	let run_span = ObsSpan::from_span(tracing::info_span!("reddit_stats.run"));

	tokio::spawn(cancel_on_signal(cancel.clone()));

	let mut client = Client::new(
		config.credentials.clone(),
		Arc::new(IntervalGate::new(config.rate_limit)),
	)
	.with_http_client(ReqwestHttpClient::try_default()?)
	.with_span(run_span.clone());

	match client.login(&cancel).await {
		Ok(()) => {},
		Err(e) if e.is_cancelled() => return Ok(ExitCode::SUCCESS),
		Err(e) => return Err(e.into()),
	}

	let reporter = Reporter::new(Arc::new(client), Arc::new(WriterSink::new(io::stdout())));
	let jobs = reporter.jobs(&cancel, &config.subreddits, config.top_n_authors);
	let (tx, mut rx) = mpsc::unbounded_channel();
	let workers = Orchestrator::new(config.idle_backoff).with_span(run_span).run(&cancel, tx, jobs);

	tracing::info!(jobs = workers.len(), subreddits = ?config.subreddits, "workers started");

	// Cancellation makes every worker report, so the first message always arrives.
	let exit = match rx.recv().await {
		Some(failure) if !failure.is_cancelled() => {
			tracing::error!(job = %failure.job, error = %failure.error, "job failed; shutting down");

			ExitCode::FAILURE
		},
		_ => ExitCode::SUCCESS,
	};

	cancel.cancel();
	workers.wait().await?;

	Ok(exit)
}

fn init_tracing(config: &Config) {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

async fn cancel_on_signal(cancel: CancellationToken) {
	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			},
			Err(_) => std::future::pending::<()>().await,
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = signal::ctrl_c() => {},
		_ = terminate => {},
	}

	tracing::info!("shutdown signal received");
	cancel.cancel();
}

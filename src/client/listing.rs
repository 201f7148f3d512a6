//! Bearer-authenticated listing fetches and the cursor-following walk.

// crates.io
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	client::Client,
	error::DecodeError,
	http::{self, RateStatus, ReqwestHttpClient},
	listing::{Listing, PageCursor},
	obs::{self, Operation, Outcome},
};

const OP: &str = "fetch listing";

impl Client {
	/// Fetches a single page of the listing at `path` with no pagination parameters.
	pub async fn fetch_listing(&self, cancel: &CancellationToken, path: &str) -> Result<Listing> {
		let span = self.span.operation(Operation::FetchListing, path);

		obs::record_outcome(Operation::FetchListing, Outcome::Attempt);

		let result = span.instrument(self.fetch_page(cancel, path, &PageCursor::default())).await;

		obs::record_outcome(Operation::FetchListing, Outcome::of(&result));

		result
	}

	/// Walks every page of the listing at `path`, in server order.
	///
	/// Pages are requested strictly one after another because each cursor comes from the previous
	/// response. Any failing page aborts the walk and discards the pages already fetched.
	pub async fn fetch_all_listings(
		&self,
		cancel: &CancellationToken,
		path: &str,
	) -> Result<Vec<Listing>> {
		let span = self.span.operation(Operation::FetchAllListings, path);

		obs::record_outcome(Operation::FetchAllListings, Outcome::Attempt);

		let result: Result<Vec<Listing>> = span
			.instrument(async move {
				let mut cursor = PageCursor::first_page();
				let mut pages = Vec::new();

				loop {
					let page = self.fetch_page(cancel, path, &cursor).await?;
					let last = page.is_last_page();

					cursor.advance(&page);
					obs::log_page_fetched(pages.len() + 1, page.entries.len());
					pages.push(page);

					if last {
						break;
					}
				}

				Ok(pages)
			})
			.await;

		obs::record_outcome(Operation::FetchAllListings, Outcome::of(&result));

		result
	}

	async fn fetch_page(
		&self,
		cancel: &CancellationToken,
		path: &str,
		cursor: &PageCursor,
	) -> Result<Listing> {
		let bearer = self.bearer()?;
		let mut url = self.endpoints.api_url(path);
		let pairs = cursor.query_pairs();

		if !pairs.is_empty() {
			url.query_pairs_mut().extend_pairs(pairs);
		}

		let request =
			http::std_headers(self.http_client.get(url), http::JSON_CONTENT, Some(&bearer));

		self.admit(cancel).await?;

		let response = self.http_client.send(OP, request, cancel).await?;
		let rate = RateStatus::from_headers(response.headers())?;

		obs::log_rate_status(&rate);

		match response.status() {
			StatusCode::OK => {
				let body = ReqwestHttpClient::body(OP, response, cancel).await?;

				Ok(DecodeError::decode(OP, &body)?)
			},
			StatusCode::TOO_MANY_REQUESTS =>
				Err(Error::RateLimitExceeded { resets_in: rate.resets_in() }),
			status => Err(Error::UnexpectedStatus {
				method: "GET",
				url: path.to_owned(),
				status: status.as_u16(),
			}),
		}
	}
}

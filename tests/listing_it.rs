// crates.io
use httpmock::prelude::*;
// self
use reddit_stats::{
	_preludet::*,
	client::{Client, Endpoints},
	error::TransportError,
	ext::ListingSource,
	http::CLIENT_USER_AGENT,
};

const TOKEN_BODY: &str = r#"{"access_token": "123", "token_type": "bearer", "expires_in": 86400, "scope": "*"}"#;
const FIRST_PAGE: &str = r#"{"kind": "Listing", "data": {"after": "ou812", "children": [
	{"kind": "t3", "data": {"title": "Greatest shortstop", "name": "t3_1", "ups": 1111, "author": "Ozzie Smith"}}
]}}"#;
const LAST_PAGE: &str = r#"{"kind": "Listing", "data": {"after": null, "children": [
	{"kind": "t3", "data": {"title": "Backflips", "name": "t3_2", "ups": 11, "author": "John Doe"}},
	{"kind": "t3", "data": {"title": "Gold gloves", "name": "t3_3", "ups": 13, "author": "Ozzie Smith"}}
]}}"#;

async fn logged_in_client(server: &MockServer) -> Client {
	server
		.mock_async(|when, then| {
			when.method(POST).path(Endpoints::TOKEN_PATH);
			then.status(200).header("content-type", "application/json").body(TOKEN_BODY);
		})
		.await;

	let mut client = build_test_client(&server.base_url());

	client.login(&CancellationToken::new()).await.expect("Mock login should succeed.");

	client
}

#[tokio::test]
async fn fetch_all_listings_sends_bearer_and_walk_limit() {
	let server = MockServer::start_async().await;
	let client = logged_in_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/r/test")
				.query_param("limit", "1000")
				.query_param_missing("after")
				.query_param_missing("count")
				.header("authorization", "Bearer 123")
				.header("content-type", "application/json")
				.header("user-agent", CLIENT_USER_AGENT);
			then.status(200)
				.header("x-ratelimit-used", "1")
				.header("x-ratelimit-remaining", "599.0")
				.header("x-ratelimit-reset", "540")
				.body(LAST_PAGE);
		})
		.await;
	let pages = client
		.fetch_all_listings(&CancellationToken::new(), "/r/test")
		.await
		.expect("Single-page walk should succeed.");

	assert_eq!(pages.len(), 1);
	assert_eq!(pages[0].entries.len(), 2);
	assert!(pages[0].is_last_page());

	mock.assert_async().await;
}

#[tokio::test]
async fn fetch_all_listings_follows_cursor_in_order() {
	let server = MockServer::start_async().await;
	let client = logged_in_client(&server).await;
	let first = server
		.mock_async(|when, then| {
			when.method(GET).path("/r/test").query_param_missing("after");
			then.status(200).body(FIRST_PAGE);
		})
		.await;
	let last = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/r/test")
				.query_param("after", "ou812")
				.query_param("count", "1")
				.query_param("limit", "1000");
			then.status(200).body(LAST_PAGE);
		})
		.await;
	let pages = client
		.fetch_all_listings(&CancellationToken::new(), "/r/test")
		.await
		.expect("Two-page walk should succeed.");
	let titles = pages
		.iter()
		.flat_map(|page| &page.entries)
		.map(|entry| entry.title.as_str())
		.collect::<Vec<_>>();

	assert_eq!(pages.len(), 2);
	assert_eq!(titles, ["Greatest shortstop", "Backflips", "Gold gloves"]);

	first.assert_async().await;
	last.assert_async().await;
}

#[tokio::test]
async fn fetch_all_listings_aborts_on_failing_page() {
	let server = MockServer::start_async().await;
	let client = logged_in_client(&server).await;
	let _first = server
		.mock_async(|when, then| {
			when.method(GET).path("/r/test").query_param_missing("after");
			then.status(200).body(FIRST_PAGE);
		})
		.await;
	let _failing = server
		.mock_async(|when, then| {
			when.method(GET).path("/r/test").query_param("after", "ou812");
			then.status(500);
		})
		.await;
	let err = client
		.fetch_all_listings(&CancellationToken::new(), "/r/test")
		.await
		.expect_err("A failing second page must abort the walk.");

	assert!(
		matches!(err, Error::UnexpectedStatus { method: "GET", ref url, status: 500 } if url == "/r/test"),
		"Got {err:?}."
	);
}

#[tokio::test]
async fn fetch_listing_sends_no_pagination_query() {
	let server = MockServer::start_async().await;
	let client = logged_in_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/r/test/top")
				.query_param_missing("limit")
				.query_param_missing("after")
				.header("authorization", "Bearer 123");
			then.status(200).body(FIRST_PAGE);
		})
		.await;
	let listing = ListingSource::fetch_listing(&client, &CancellationToken::new(), "/r/test/top")
		.await
		.expect("Single page fetch should succeed.");

	assert_eq!(listing.entries[0].score, 1111);
	assert_eq!(listing.after.as_deref(), Some("ou812"));

	mock.assert_async().await;
}

#[tokio::test]
async fn throttled_response_reports_reset_window() {
	let server = MockServer::start_async().await;
	let client = logged_in_client(&server).await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/r/test/top");
			then.status(429)
				.header("x-ratelimit-used", "600")
				.header("x-ratelimit-remaining", "0")
				.header("x-ratelimit-reset", "42");
		})
		.await;
	let err = client
		.fetch_listing(&CancellationToken::new(), "/r/test/top")
		.await
		.expect_err("A 429 must fail the fetch.");

	assert!(
		matches!(err, Error::RateLimitExceeded { resets_in } if resets_in == Duration::seconds(42)),
		"Got {err:?}."
	);
}

#[tokio::test]
async fn malformed_rate_header_fails_the_fetch() {
	let server = MockServer::start_async().await;
	let client = logged_in_client(&server).await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/r/test/top");
			then.status(200).header("x-ratelimit-used", "lots").body(FIRST_PAGE);
		})
		.await;
	let err = client
		.fetch_listing(&CancellationToken::new(), "/r/test/top")
		.await
		.expect_err("A non-numeric rate header must fail the fetch.");

	assert!(
		matches!(err, Error::InvalidRateHeader { header: "x-ratelimit-used", ref value } if value == "lots"),
		"Got {err:?}."
	);
}

#[tokio::test]
async fn fetch_requires_login() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/r/test");
			then.status(200).body(LAST_PAGE);
		})
		.await;
	let client = build_test_client(&server.base_url());
	let err = client
		.fetch_all_listings(&CancellationToken::new(), "/r/test")
		.await
		.expect_err("Fetching before login must fail.");

	assert!(matches!(err, Error::NotAuthenticated), "Got {err:?}.");

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn cancelled_fetch_sends_nothing() {
	let server = MockServer::start_async().await;
	let client = logged_in_client(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/r/test");
			then.status(200).body(LAST_PAGE);
		})
		.await;
	let cancel = CancellationToken::new();

	cancel.cancel();

	let err = client
		.fetch_all_listings(&cancel, "/r/test")
		.await
		.expect_err("A cancelled walk must not succeed.");

	assert!(err.is_cancelled());

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn unreachable_host_maps_to_transport_error() {
	let server = MockServer::start_async().await;
	let client =
		logged_in_client(&server).await.with_endpoints(mock_endpoints("http://127.0.0.1:1"));
	let err = client
		.fetch_listing(&CancellationToken::new(), "/r/test")
		.await
		.expect_err("An unreachable API host must fail the fetch.");

	assert!(
		matches!(err, Error::Transport(TransportError::Network { op: "fetch listing", .. })),
		"Got {err:?}."
	);
}

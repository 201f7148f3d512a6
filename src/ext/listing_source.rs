//! Listing provider contract consumed by the reporters.

// crates.io
use tokio_util::sync::CancellationToken;
// self
use crate::{_prelude::*, listing::Listing};

/// Boxed future returned by [`ListingSource`] operations.
pub type ListingFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Anything that can fetch listings from the protected API.
pub trait ListingSource
where
	Self: Send + Sync,
{
	/// Fetches the first page of the listing at `path`.
	fn fetch_listing<'a>(
		&'a self,
		cancel: &'a CancellationToken,
		path: &'a str,
	) -> ListingFuture<'a, Listing>;

	/// Fetches every page of the listing at `path`, in server order.
	fn fetch_all_listings<'a>(
		&'a self,
		cancel: &'a CancellationToken,
		path: &'a str,
	) -> ListingFuture<'a, Vec<Listing>>;
}

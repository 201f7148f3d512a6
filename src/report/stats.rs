//! Statistics computed from fetched listings.

// self
use crate::{_prelude::*, listing::Listing};

/// Number of entries an author has in a listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorCount {
	/// Author account name.
	pub author: String,
	/// Entries attributed to the author.
	pub posts: usize,
}
impl Display for AuthorCount {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "({}) - {}", self.posts, self.author)
	}
}

/// Renders each entry of `listing` as `(<score>) - <title>`, in server order.
pub fn post_lines(listing: &Listing) -> Vec<String> {
	listing.entries.iter().map(|entry| format!("({}) - {}", entry.score, entry.title)).collect()
}

/// Counts entries per author across `pages` and keeps the `n` most active authors.
///
/// Ordering is by count, descending; authors with equal counts keep the order in which they
/// first appeared.
pub fn top_authors(pages: &[Listing], n: usize) -> Vec<AuthorCount> {
	let mut index = HashMap::<&str, usize>::new();
	let mut counts = Vec::<AuthorCount>::new();

	for entry in pages.iter().flat_map(|page| &page.entries) {
		match index.get(entry.author.as_str()) {
			Some(&slot) => counts[slot].posts += 1,
			None => {
				index.insert(&entry.author, counts.len());
				counts.push(AuthorCount { author: entry.author.clone(), posts: 1 });
			},
		}
	}

	counts.sort_by(|a, b| b.posts.cmp(&a.posts));
	counts.truncate(n);

	counts
}

//! Listing pages, entries, and the pagination cursor.

// self
use crate::_prelude::*;

/// Opaque pagination state echoed back to the listing endpoint.
///
/// Only non-empty strings and non-zero counters are serialized into the query string.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageCursor {
	/// Server-issued pointer to the next page.
	pub after: String,
	/// Server-issued pointer to the previous page.
	pub before: String,
	/// Number of items already walked past.
	pub count: usize,
	/// Maximum number of items per page.
	pub limit: usize,
}
impl PageCursor {
	/// Page size requested while walking a full listing.
	pub const FULL_WALK_LIMIT: usize = 1000;

	/// Cursor for the first page of a full listing walk.
	pub fn first_page() -> Self {
		Self { limit: Self::FULL_WALK_LIMIT, ..Default::default() }
	}

	/// Moves the cursor past `page`.
	///
	/// `count` accumulates across pages because the server interprets it as the number of items
	/// skipped so far.
	pub fn advance(&mut self, page: &Listing) {
		self.after = page.after.clone().unwrap_or_default();
		self.count += page.entries.len();
	}

	/// Query pairs in `after`, `before`, `count`, `limit` order.
	pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
		let mut pairs = Vec::with_capacity(4);

		if !self.after.is_empty() {
			pairs.push(("after", self.after.clone()));
		}
		if !self.before.is_empty() {
			pairs.push(("before", self.before.clone()));
		}
		if self.count > 0 {
			pairs.push(("count", self.count.to_string()));
		}
		if self.limit > 0 {
			pairs.push(("limit", self.limit.to_string()));
		}

		pairs
	}
}

/// One page of ranked entries plus the cursor to the next page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Listing {
	/// Entries in server order.
	pub entries: Vec<Entry>,
	/// Cursor to the next page; `None` on the terminal page.
	pub after: Option<String>,
}
impl Listing {
	/// Whether this is the last page of the listing.
	pub fn is_last_page(&self) -> bool {
		self.after.is_none()
	}
}
impl<'de> Deserialize<'de> for Listing {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let ListingData { after, children } = ListingEnvelope::deserialize(deserializer)?.data;

		Ok(Self {
			entries: children.into_iter().map(|child| child.data).collect(),
			after: after.filter(|after| !after.is_empty()),
		})
	}
}

/// A single ranked content record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
	/// Fullname of the record, e.g. `t3_abc123`.
	#[serde(rename = "name", default)]
	pub id: String,
	/// Title.
	#[serde(default)]
	pub title: String,
	/// Upvote score.
	#[serde(rename = "ups", default)]
	pub score: i64,
	/// Author account name.
	#[serde(default)]
	pub author: String,
}

#[derive(Deserialize)]
struct ListingEnvelope {
	data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
	#[serde(default)]
	after: Option<String>,
	#[serde(default)]
	children: Vec<Child>,
}

#[derive(Deserialize)]
struct Child {
	data: Entry,
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const PAGE_JSON: &str = r#"{"kind": "Listing", "data": {
		"after": "t3_next",
		"children": [
			{"kind": "t3", "data": {"title": "First", "name": "t3_a", "ups": 1337, "author": "alice"}},
			{"kind": "t3", "data": {"title": "Second", "name": "t3_b", "ups": 17, "author": "bob"}}
		]}}"#;

	#[test]
	fn listing_decodes_wire_envelope() {
		let listing: Listing = serde_json::from_str(PAGE_JSON).expect("Fixture should decode.");

		assert_eq!(listing.after.as_deref(), Some("t3_next"));
		assert_eq!(listing.entries.len(), 2);
		assert_eq!(listing.entries[0], Entry {
			id: "t3_a".into(),
			title: "First".into(),
			score: 1337,
			author: "alice".into(),
		});
		assert!(!listing.is_last_page());
	}

	#[test]
	fn null_or_empty_after_marks_terminal_page() {
		for after in ["null", "\"\""] {
			let raw = format!(r#"{{"data": {{"after": {after}, "children": []}}}}"#);
			let listing: Listing = serde_json::from_str(&raw).expect("Terminal page should decode.");

			assert!(listing.is_last_page(), "`after: {after}` must end the walk.");
		}

		let listing: Listing =
			serde_json::from_str(r#"{"data": {}}"#).expect("Bare page should decode.");

		assert!(listing.is_last_page());
		assert!(listing.entries.is_empty());
	}

	#[test]
	fn cursor_serializes_only_set_fields() {
		assert!(PageCursor::default().query_pairs().is_empty());
		assert_eq!(PageCursor::first_page().query_pairs(), vec![("limit", "1000".to_string())]);

		let cursor =
			PageCursor { after: "a".into(), before: "b".into(), count: 3, limit: 25 };

		assert_eq!(cursor.query_pairs(), vec![
			("after", "a".to_string()),
			("before", "b".to_string()),
			("count", "3".to_string()),
			("limit", "25".to_string()),
		]);
	}

	#[test]
	fn cursor_count_accumulates_across_pages() {
		let mut cursor = PageCursor::first_page();
		let page: Listing = serde_json::from_str(PAGE_JSON).expect("Fixture should decode.");

		cursor.advance(&page);
		assert_eq!(cursor.after, "t3_next");
		assert_eq!(cursor.count, 2);

		cursor.advance(&page);
		assert_eq!(cursor.count, 4);
	}
}

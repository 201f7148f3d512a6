//! Public extension contracts (rate gating, listing sources).
//!
//! The client depends on [`RateGate`] only through its contract so callers can bring their own
//! admission policy, and the reporters depend on [`ListingSource`] so they can run against any
//! listing provider, including fakes in tests.

pub mod listing_source;
pub mod rate_gate;

pub use listing_source::*;
pub use rate_gate::*;

//! Admission contract consulted before every outbound request, plus the built-in gates.

// std
use std::time::Duration as StdDuration;
// crates.io
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;
// self
use crate::_prelude::*;

const FAR_FUTURE: StdDuration = StdDuration::from_secs(86_400 * 365 * 30);

/// Boxed future returned by [`RateGate::admit`].
pub type GateFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + 'a + Send>>;

/// Paces outbound calls to respect a remote quota.
pub trait RateGate
where
	Self: Send + Sync,
{
	/// Resolves once the caller may proceed, or with [`Error::Cancelled`] once `cancel` fires,
	/// whichever comes first.
	fn admit<'a>(&'a self, cancel: &'a CancellationToken) -> GateFuture<'a>;
}

/// Gate that admits immediately unless cancellation has already fired.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenGate;
impl RateGate for OpenGate {
	fn admit<'a>(&'a self, cancel: &'a CancellationToken) -> GateFuture<'a> {
		Box::pin(async move { if cancel.is_cancelled() { Err(Error::Cancelled) } else { Ok(()) } })
	}
}

/// Token bucket with a burst of one: at most one admission per `interval`.
///
/// Each caller reserves the next free slot under a short lock and then sleeps until that slot
/// outside the lock, so concurrent callers are admitted in reservation order. A caller cancelled
/// while waiting hands its slot back unless a later caller has already reserved behind it.
#[derive(Debug)]
pub struct IntervalGate {
	interval: StdDuration,
	next_slot: Mutex<Option<Instant>>,
}
impl IntervalGate {
	/// Creates a gate admitting one caller per `interval`. A zero interval never blocks.
	pub fn new(interval: StdDuration) -> Self {
		Self { interval, next_slot: Mutex::new(None) }
	}

	/// Configured spacing between admissions.
	pub fn interval(&self) -> StdDuration {
		self.interval
	}

	fn reserve(&self) -> Instant {
		let now = Instant::now();
		let mut next_slot = self.next_slot.lock();
		let slot = next_slot.map_or(now, |next| next.max(now));

		*next_slot = Some(self.slot_after(slot));

		slot
	}

	fn release(&self, slot: Instant) {
		let mut next_slot = self.next_slot.lock();

		if *next_slot == Some(self.slot_after(slot)) {
			*next_slot = Some(slot);
		}
	}

	// Intervals too large to add to an instant saturate at a slot decades away.
	fn slot_after(&self, slot: Instant) -> Instant {
		slot.checked_add(self.interval).or_else(|| slot.checked_add(FAR_FUTURE)).unwrap_or(slot)
	}
}
impl RateGate for IntervalGate {
	fn admit<'a>(&'a self, cancel: &'a CancellationToken) -> GateFuture<'a> {
		Box::pin(async move {
			if cancel.is_cancelled() {
				return Err(Error::Cancelled);
			}

			let slot = self.reserve();

			tokio::select! {
				biased;
				_ = cancel.cancelled() => {
					self.release(slot);

					Err(Error::Cancelled)
				},
				_ = time::sleep_until(slot) => Ok(()),
			}
		})
	}
}

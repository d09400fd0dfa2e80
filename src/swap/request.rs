//! In-flight quote requests.
//!
//! Every request carries a sequence number. Only the response to the most
//! recently issued request is applied; anything older is dropped on arrival.

use super::quote::QuoteInput;
use crate::errors::Result;
use crate::router::{RouteQuote, Router};

/// Issues request sequence numbers and tells stale ones apart.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Drops interest in whatever is pending without issuing a new request.
    pub fn cancel_pending(&mut self) {
        self.latest += 1;
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.latest
    }

    pub fn latest(&self) -> u64 {
        self.latest
    }
}

/// Snapshot of the inputs a quote was requested for.
#[derive(Debug, Clone)]
pub struct QuoteRequest {
    pub seq: u64,
    pub input: QuoteInput,
}

impl QuoteRequest {
    /// Asks the router for the best route. Zero amounts skip the router.
    pub async fn fetch(&self, router: &dyn Router) -> Result<Option<RouteQuote>> {
        if self.input.is_zero() {
            return Ok(None);
        }
        router
            .best_route(&self.input.send, &self.input.out, &self.input.amount)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_sequence_is_current() {
        let mut tracker = RequestTracker::default();
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(second > first);
        assert!(!tracker.is_latest(first));
        assert!(tracker.is_latest(second));

        tracker.cancel_pending();
        assert!(!tracker.is_latest(second));
        assert_eq!(tracker.latest(), 3);
    }
}

// Request sequencing for overlapping fetches.
//
// Each fetch takes a ticket before it goes out. When the response comes
// back it may only be applied if no newer ticket has been applied already,
// so a slow response can never overwrite data from a later request.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct RequestSequencer {
    issued: AtomicU64,
    applied: AtomicU64,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a ticket for a new request. Tickets start at 1 and increase.
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Claim the right to apply the response for `ticket`.
    ///
    /// Returns false when a response with the same or a newer ticket was
    /// already applied, in which case the caller must drop this one.
    pub fn try_apply(&self, ticket: u64) -> bool {
        self.applied.fetch_max(ticket, Ordering::SeqCst) < ticket
    }

    /// Newest ticket applied so far (0 if none).
    pub fn applied(&self) -> u64 {
        self.applied.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tickets_increase() {
        let seq = RequestSequencer::new();
        assert_eq!(seq.begin(), 1);
        assert_eq!(seq.begin(), 2);
    }

    #[test]
    fn stale_response_is_rejected() {
        let seq = RequestSequencer::new();
        let first = seq.begin();
        let second = seq.begin();

        // Second request answers first.
        assert!(seq.try_apply(second));
        assert!(!seq.try_apply(first));
        assert_eq!(seq.applied(), second);
    }

    #[test]
    fn in_order_responses_all_apply() {
        let seq = RequestSequencer::new();
        let a = seq.begin();
        assert!(seq.try_apply(a));
        let b = seq.begin();
        assert!(seq.try_apply(b));
        assert!(!seq.try_apply(b));
    }
}

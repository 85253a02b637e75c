//! Generation counters for asynchronous loads.
//!
//! Every load takes a [`LoadTicket`] from the owning component's
//! [`LoadGeneration`]. Starting a new load or unmounting bumps the
//! generation, so a result is applied only if its ticket is still current.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    /// The generation this ticket was issued for.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

/// Shared generation counter. Clones observe the same counter.
#[derive(Debug, Clone, Default)]
pub struct LoadGeneration {
    current: Arc<AtomicU64>,
}

impl LoadGeneration {
    /// Creates a counter at generation zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load, invalidating every earlier ticket.
    #[must_use]
    pub fn begin(&self) -> LoadTicket {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        LoadTicket { generation }
    }

    /// Invalidates every outstanding ticket without starting a new load.
    pub fn invalidate(&self) {
        self.current.fetch_add(1, Ordering::SeqCst);
    }

    /// Whether results for `ticket` may still be applied.
    #[must_use]
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.current.load(Ordering::SeqCst) == ticket.generation
    }

    /// Awaits `future` and returns its output only if `ticket` is still
    /// current afterwards.
    pub async fn guard<F, T>(&self, ticket: LoadTicket, future: F) -> Option<T>
    where
        F: Future<Output = T>,
    {
        let output = future.await;
        if self.is_current(ticket) {
            Some(output)
        } else {
            log::debug!(
                "Discarding stale load result (generation {})",
                ticket.generation
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_invalidates_older() {
        let generation = LoadGeneration::new();
        let first = generation.begin();
        assert!(generation.is_current(first));

        let second = generation.begin();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn invalidate_expires_outstanding_ticket() {
        let generation = LoadGeneration::new();
        let ticket = generation.begin();
        generation.clone().invalidate();
        assert!(!generation.is_current(ticket));
    }

    #[tokio::test]
    async fn guard_drops_results_for_stale_tickets() {
        let generation = LoadGeneration::new();

        let ticket = generation.begin();
        assert_eq!(generation.guard(ticket, async { 7 }).await, Some(7));

        let stale = generation.begin();
        let handle = generation.clone();
        let result = generation
            .guard(stale, async move {
                handle.invalidate();
                7
            })
            .await;
        assert_eq!(result, None);
    }
}

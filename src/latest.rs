//! Last-request-wins bookkeeping for list views.
//!
//! Every fetch takes a ticket before it is sent. When the response comes
//! back, it is applied only if no newer fetch has started since.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket handed out by [`LatestRequest::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct LatestRequest {
    generation: Arc<AtomicU64>,
}

impl LatestRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation. Any earlier ticket becomes stale.
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::Relaxed) == ticket.0
    }
}

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::pipeline::GeneratedReport;

/// Single-flight guard plus the most recent successful report.
///
/// Every generation takes a token from a monotonically increasing counter.
/// A finished report only replaces the stored one when its token is newer.
#[derive(Debug, Default)]
pub struct GenerationSlot {
    in_flight: AtomicBool,
    next_token: AtomicU64,
    latest: RwLock<Option<(u64, Arc<GeneratedReport>)>>,
}

/// Held while a generation runs. Dropping it frees the slot.
#[derive(Debug)]
pub struct GenerationTicket {
    slot: Arc<GenerationSlot>,
    token: u64,
}

impl GenerationTicket {
    pub fn token(&self) -> u64 {
        self.token
    }

    /// Store the report if nothing newer has been published.
    pub async fn publish(&self, report: GeneratedReport) -> bool {
        self.slot.publish(self.token, report).await
    }
}

impl Drop for GenerationTicket {
    fn drop(&mut self) {
        self.slot.in_flight.store(false, Ordering::Release);
    }
}

impl GenerationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot, or `None` when a generation is already running.
    pub fn try_begin(self: &Arc<Self>) -> Option<GenerationTicket> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return None;
        }
        let token = self.next_token.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(token, "Generation slot claimed");
        Some(GenerationTicket { slot: Arc::clone(self), token })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub async fn publish(&self, token: u64, report: GeneratedReport) -> bool {
        let mut latest = self.latest.write().await;
        match latest.as_ref() {
            Some((stored, _)) if *stored >= token => {
                warn!(token, stored = *stored, "Discarding stale report");
                false
            }
            _ => {
                *latest = Some((token, Arc::new(report)));
                true
            }
        }
    }

    pub async fn latest(&self) -> Option<Arc<GeneratedReport>> {
        self.latest.read().await.as_ref().map(|(_, r)| Arc::clone(r))
    }
}

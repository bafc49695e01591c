use crate::models::{RejectionKind, Stage};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Rejected {
        kind: RejectionKind,
        value: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageEvent<'a> {
    pub listing_id: &'a str,
    pub stage: Stage,
    pub outcome: Outcome,
}

/// Receives one event per stage a listing reaches
pub trait ListingObserver: Send + Sync {
    fn observe(&self, event: &StageEvent<'_>);
}

pub struct NoopObserver;

impl ListingObserver for NoopObserver {
    fn observe(&self, _event: &StageEvent<'_>) {}
}

/// Forwards events to `tracing`
pub struct TracingObserver;

impl ListingObserver for TracingObserver {
    fn observe(&self, event: &StageEvent<'_>) {
        match &event.outcome {
            Outcome::Passed => debug!(
                listing = event.listing_id,
                stage = %event.stage,
                "stage passed"
            ),
            Outcome::Rejected { kind, value } => warn!(
                listing = event.listing_id,
                stage = %event.stage,
                kind = ?kind,
                value = value.as_deref().unwrap_or("-"),
                "❌ listing rejected"
            ),
        }
    }
}

impl<T: ListingObserver + ?Sized> ListingObserver for &T {
    fn observe(&self, event: &StageEvent<'_>) {
        (**self).observe(event)
    }
}

//! The per-order record produced by the solver pipeline.

use std::sync::Arc;

use sealbid_timelock::EncryptedAuctionOrder;
use sealbid_types::{AuctionOrder, SealbidError};

/// Outcome of solving one encrypted order.
///
/// Results arrive in completion order, so consumers correlate them through
/// `encrypted`, never by position.
#[derive(Debug, Clone)]
pub struct OrderPuzzleResult {
    pub encrypted: Arc<EncryptedAuctionOrder>,
    pub outcome: Result<AuctionOrder, SealbidError>,
}

impl OrderPuzzleResult {
    #[must_use]
    pub fn solved(encrypted: Arc<EncryptedAuctionOrder>, order: AuctionOrder) -> Self {
        Self {
            encrypted,
            outcome: Ok(order),
        }
    }

    #[must_use]
    pub fn failed(encrypted: Arc<EncryptedAuctionOrder>, error: SealbidError) -> Self {
        Self {
            encrypted,
            outcome: Err(error),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    #[must_use]
    pub fn order(&self) -> Option<&AuctionOrder> {
        self.outcome.as_ref().ok()
    }

    #[must_use]
    pub fn error(&self) -> Option<&SealbidError> {
        self.outcome.as_ref().err()
    }

    /// Whether this result came from exactly this envelope instance.
    #[must_use]
    pub fn is_for(&self, encrypted: &Arc<EncryptedAuctionOrder>) -> bool {
        Arc::ptr_eq(&self.encrypted, encrypted)
    }
}

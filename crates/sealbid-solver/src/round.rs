//! Auction round: public parameters, envelope admission, and aggregation of
//! solved orders into the matchable set.
//!
//! ## Aggregation rules
//!
//! - Failed solves are excluded and reported, never retried
//! - An order sealed for another round is rejected (`AuctionMismatch`)
//! - An order whose decoded `auction_id` differs from its envelope's
//!   `intended_auction` is rejected (`AuctionMismatch`)
//! - With a verifier installed, orders whose signature does not verify
//!   over their signable bytes are rejected (`SignatureInvalid`)
//! - The round fails as a whole only if every order failed

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sealbid_timelock::EncryptedAuctionOrder;
use sealbid_types::{
    constants, AuctionConfig, AuctionId, AuctionOrder, PubKey, PublicParameterSource,
    PublicParameters, Result, SealbidError,
};

use crate::OrderPuzzleResult;

/// Signature check over an order's signable bytes. The concrete scheme
/// lives with account registration, outside this crate.
pub trait OrderVerifier: Send + Sync {
    fn verify(&self, pubkey: &PubKey, message: &[u8], signature: &[u8]) -> bool;
}

/// An order excluded from the round, kept for logging and disputes.
#[derive(Debug, Clone)]
pub struct FailedOrder {
    pub encrypted: Arc<EncryptedAuctionOrder>,
    pub error: SealbidError,
}

/// The resolved round handed to the matching engine.
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    pub auction_id: AuctionId,
    /// Orders that solved, decoded, and passed every check.
    pub orders: Vec<AuctionOrder>,
    pub failures: Vec<FailedOrder>,
    pub resolved_at: DateTime<Utc>,
}

impl RoundOutcome {
    #[must_use]
    pub fn total(&self) -> usize {
        self.orders.len() + self.failures.len()
    }
}

/// One auction round.
pub struct AuctionRound {
    params: PublicParameters,
    verifier: Option<Box<dyn OrderVerifier>>,
}

impl AuctionRound {
    #[must_use]
    pub fn new(params: PublicParameters) -> Self {
        Self {
            params,
            verifier: None,
        }
    }

    /// Open a round with a fresh random auction id.
    #[must_use]
    pub fn open(cfg: &AuctionConfig) -> Self {
        Self::new(PublicParameters {
            auction_id: AuctionId(rand::random()),
            auction_time: cfg.auction_time,
        })
    }

    #[must_use]
    pub fn with_verifier(mut self, verifier: Box<dyn OrderVerifier>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    #[must_use]
    pub fn auction_id(&self) -> AuctionId {
        self.params.auction_id
    }

    /// Cheap pre-solve check on a submitted envelope.
    ///
    /// # Errors
    /// `AuctionMismatch` if the envelope is bound to another round.
    pub fn admit(&self, encrypted: &EncryptedAuctionOrder) -> Result<()> {
        if encrypted.intended_auction != self.params.auction_id {
            return Err(SealbidError::AuctionMismatch {
                expected: self.params.auction_id,
                actual: encrypted.intended_auction,
            });
        }
        Ok(())
    }

    fn check_order(&self, encrypted: &EncryptedAuctionOrder, order: &AuctionOrder) -> Result<()> {
        self.admit(encrypted)?;
        if order.auction_id != encrypted.intended_auction {
            return Err(SealbidError::AuctionMismatch {
                expected: encrypted.intended_auction,
                actual: order.auction_id,
            });
        }
        if let Some(verifier) = &self.verifier {
            if !verifier.verify(&order.pubkey, &order.serialize_signable(), &order.signature) {
                return Err(SealbidError::SignatureInvalid);
            }
        }
        Ok(())
    }

    /// Partition solver results into the matchable set and the failures.
    ///
    /// # Errors
    /// `AllOrdersFailed` if there was at least one result and none survived.
    pub fn aggregate(&self, results: Vec<OrderPuzzleResult>) -> Result<RoundOutcome> {
        let mut orders = Vec::with_capacity(results.len());
        let mut failures = Vec::new();

        for result in results {
            let OrderPuzzleResult { encrypted, outcome } = result;
            let checked = outcome.and_then(|order| {
                self.check_order(&encrypted, &order)?;
                Ok(order)
            });
            match checked {
                Ok(order) => orders.push(order),
                Err(error) => {
                    tracing::warn!(
                        auction = %self.params.auction_id,
                        category = %error.category(),
                        error = %error,
                        "Order excluded from round"
                    );
                    failures.push(FailedOrder { encrypted, error });
                }
            }
        }

        if orders.is_empty() && !failures.is_empty() {
            return Err(SealbidError::AllOrdersFailed {
                count: failures.len(),
            });
        }

        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            auction = %self.params.auction_id,
            matchable = orders.len(),
            excluded = failures.len(),
            "Round aggregated"
        );

        Ok(RoundOutcome {
            auction_id: self.params.auction_id,
            orders,
            failures,
            resolved_at: Utc::now(),
        })
    }
}

impl PublicParameterSource for AuctionRound {
    fn public_parameters(&self) -> Result<PublicParameters> {
        Ok(self.params)
    }
}

//! Configuration for an auction server and the public round parameters it
//! hands out to bidders.

use serde::{Deserialize, Serialize};

use crate::{constants, AuctionId, Result, SealbidError};

/// Server-side auction settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuctionConfig {
    /// Time parameter handed to bidders for puzzle creation.
    pub auction_time: u64,
    /// Width of the solver pool. `0` means one worker per CPU core.
    pub solver_workers: usize,
    /// RSW modulus size in bits.
    pub rsw_modulus_bits: u64,
    /// Hash iterations per unit of time parameter for hash-chain puzzles.
    pub hash_chain_rounds_per_step: u64,
}

impl Default for AuctionConfig {
    fn default() -> Self {
        Self {
            auction_time: constants::DEFAULT_AUCTION_TIME,
            solver_workers: constants::AUTO_SOLVER_WORKERS,
            rsw_modulus_bits: constants::DEFAULT_RSW_MODULUS_BITS,
            hash_chain_rounds_per_step: constants::DEFAULT_HASH_CHAIN_ROUNDS_PER_STEP,
        }
    }
}

impl AuctionConfig {
    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| SealbidError::Configuration(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    /// `Configuration` if any value is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.auction_time == 0 {
            return Err(SealbidError::Configuration(
                "auction_time must be greater than 0".into(),
            ));
        }
        if self.rsw_modulus_bits < constants::MIN_RSW_MODULUS_BITS {
            return Err(SealbidError::Configuration(format!(
                "rsw_modulus_bits must be at least {}",
                constants::MIN_RSW_MODULUS_BITS
            )));
        }
        if self.hash_chain_rounds_per_step == 0 {
            return Err(SealbidError::Configuration(
                "hash_chain_rounds_per_step must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Resolved solver pool width.
    #[must_use]
    pub fn effective_solver_workers(&self) -> usize {
        if self.solver_workers == constants::AUTO_SOLVER_WORKERS {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        } else {
            self.solver_workers
        }
    }
}

/// What a bidder needs to seal an order for the current round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicParameters {
    pub auction_id: AuctionId,
    /// The `time_param` to pass to puzzle creation.
    pub auction_time: u64,
}

/// Supplies the active round's public parameters (the RPC layer implements
/// this on top of the running server).
pub trait PublicParameterSource {
    fn public_parameters(&self) -> Result<PublicParameters>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AuctionConfig::default();
        assert_eq!(cfg.auction_time, 30_000);
        assert_eq!(cfg.rsw_modulus_bits, 2048);
        assert!(cfg.validate().is_ok());
        assert!(cfg.effective_solver_workers() >= 1);
    }

    #[test]
    fn explicit_workers_kept() {
        let cfg = AuctionConfig {
            solver_workers: 3,
            ..AuctionConfig::default()
        };
        assert_eq!(cfg.effective_solver_workers(), 3);
    }

    #[test]
    fn from_json_fills_defaults() {
        let cfg = AuctionConfig::from_json(r#"{"auction_time": 500}"#).unwrap();
        assert_eq!(cfg.auction_time, 500);
        assert_eq!(cfg.hash_chain_rounds_per_step, 1);
    }

    #[test]
    fn invalid_values_rejected() {
        let err = AuctionConfig::from_json(r#"{"auction_time": 0}"#).unwrap_err();
        assert!(matches!(err, SealbidError::Configuration(_)));
        let err = AuctionConfig::from_json(r#"{"rsw_modulus_bits": 64}"#).unwrap_err();
        assert!(matches!(err, SealbidError::Configuration(_)));
        let err = AuctionConfig::from_json("not json").unwrap_err();
        assert!(matches!(err, SealbidError::Configuration(_)));
    }

    #[test]
    fn public_parameters_serde_roundtrip() {
        let params = PublicParameters {
            auction_id: AuctionId([9u8; 32]),
            auction_time: 1234,
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: PublicParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(params, back);
    }
}

//! Puzzle solver pipeline: fans a round's encrypted orders out over a
//! bounded pool of blocking workers and fans the results back in.
//!
//! Each solve is a pure function of its own ciphertext and puzzle, so
//! workers share nothing but the result channel. One bad order never aborts
//! the batch: it simply produces a failed [`OrderPuzzleResult`]. Nothing is
//! retried, since every failure is deterministic in its inputs.

use std::sync::Arc;

use sealbid_timelock::EncryptedAuctionOrder;
use sealbid_types::{AuctionConfig, AuctionOrder, SealbidError};
use tokio::sync::{mpsc, Semaphore};

use crate::OrderPuzzleResult;

/// Solve one encrypted order and decode it.
///
/// Always yields exactly one result:
/// - `PuzzleSolve` if the puzzle or ciphertext is bad (no decode attempted)
/// - `DecodeAfterSolve` if the recovered bytes are not a valid order
pub fn solve_order(encrypted: Arc<EncryptedAuctionOrder>) -> OrderPuzzleResult {
    let bytes = match encrypted.solve_bytes() {
        Ok(bytes) => bytes,
        Err(err) => return OrderPuzzleResult::failed(encrypted, err),
    };
    match AuctionOrder::deserialize(&bytes) {
        Ok(order) => OrderPuzzleResult::solved(encrypted, order),
        Err(err) => {
            OrderPuzzleResult::failed(encrypted, SealbidError::DecodeAfterSolve(Box::new(err)))
        }
    }
}

/// Solve one order and emit the result into `results`.
///
/// Blocks while the channel is full, so the channel must be sized to the
/// number of outstanding solves or drained concurrently. Must be called
/// from a blocking context, not from an async task.
pub fn solve_into(
    encrypted: Arc<EncryptedAuctionOrder>,
    results: &mpsc::Sender<OrderPuzzleResult>,
) {
    let result = solve_order(encrypted);
    // A dropped receiver means the round was abandoned.
    let _ = results.blocking_send(result);
}

/// Concurrent solver for a batch of encrypted orders.
#[derive(Debug, Clone)]
pub struct SolverPipeline {
    workers: usize,
    max_time_param: Option<u64>,
    max_rounds_per_step: Option<u64>,
}

impl SolverPipeline {
    /// Create a pipeline with `workers` concurrent solves (at least 1).
    #[must_use]
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            max_time_param: None,
            max_rounds_per_step: None,
        }
    }

    /// Pipeline sized and limited for a round run under `cfg`: puzzles
    /// above the round's `auction_time`, or hash chains heavier per step
    /// than configured, are refused unsolved.
    #[must_use]
    pub fn from_config(cfg: &AuctionConfig) -> Self {
        Self::new(cfg.effective_solver_workers())
            .with_max_time_param(cfg.auction_time)
            .with_max_rounds_per_step(cfg.hash_chain_rounds_per_step)
    }

    /// Refuse to solve puzzles demanding more than `limit` sequential steps.
    ///
    /// A bidder could otherwise submit a puzzle that never finishes in time.
    #[must_use]
    pub fn with_max_time_param(mut self, limit: u64) -> Self {
        self.max_time_param = Some(limit);
        self
    }

    /// Refuse hash-chain puzzles doing more than `limit` hash iterations
    /// per unit of time parameter.
    #[must_use]
    pub fn with_max_rounds_per_step(mut self, limit: u64) -> Self {
        self.max_rounds_per_step = Some(limit);
        self
    }

    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers
    }

    fn check_limits(&self, encrypted: &EncryptedAuctionOrder) -> Result<(), SealbidError> {
        let puzzle = &encrypted.order_puzzle;
        let requested = puzzle.time_param();
        if let Some(limit) = self.max_time_param {
            if requested > limit {
                return Err(SealbidError::PuzzleSolve {
                    reason: format!("time parameter {requested} exceeds round limit {limit}"),
                });
            }
        }
        if let Some(limit) = self.max_rounds_per_step {
            let per_step = puzzle.rounds_per_step().unwrap_or(0);
            if per_step > limit {
                return Err(SealbidError::PuzzleSolve {
                    reason: format!("{per_step} hash rounds per step exceeds round limit {limit}"),
                });
            }
        }
        Ok(())
    }

    /// Solve every order and return one result per input, in completion
    /// order.
    ///
    /// In-flight solves are never cancelled; dropping the returned future
    /// abandons the results without blocking the workers.
    pub async fn solve_batch(
        &self,
        orders: Vec<Arc<EncryptedAuctionOrder>>,
    ) -> Vec<OrderPuzzleResult> {
        let total = orders.len();
        if total == 0 {
            return Vec::new();
        }

        // Sized to the batch so no producer ever blocks on send.
        let (tx, mut rx) = mpsc::channel(total);
        let permits = Arc::new(Semaphore::new(self.workers));

        for encrypted in orders {
            let tx = tx.clone();
            let permits = Arc::clone(&permits);

            if let Err(err) = self.check_limits(&encrypted) {
                let _ = tx.send(OrderPuzzleResult::failed(encrypted, err)).await;
                continue;
            }

            tokio::spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    let err = SealbidError::Internal("solver pool closed".into());
                    let _ = tx.send(OrderPuzzleResult::failed(encrypted, err)).await;
                    return;
                };

                let worker_tx = tx.clone();
                let worker_order = Arc::clone(&encrypted);
                let joined =
                    tokio::task::spawn_blocking(move || solve_into(worker_order, &worker_tx)).await;

                // solve_into sends last, so a panicked worker has sent nothing.
                if let Err(join_err) = joined {
                    let err = SealbidError::Internal(format!("solver worker failed: {join_err}"));
                    let _ = tx.send(OrderPuzzleResult::failed(encrypted, err)).await;
                }
            });
        }
        drop(tx);

        let mut results = Vec::with_capacity(total);
        while let Some(result) = rx.recv().await {
            match &result.outcome {
                Ok(order) => tracing::debug!(
                    auction = %result.encrypted.intended_auction,
                    pubkey = %order.pubkey,
                    side = %order.side,
                    "Order puzzle solved"
                ),
                Err(err) => tracing::warn!(
                    auction = %result.encrypted.intended_auction,
                    puzzle = %result.encrypted.order_puzzle.tag(),
                    error = %err,
                    "Order puzzle failed"
                ),
            }
            results.push(result);
        }

        let solved = results.iter().filter(|r| r.is_ok()).count();
        tracing::info!(
            total,
            solved,
            failed = total - solved,
            workers = self.workers,
            "Puzzle batch complete"
        );
        results
    }
}

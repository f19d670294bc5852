//! # sealbid-solver
//!
//! **Reveal plane**: once the auction window closes, solve every sealed
//! order, decode it, and hand the surviving set to the matching engine.
//!
//! ## Architecture
//!
//! 1. **SolverPipeline**: bounded pool of blocking solves, results fanned in
//!    over one channel
//! 2. **OrderPuzzleResult**: one record per input, correlated by reference
//! 3. **AuctionRound**: public parameters, envelope admission, aggregation
//!
//! ## Round Flow
//!
//! ```text
//! envelopes → AuctionRound.admit() → SolverPipeline.solve_batch()
//!     → AuctionRound.aggregate() → RoundOutcome → matching engine
//! ```

pub mod pipeline;
pub mod result;
pub mod round;

pub use pipeline::{solve_into, solve_order, SolverPipeline};
pub use result::OrderPuzzleResult;
pub use round::{AuctionRound, FailedOrder, OrderVerifier, RoundOutcome};

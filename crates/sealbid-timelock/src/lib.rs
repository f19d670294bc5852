//! # sealbid-timelock
//!
//! **Sealing plane**: time-lock puzzles and the encrypted orders built on
//! them.
//!
//! ## Architecture
//!
//! 1. **Puzzle algebra** ([`puzzle`]): `create`/`solve` over the closed
//!    [`OrderPuzzle`] set
//! 2. **RSW** ([`rsw`]): modular-squaring puzzle with a factorization trapdoor
//! 3. **Hash chain** ([`hash_chain`]): symmetric iterated-SHA-256 puzzle
//! 4. **Cipher** ([`cipher`]): AES-256-GCM under the puzzle-derived key
//! 5. **Envelope** ([`envelope`]): [`EncryptedAuctionOrder`] and its wire form
//!
//! ## Order Flow
//!
//! ```text
//! AuctionOrder.serialize() → PuzzleCreator.create(t) → EncryptedAuctionOrder
//!     → serialize() → transport → deserialize() → OrderPuzzle.solve()
//! ```

pub mod cipher;
pub mod envelope;
pub mod hash_chain;
pub mod puzzle;
pub mod rsw;

pub use envelope::{turn_into_encrypted_order, EncryptedAuctionOrder};
pub use hash_chain::HashChainPuzzle;
pub use puzzle::{
    HashChainCreator, OrderPuzzle, PuzzleCreator, PuzzleTag, RswCreator, TimelockPuzzle,
};
pub use rsw::RswPuzzle;

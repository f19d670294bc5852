//! # sealbid-types
//!
//! Shared types, errors, and configuration for **SealBid** time-locked
//! batch auctions.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`AuctionId`], [`PubKey`], [`OrderNonce`], [`TradingPair`], [`Asset`]
//! - **Order model**: [`AuctionOrder`], [`OrderSide`]
//! - **Order codec**: [`AuctionOrder::serialize`], [`AuctionOrder::serialize_signable`],
//!   [`AuctionOrder::deserialize`], and the bounds-checked [`codec::Reader`]
//! - **Configuration**: [`AuctionConfig`], [`PublicParameters`]
//! - **Errors**: [`SealbidError`] with `SB_ERR_` prefix codes
//! - **Constants**: wire widths and defaults

pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod order;

pub use config::*;
pub use error::*;
pub use ids::*;
pub use order::*;

// Constants are accessed via `sealbid_types::constants::FOO`
// (not re-exported to avoid name collisions).

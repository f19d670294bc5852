//! System-wide constants for SealBid.

/// Width of a compressed public key.
pub const PUBKEY_LEN: usize = 33;

/// Width of the encoded trading pair.
pub const TRADING_PAIR_LEN: usize = 2;

/// Width of an auction identifier.
pub const AUCTION_ID_LEN: usize = 32;

/// Width of the per-order nonce.
pub const NONCE_LEN: usize = 2;

/// Width of every little-endian integer and length prefix on the wire.
pub const U64_LEN: usize = 8;

/// Sum of every fixed-width field in an encoded order: pubkey, pair,
/// both amounts, side length, auction id, nonce, signature length.
pub const MIN_ORDER_LEN: usize =
    PUBKEY_LEN + TRADING_PAIR_LEN + U64_LEN * 3 + AUCTION_ID_LEN + NONCE_LEN + U64_LEN;

/// Wire spelling of the buy side.
pub const SIDE_BUY: &str = "buy";

/// Wire spelling of the sell side.
pub const SIDE_SELL: &str = "sell";

/// Default puzzle time parameter (sequential squarings) for a round.
pub const DEFAULT_AUCTION_TIME: u64 = 30_000;

/// Default RSW modulus size in bits.
pub const DEFAULT_RSW_MODULUS_BITS: u64 = 2048;

/// Smallest RSW modulus accepted by configuration.
pub const MIN_RSW_MODULUS_BITS: u64 = 128;

/// Default number of hash iterations per unit of time parameter.
pub const DEFAULT_HASH_CHAIN_ROUNDS_PER_STEP: u64 = 1;

/// Solver worker count meaning "one per CPU core".
pub const AUTO_SOLVER_WORKERS: usize = 0;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "SealBid";

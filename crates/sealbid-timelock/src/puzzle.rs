//! Puzzle algebra: create and solve time-locked ciphertexts.
//!
//! ```text
//! create(t, payload) -> (ciphertext, puzzle)
//! solve(ciphertext, puzzle) -> payload        // ≈ t sequential steps
//! ```
//!
//! The concrete constructions form a closed set, [`OrderPuzzle`], each
//! with an explicit one-byte tag. Decoding goes through the static
//! [`PAYLOAD_DECODERS`] table, so there is nothing to register at runtime.

use std::fmt;

use rand::{CryptoRng, RngCore};
use sealbid_types::{codec, constants, AuctionConfig, Result, SealbidError};

use crate::{cipher, hash_chain::HashChainPuzzle, rsw::RswPuzzle};

/// A concrete time-lock construction that hides a 32-byte key.
pub trait TimelockPuzzle: Sized {
    /// The `t` the puzzle was created with. Same unit for every
    /// construction, so one round limit applies to all of them.
    fn time_param(&self) -> u64;

    /// Recover the hidden key by doing the sequential work.
    fn solve_key(&self) -> Result<[u8; 32]>;

    /// Variant-specific payload, without the tag.
    fn write_payload(&self, buf: &mut Vec<u8>);

    fn read_payload(r: &mut codec::Reader<'_>) -> Result<Self>;
}

/// Envelope discriminant for each puzzle variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PuzzleTag {
    Rsw = 1,
    HashChain = 2,
}

impl fmt::Display for PuzzleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rsw => write!(f, "RSW"),
            Self::HashChain => write!(f, "HASH_CHAIN"),
        }
    }
}

/// The puzzle carried by an encrypted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderPuzzle {
    Rsw(RswPuzzle),
    HashChain(HashChainPuzzle),
}

type PayloadDecoder = fn(&mut codec::Reader<'_>) -> Result<OrderPuzzle>;

/// Tag-to-decoder table. One entry per [`OrderPuzzle`] variant.
pub const PAYLOAD_DECODERS: [(PuzzleTag, PayloadDecoder); 2] = [
    (PuzzleTag::Rsw, decode_rsw),
    (PuzzleTag::HashChain, decode_hash_chain),
];

fn decode_rsw(r: &mut codec::Reader<'_>) -> Result<OrderPuzzle> {
    RswPuzzle::read_payload(r).map(OrderPuzzle::Rsw)
}

fn decode_hash_chain(r: &mut codec::Reader<'_>) -> Result<OrderPuzzle> {
    HashChainPuzzle::read_payload(r).map(OrderPuzzle::HashChain)
}

impl OrderPuzzle {
    #[must_use]
    pub fn tag(&self) -> PuzzleTag {
        match self {
            Self::Rsw(_) => PuzzleTag::Rsw,
            Self::HashChain(_) => PuzzleTag::HashChain,
        }
    }

    #[must_use]
    pub fn time_param(&self) -> u64 {
        match self {
            Self::Rsw(p) => p.time_param(),
            Self::HashChain(p) => p.time_param(),
        }
    }

    /// Hash iterations per step, for hash-chain puzzles only.
    #[must_use]
    pub fn rounds_per_step(&self) -> Option<u64> {
        match self {
            Self::Rsw(_) => None,
            Self::HashChain(p) => Some(p.rounds_per_step),
        }
    }

    /// Do the sequential work and decrypt `ciphertext`.
    ///
    /// # Errors
    /// `PuzzleSolve` if the puzzle is degenerate or the ciphertext does not
    /// authenticate under the recovered key.
    pub fn solve(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let key = match self {
            Self::Rsw(p) => p.solve_key()?,
            Self::HashChain(p) => p.solve_key()?,
        };
        cipher::open(&key, ciphertext)
    }

    /// `tag[1] || payload`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(self.tag() as u8);
        match self {
            Self::Rsw(p) => p.write_payload(buf),
            Self::HashChain(p) => p.write_payload(buf),
        }
    }

    /// # Errors
    /// `UnknownVariant` if the tag has no decoder, or a structural error
    /// from the payload.
    pub fn decode(r: &mut codec::Reader<'_>) -> Result<Self> {
        let tag = r.u8()?;
        let (_, decoder) = PAYLOAD_DECODERS
            .iter()
            .find(|(known, _)| *known as u8 == tag)
            .ok_or(SealbidError::UnknownVariant(tag))?;
        decoder(r)
    }
}

/// The `create` half of the puzzle algebra.
pub trait PuzzleCreator {
    /// Seal `payload` behind a puzzle of roughly `time_param` sequential
    /// steps. Returns the ciphertext and the puzzle.
    fn create<R: RngCore + CryptoRng>(
        &self,
        time_param: u64,
        payload: &[u8],
        rng: &mut R,
    ) -> Result<(Vec<u8>, OrderPuzzle)>;
}

/// Creates RSW puzzles over a modulus of `modulus_bits` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RswCreator {
    pub modulus_bits: u64,
}

impl Default for RswCreator {
    fn default() -> Self {
        Self {
            modulus_bits: constants::DEFAULT_RSW_MODULUS_BITS,
        }
    }
}

impl From<&AuctionConfig> for RswCreator {
    fn from(cfg: &AuctionConfig) -> Self {
        Self {
            modulus_bits: cfg.rsw_modulus_bits,
        }
    }
}

impl PuzzleCreator for RswCreator {
    fn create<R: RngCore + CryptoRng>(
        &self,
        time_param: u64,
        payload: &[u8],
        rng: &mut R,
    ) -> Result<(Vec<u8>, OrderPuzzle)> {
        let (puzzle, key) = RswPuzzle::generate(time_param, self.modulus_bits, rng)?;
        let ciphertext = cipher::seal(&key, payload, rng)?;
        tracing::debug!(
            t = time_param,
            modulus_bits = self.modulus_bits,
            len = ciphertext.len(),
            "RSW puzzle created"
        );
        Ok((ciphertext, OrderPuzzle::Rsw(puzzle)))
    }
}

/// Creates hash-chain puzzles of `time_param * rounds_per_step` rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashChainCreator {
    pub rounds_per_step: u64,
}

impl Default for HashChainCreator {
    fn default() -> Self {
        Self {
            rounds_per_step: constants::DEFAULT_HASH_CHAIN_ROUNDS_PER_STEP,
        }
    }
}

impl From<&AuctionConfig> for HashChainCreator {
    fn from(cfg: &AuctionConfig) -> Self {
        Self {
            rounds_per_step: cfg.hash_chain_rounds_per_step,
        }
    }
}

impl PuzzleCreator for HashChainCreator {
    fn create<R: RngCore + CryptoRng>(
        &self,
        time_param: u64,
        payload: &[u8],
        rng: &mut R,
    ) -> Result<(Vec<u8>, OrderPuzzle)> {
        let (puzzle, key) = HashChainPuzzle::generate(time_param, self.rounds_per_step, rng)?;
        let ciphertext = cipher::seal(&key, payload, rng)?;
        tracing::debug!(
            t = time_param,
            rounds_per_step = self.rounds_per_step,
            len = ciphertext.len(),
            "Hash-chain puzzle created"
        );
        Ok((ciphertext, OrderPuzzle::HashChain(puzzle)))
    }
}

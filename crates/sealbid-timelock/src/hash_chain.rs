//! Hash-chain time-lock: the key is `SHA-256` iterated `rounds` times over a
//! public seed.
//!
//! Purely symmetric, so there is no trapdoor: the creator pays the same
//! sequential cost as the solver.

use rand::{CryptoRng, RngCore};
use sealbid_types::{codec, Result, SealbidError};
use sha2::{Digest, Sha256};

use crate::{cipher, puzzle::TimelockPuzzle};

const KEY_DOMAIN: &[u8] = b"sealbid:hashchain:v1:";

pub const SEED_LEN: usize = 32;

/// The chain runs `t * rounds_per_step` iterations. `t` is kept separate so
/// the puzzle reports its time parameter in the same unit as RSW.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashChainPuzzle {
    pub seed: [u8; SEED_LEN],
    pub t: u64,
    pub rounds_per_step: u64,
}

impl HashChainPuzzle {
    /// Generate a puzzle of `t * rounds_per_step` iterations and the key it
    /// hides.
    pub fn generate<R: RngCore + CryptoRng>(
        t: u64,
        rounds_per_step: u64,
        rng: &mut R,
    ) -> Result<(Self, [u8; 32])> {
        let mut seed = [0u8; SEED_LEN];
        rng.fill_bytes(&mut seed);

        let puzzle = Self {
            seed,
            t,
            rounds_per_step,
        };
        let rounds = puzzle.rounds().ok_or_else(|| SealbidError::PuzzleCreate {
            reason: format!("{t} x {rounds_per_step} hash rounds overflows"),
        })?;
        let key = cipher::derive_key(KEY_DOMAIN, &puzzle.chain(rounds));
        Ok((puzzle, key))
    }

    /// Total hash iterations, `None` if `t * rounds_per_step` overflows.
    #[must_use]
    pub fn rounds(&self) -> Option<u64> {
        self.t.checked_mul(self.rounds_per_step)
    }

    fn chain(&self, rounds: u64) -> [u8; 32] {
        let mut state: [u8; 32] = self.seed;
        for _ in 0..rounds {
            state = Sha256::digest(state).into();
        }
        state
    }
}

impl TimelockPuzzle for HashChainPuzzle {
    fn time_param(&self) -> u64 {
        self.t
    }

    fn solve_key(&self) -> Result<[u8; 32]> {
        let rounds = self.rounds().ok_or_else(|| SealbidError::PuzzleSolve {
            reason: format!(
                "{} x {} hash rounds overflows",
                self.t, self.rounds_per_step
            ),
        })?;
        Ok(cipher::derive_key(KEY_DOMAIN, &self.chain(rounds)))
    }

    fn write_payload(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.seed);
        buf.extend_from_slice(&self.t.to_le_bytes());
        buf.extend_from_slice(&self.rounds_per_step.to_le_bytes());
    }

    fn read_payload(r: &mut codec::Reader<'_>) -> Result<Self> {
        let seed = r.take_array()?;
        let t = r.u64_le()?;
        let rounds_per_step = r.u64_le()?;
        Ok(Self {
            seed,
            t,
            rounds_per_step,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn puzzle(t: u64, rounds_per_step: u64) -> HashChainPuzzle {
        HashChainPuzzle {
            seed: [1u8; 32],
            t,
            rounds_per_step,
        }
    }

    #[test]
    fn generated_key_is_recomputable() {
        let (puzzle, key) = HashChainPuzzle::generate(50, 2, &mut rand::thread_rng()).unwrap();
        assert_eq!(puzzle.rounds(), Some(100));
        assert_eq!(puzzle.solve_key().unwrap(), key);
    }

    #[test]
    fn time_param_is_t_not_rounds() {
        assert_eq!(puzzle(40, 3).time_param(), 40);
        assert_eq!(puzzle(40, 3).rounds(), Some(120));
    }

    #[test]
    fn zero_rounds_is_seed_only() {
        let p = HashChainPuzzle {
            seed: [5u8; 32],
            t: 0,
            rounds_per_step: 7,
        };
        assert_eq!(p.chain(0), [5u8; 32]);
    }

    #[test]
    fn round_count_changes_key() {
        assert_ne!(
            puzzle(10, 1).solve_key().unwrap(),
            puzzle(11, 1).solve_key().unwrap()
        );
    }

    #[test]
    fn same_rounds_same_key() {
        // 6 x 2 and 4 x 3 run the same chain.
        assert_eq!(
            puzzle(6, 2).solve_key().unwrap(),
            puzzle(4, 3).solve_key().unwrap()
        );
    }

    #[test]
    fn overflowing_rounds_rejected() {
        let err = HashChainPuzzle::generate(u64::MAX, 2, &mut rand::thread_rng()).unwrap_err();
        assert!(matches!(err, SealbidError::PuzzleCreate { .. }));
        assert!(matches!(
            puzzle(u64::MAX, 2).solve_key(),
            Err(SealbidError::PuzzleSolve { .. })
        ));
    }

    #[test]
    fn payload_roundtrip() {
        let p = puzzle(9, 4);
        let mut buf = Vec::new();
        p.write_payload(&mut buf);
        assert_eq!(buf.len(), SEED_LEN + 16);
        let mut r = codec::Reader::new(&buf);
        assert_eq!(HashChainPuzzle::read_payload(&mut r).unwrap(), p);
        r.finish().unwrap();
    }
}

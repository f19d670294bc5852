//! Rivest–Shamir–Wagner modular-squaring puzzle.
//!
//! The creator knows the factorization of `n = p·q` and computes
//! `b = a^(2^t) mod n` through the shortcut `e = 2^t mod φ(n)`. Anyone
//! else has to perform `t` sequential squarings mod `n`. The symmetric key
//! is derived from `b`.

use num::{
    bigint::{BigUint, RandBigInt},
    Integer, One, Zero,
};
use rand::{CryptoRng, Rng, RngCore};
use sealbid_types::{codec, Result, SealbidError};

use crate::{cipher, puzzle::TimelockPuzzle};

const KEY_DOMAIN: &[u8] = b"sealbid:rsw:v1:";

/// Miller–Rabin witness rounds per candidate prime.
const MILLER_RABIN_ROUNDS: usize = 20;

const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97,
];

/// Public RSW puzzle: modulus, base, and number of squarings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RswPuzzle {
    pub n: BigUint,
    pub a: BigUint,
    pub t: u64,
}

impl RswPuzzle {
    /// Generate a fresh puzzle and the key it hides.
    ///
    /// `modulus_bits` sets the size of `n`; the trapdoor makes creation cost
    /// two modular exponentiations regardless of `t`.
    pub fn generate<R: RngCore + CryptoRng>(
        t: u64,
        modulus_bits: u64,
        rng: &mut R,
    ) -> Result<(Self, [u8; 32])> {
        if modulus_bits < 16 {
            return Err(SealbidError::PuzzleCreate {
                reason: format!("modulus of {modulus_bits} bits is too small"),
            });
        }
        let p = gen_prime(modulus_bits / 2, rng);
        let mut q = gen_prime(modulus_bits - modulus_bits / 2, rng);
        while q == p {
            q = gen_prime(modulus_bits - modulus_bits / 2, rng);
        }

        let n = &p * &q;
        let phi = (&p - 1u32) * (&q - 1u32);

        // The trapdoor is only valid for bases coprime to n.
        let two = BigUint::from(2u32);
        let a = loop {
            let candidate = rng.gen_biguint_range(&two, &n);
            if candidate.gcd(&n).is_one() {
                break candidate;
            }
        };

        let e = two.modpow(&BigUint::from(t), &phi);
        let b = a.modpow(&e, &n);

        let puzzle = Self { n, a, t };
        let key = cipher::derive_key(KEY_DOMAIN, &b.to_bytes_be());
        Ok((puzzle, key))
    }
}

impl TimelockPuzzle for RswPuzzle {
    fn time_param(&self) -> u64 {
        self.t
    }

    fn solve_key(&self) -> Result<[u8; 32]> {
        if self.n <= BigUint::one() {
            return Err(SealbidError::PuzzleSolve {
                reason: "RSW modulus must be greater than 1".into(),
            });
        }
        let mut b = &self.a % &self.n;
        for _ in 0..self.t {
            b = (&b * &b) % &self.n;
        }
        Ok(cipher::derive_key(KEY_DOMAIN, &b.to_bytes_be()))
    }

    fn write_payload(&self, buf: &mut Vec<u8>) {
        codec::put_length_prefixed(buf, &self.n.to_bytes_be());
        codec::put_length_prefixed(buf, &self.a.to_bytes_be());
        buf.extend_from_slice(&self.t.to_le_bytes());
    }

    fn read_payload(r: &mut codec::Reader<'_>) -> Result<Self> {
        let n = BigUint::from_bytes_be(r.length_prefixed()?);
        let a = BigUint::from_bytes_be(r.length_prefixed()?);
        let t = r.u64_le()?;
        Ok(Self { n, a, t })
    }
}

fn gen_prime<R: RngCore + CryptoRng>(bits: u64, rng: &mut R) -> BigUint {
    loop {
        let mut candidate = rng.gen_biguint(bits);
        // Top two bits set so p·q has the full width; low bit set for odd.
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(bits - 2, true);
        candidate.set_bit(0, true);
        if is_probable_prime(&candidate, rng) {
            return candidate;
        }
    }
}

fn is_probable_prime<R: Rng>(n: &BigUint, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    if *n < two {
        return false;
    }
    for small in SMALL_PRIMES {
        let small = BigUint::from(small);
        if *n == small {
            return true;
        }
        if (n % &small).is_zero() {
            return false;
        }
    }

    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for _ in 0..MILLER_RABIN_ROUNDS {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trapdoor_matches_sequential_squaring() {
        let mut rng = rand::thread_rng();
        for t in [0, 1, 17, 500] {
            let (puzzle, key) = RswPuzzle::generate(t, 128, &mut rng).unwrap();
            assert_eq!(puzzle.solve_key().unwrap(), key, "t = {t}");
        }
    }

    #[test]
    fn modulus_has_requested_width() {
        let (puzzle, _) = RswPuzzle::generate(10, 256, &mut rand::thread_rng()).unwrap();
        assert_eq!(puzzle.n.bits(), 256);
        assert!(puzzle.a < puzzle.n);
    }

    #[test]
    fn primality() {
        let mut rng = rand::thread_rng();
        for p in [2u32, 3, 97, 101, 7919, 104_729] {
            assert!(is_probable_prime(&BigUint::from(p), &mut rng), "{p}");
        }
        for c in [0u32, 1, 4, 100, 561, 7917, 104_730] {
            assert!(!is_probable_prime(&BigUint::from(c), &mut rng), "{c}");
        }
    }

    #[test]
    fn degenerate_modulus_fails_to_solve() {
        let puzzle = RswPuzzle {
            n: BigUint::zero(),
            a: BigUint::from(3u32),
            t: 4,
        };
        assert!(matches!(
            puzzle.solve_key(),
            Err(SealbidError::PuzzleSolve { .. })
        ));
    }

    #[test]
    fn tiny_modulus_rejected() {
        assert!(RswPuzzle::generate(1, 8, &mut rand::thread_rng()).is_err());
    }

    #[test]
    fn payload_roundtrip() {
        let (puzzle, _) = RswPuzzle::generate(3, 128, &mut rand::thread_rng()).unwrap();
        let mut buf = Vec::new();
        puzzle.write_payload(&mut buf);
        let mut r = codec::Reader::new(&buf);
        let back = RswPuzzle::read_payload(&mut r).unwrap();
        r.finish().unwrap();
        assert_eq!(back, puzzle);
    }
}

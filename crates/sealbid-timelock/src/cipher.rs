//! Symmetric sealing of a payload under a puzzle-derived key.
//!
//! Ciphertext layout: `nonce[12] || AES-256-GCM(payload) || tag[16]`.
//! A ciphertext that was tampered with, or opened under the wrong key,
//! fails authentication instead of yielding garbage.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::{CryptoRng, RngCore};
use sealbid_types::{Result, SealbidError};
use sha2::{Digest, Sha256};

/// AES-GCM nonce width.
pub const NONCE_LEN: usize = 12;

/// AES-GCM tag width.
pub const TAG_LEN: usize = 16;

/// Derive a 32-byte symmetric key from puzzle output, separated by domain.
#[must_use]
pub fn derive_key(domain: &[u8], material: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update((material.len() as u64).to_le_bytes());
    hasher.update(material);
    hasher.finalize().into()
}

pub fn seal<R: RngCore + CryptoRng>(
    key: &[u8; 32],
    payload: &[u8],
    rng: &mut R,
) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| SealbidError::PuzzleCreate {
        reason: format!("invalid key: {e}"),
    })?;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);
    let sealed = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), payload)
        .map_err(|e| SealbidError::PuzzleCreate {
            reason: format!("encryption failed: {e}"),
        })?;

    let mut out = Vec::with_capacity(NONCE_LEN + sealed.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&sealed);
    Ok(out)
}

pub fn open(key: &[u8; 32], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if ciphertext.len() < NONCE_LEN + TAG_LEN {
        return Err(SealbidError::PuzzleSolve {
            reason: format!(
                "ciphertext is {} bytes, need at least {}",
                ciphertext.len(),
                NONCE_LEN + TAG_LEN
            ),
        });
    }
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| SealbidError::PuzzleSolve {
        reason: format!("invalid key: {e}"),
    })?;
    let (nonce_bytes, sealed) = ciphertext.split_at(NONCE_LEN);
    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), sealed)
        .map_err(|_| SealbidError::PuzzleSolve {
            reason: "ciphertext failed authentication".into(),
        })
}

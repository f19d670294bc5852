//! Fixed-width identifiers carried inside every auction order.
//!
//! All of these have a fixed wire width, so they are plain byte arrays
//! rather than UUIDs or strings.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants;

// ---------------------------------------------------------------------------
// AuctionId
// ---------------------------------------------------------------------------

/// Identifies one auction round. Orders and envelopes are bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize)]
pub struct AuctionId(pub [u8; constants::AUCTION_ID_LEN]);

impl AuctionId {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; constants::AUCTION_ID_LEN] {
        &self.0
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for AuctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "auction:{}", hex::encode(&self.0[..8]))
    }
}

// ---------------------------------------------------------------------------
// PubKey
// ---------------------------------------------------------------------------

/// 33-byte compressed public key of the bidder.
///
/// Serialized as hex in JSON since serde has no array impls past 32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct PubKey(pub [u8; constants::PUBKEY_LEN]);

impl PubKey {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; constants::PUBKEY_LEN] {
        &self.0
    }
}

impl Default for PubKey {
    fn default() -> Self {
        Self([0u8; constants::PUBKEY_LEN])
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Serialize for PubKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.0))
    }
}

impl<'de> Deserialize<'de> for PubKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let mut bytes = [0u8; constants::PUBKEY_LEN];
        hex::decode_to_slice(&text, &mut bytes).map_err(serde::de::Error::custom)?;
        Ok(Self(bytes))
    }
}

// ---------------------------------------------------------------------------
// OrderNonce
// ---------------------------------------------------------------------------

/// 2-byte nonce separating otherwise identical orders from the same key in
/// the same round. At most 65536 look-alike orders per key per round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize)]
pub struct OrderNonce(pub [u8; constants::NONCE_LEN]);

impl From<u16> for OrderNonce {
    fn from(value: u16) -> Self {
        Self(value.to_le_bytes())
    }
}

impl fmt::Display for OrderNonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

// ---------------------------------------------------------------------------
// TradingPair
// ---------------------------------------------------------------------------

/// One-byte asset code. The asset registry itself lives outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize)]
pub struct Asset(pub u8);

/// A trading pair, encoded on the wire as `[asset_want, asset_have]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default, Serialize, Deserialize)]
pub struct TradingPair {
    pub asset_want: Asset,
    pub asset_have: Asset,
}

impl TradingPair {
    #[must_use]
    pub fn new(asset_want: Asset, asset_have: Asset) -> Self {
        Self {
            asset_want,
            asset_have,
        }
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; constants::TRADING_PAIR_LEN] {
        [self.asset_want.0, self.asset_have.0]
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; constants::TRADING_PAIR_LEN]) -> Self {
        Self::new(Asset(bytes[0]), Asset(bytes[1]))
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.asset_want.0, self.asset_have.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auction_id_display_is_prefixed_hex() {
        let id = AuctionId([0xAB; 32]);
        assert_eq!(format!("{id}"), "auction:abababababababab");
        assert_eq!(id.short(), "abababab");
    }

    #[test]
    fn nonce_from_u16_is_little_endian() {
        assert_eq!(OrderNonce::from(0x0102).0, [0x02, 0x01]);
    }

    #[test]
    fn trading_pair_bytes() {
        let pair = TradingPair::new(Asset(3), Asset(7));
        assert_eq!(pair.to_bytes(), [3, 7]);
        assert_eq!(TradingPair::from_bytes([3, 7]), pair);
    }

    #[test]
    fn pubkey_serde_roundtrip() {
        let mut raw = [0u8; 33];
        raw[0] = 0x02;
        raw[32] = 0xFF;
        let key = PubKey(raw);
        let json = serde_json::to_string(&key).unwrap();
        assert!(json.starts_with("\"02"));
        let back: PubKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }

    #[test]
    fn pubkey_rejects_wrong_length() {
        let res: Result<PubKey, _> = serde_json::from_str("\"0203\"");
        assert!(res.is_err());
    }
}

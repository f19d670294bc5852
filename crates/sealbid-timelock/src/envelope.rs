//! Encrypted auction orders and their envelope encoding.
//!
//! An [`EncryptedAuctionOrder`] is what a bidder submits during the round:
//! the serialized order sealed behind a time-lock puzzle, plus the auction
//! it is bound to. Envelope layout:
//!
//! ```text
//! ct_len[8 LE] | ciphertext[ct_len] | tag[1] | puzzle payload | intended_auction[32]
//! ```

use rand::{CryptoRng, RngCore};
use sealbid_types::{codec, AuctionId, AuctionOrder, Result};

use crate::puzzle::{OrderPuzzle, PuzzleCreator, RswCreator};

/// A sealed order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedAuctionOrder {
    pub order_ciphertext: Vec<u8>,
    pub order_puzzle: OrderPuzzle,
    /// Must equal the sealed order's `auction_id`. Lets the exchange reject
    /// withheld or replayed orders without solving them.
    pub intended_auction: AuctionId,
}

impl EncryptedAuctionOrder {
    /// Seal `order` with `creator` and bind it to the order's auction.
    ///
    /// Signing, if wanted, must already have happened: this only wraps
    /// [`AuctionOrder::serialize`].
    pub fn seal<C: PuzzleCreator, R: RngCore + CryptoRng>(
        order: &AuctionOrder,
        time_param: u64,
        creator: &C,
        rng: &mut R,
    ) -> Result<Self> {
        let (order_ciphertext, order_puzzle) =
            creator.create(time_param, &order.serialize(), rng)?;
        Ok(Self {
            order_ciphertext,
            order_puzzle,
            intended_auction: order.auction_id,
        })
    }

    /// Solve the puzzle and return the raw order bytes.
    pub fn solve_bytes(&self) -> Result<Vec<u8>> {
        self.order_puzzle.solve(&self.order_ciphertext)
    }

    /// Whole-structure envelope encoding.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.order_ciphertext.len() + 512);
        codec::put_length_prefixed(&mut buf, &self.order_ciphertext);
        self.order_puzzle.encode(&mut buf);
        buf.extend_from_slice(self.intended_auction.as_bytes());
        buf
    }

    /// # Errors
    /// - `UnknownVariant` for an unregistered puzzle tag
    /// - `TooShort` / `TrailingBytes` / `LengthOverflow` for malformed input
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        let mut r = codec::Reader::new(data);
        let order_ciphertext = r.length_prefixed()?.to_vec();
        let order_puzzle = OrderPuzzle::decode(&mut r)?;
        let intended_auction = AuctionId(r.take_array()?);
        r.finish()?;
        Ok(Self {
            order_ciphertext,
            order_puzzle,
            intended_auction,
        })
    }
}

/// Seal an order for time `time_param` with the default RSW construction.
pub fn turn_into_encrypted_order(
    order: &AuctionOrder,
    time_param: u64,
) -> Result<EncryptedAuctionOrder> {
    EncryptedAuctionOrder::seal(
        order,
        time_param,
        &RswCreator::default(),
        &mut rand::thread_rng(),
    )
}

#[cfg(test)]
mod tests {
    use sealbid_types::{OrderSide, SealbidError};

    use super::*;
    use crate::puzzle::{HashChainCreator, PuzzleTag};

    fn order() -> AuctionOrder {
        let mut o = AuctionOrder::dummy(OrderSide::Buy, 100, 200, AuctionId([3u8; 32]));
        o.signature = vec![9; 71];
        o
    }

    fn sealed_rsw(o: &AuctionOrder) -> EncryptedAuctionOrder {
        EncryptedAuctionOrder::seal(
            o,
            50,
            &RswCreator { modulus_bits: 128 },
            &mut rand::thread_rng(),
        )
        .unwrap()
    }

    #[test]
    fn binds_to_order_auction() {
        let o = order();
        let enc = sealed_rsw(&o);
        assert_eq!(enc.intended_auction, o.auction_id);
    }

    #[test]
    fn default_sealing_binds_and_solves() {
        let o = order();
        let enc = turn_into_encrypted_order(&o, 2).unwrap();
        assert_eq!(enc.intended_auction, AuctionId([3u8; 32]));
        assert_eq!(enc.order_puzzle.tag(), PuzzleTag::Rsw);
        let back = AuctionOrder::deserialize(&enc.solve_bytes().unwrap()).unwrap();
        assert_eq!(back, o);
    }

    #[test]
    fn solve_recovers_serialized_order() {
        let o = order();
        let enc = sealed_rsw(&o);
        assert_eq!(enc.solve_bytes().unwrap(), o.serialize());
    }

    #[test]
    fn envelope_roundtrip_preserves_variant() {
        let o = order();
        let mut rng = rand::thread_rng();
        let envelopes = [
            sealed_rsw(&o),
            EncryptedAuctionOrder::seal(&o, 30, &HashChainCreator::default(), &mut rng).unwrap(),
        ];
        for enc in envelopes {
            let back = EncryptedAuctionOrder::deserialize(&enc.serialize()).unwrap();
            assert_eq!(back.order_puzzle.tag(), enc.order_puzzle.tag());
            assert_eq!(back, enc);
            assert_eq!(back.solve_bytes().unwrap(), o.serialize());
        }
    }

    #[test]
    fn unknown_tag_is_unknown_variant() {
        let enc = sealed_rsw(&order());
        let mut bytes = enc.serialize();
        let tag_offset = 8 + enc.order_ciphertext.len();
        bytes[tag_offset] = 0x7F;
        assert_eq!(
            EncryptedAuctionOrder::deserialize(&bytes).unwrap_err(),
            SealbidError::UnknownVariant(0x7F)
        );
    }

    #[test]
    fn truncated_envelope_is_too_short() {
        let bytes = sealed_rsw(&order()).serialize();
        let err = EncryptedAuctionOrder::deserialize(&bytes[..bytes.len() - 1]).unwrap_err();
        assert!(matches!(err, SealbidError::TooShort { .. }), "got {err}");
    }

    #[test]
    fn trailing_envelope_bytes_rejected() {
        let mut bytes = sealed_rsw(&order()).serialize();
        bytes.push(0);
        assert_eq!(
            EncryptedAuctionOrder::deserialize(&bytes).unwrap_err(),
            SealbidError::TrailingBytes { count: 1 }
        );
    }
}

//! The cleartext auction order and its side/price logic.
//!
//! An [`AuctionOrder`] is created and signed by the bidder, then sealed in a
//! time-lock puzzle. The exchange only ever sees it read-only, after the
//! round's puzzles are solved. Mutating a signed order invalidates its
//! signature.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{constants, AuctionId, OrderNonce, PubKey, Result, SealbidError, TradingPair};

/// Which side of the auction this order is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// The spelling used by the binary order codec.
    #[must_use]
    pub fn as_wire_str(self) -> &'static str {
        match self {
            Self::Buy => constants::SIDE_BUY,
            Self::Sell => constants::SIDE_SELL,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

impl FromStr for OrderSide {
    type Err = SealbidError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            constants::SIDE_BUY => Ok(Self::Buy),
            constants::SIDE_SELL => Ok(Self::Sell),
            other => Err(SealbidError::InvalidSide(other.to_string())),
        }
    }
}

/// A batch auction order.
///
/// `orderbook_price` only exists for returning orders back to clients after
/// matching; it is not part of the wire encoding, the signature, or
/// equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionOrder {
    pub pubkey: PubKey,
    pub side: OrderSide,
    #[serde(rename = "pair")]
    pub trading_pair: TradingPair,
    /// Amount of `asset_have` the bidder is giving up.
    pub amount_have: u64,
    /// Amount of `asset_want` the bidder asks for in return.
    pub amount_want: u64,
    #[serde(default)]
    pub orderbook_price: f64,
    /// The round this order is for. Protects against the exchange
    /// withholding an order into a later round.
    pub auction_id: AuctionId,
    pub nonce: OrderNonce,
    pub signature: Vec<u8>,
}

impl PartialEq for AuctionOrder {
    fn eq(&self, other: &Self) -> bool {
        self.pubkey == other.pubkey
            && self.side == other.side
            && self.trading_pair == other.trading_pair
            && self.amount_have == other.amount_have
            && self.amount_want == other.amount_want
            && self.auction_id == other.auction_id
            && self.nonce == other.nonce
            && self.signature == other.signature
    }
}

impl Eq for AuctionOrder {}

impl AuctionOrder {
    #[must_use]
    pub fn is_buy_side(&self) -> bool {
        self.side == OrderSide::Buy
    }

    #[must_use]
    pub fn is_sell_side(&self) -> bool {
        self.side == OrderSide::Sell
    }

    #[must_use]
    pub fn opposite_side(&self) -> OrderSide {
        self.side.opposite()
    }

    /// The ranking price used by the matching engine.
    ///
    /// Buy: `amount_want / amount_have`. Sell: `amount_have / amount_want`.
    ///
    /// # Errors
    /// `DivideByZero` if `amount_want` is 0, whatever the side.
    ///
    /// A buy order with `amount_have == 0` is not an error and yields
    /// `f64::INFINITY`. Callers ranking orders must treat it as unpriced.
    #[allow(clippy::cast_precision_loss)]
    pub fn price(&self) -> Result<f64> {
        if self.amount_want == 0 {
            return Err(SealbidError::DivideByZero);
        }
        let have = self.amount_have as f64;
        let want = self.amount_want as f64;
        Ok(match self.side {
            OrderSide::Buy => want / have,
            OrderSide::Sell => have / want,
        })
    }

    /// Set `amount_want` from a price, the inverse of [`Self::price`].
    ///
    /// Used by the exchange when filling a counter-order. The result is
    /// rounded to the nearest unit.
    ///
    /// # Errors
    /// - `InvalidPrice` if `price` is not a finite value above zero
    /// - `AmountOutOfRange` if the resulting amount does not fit in a `u64`
    ///
    /// The order is left untouched on error.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn set_amount_want(&mut self, price: f64) -> Result<()> {
        if !price.is_finite() || price <= 0.0 {
            return Err(SealbidError::InvalidPrice(price));
        }
        let have = self.amount_have as f64;
        let want = match self.side {
            OrderSide::Buy => have * price,
            OrderSide::Sell => have / price,
        };
        let want = want.round();
        // u64::MAX as f64 is 2^64, the first value that does not fit.
        if !want.is_finite() || want >= u64::MAX as f64 {
            return Err(SealbidError::AmountOutOfRange { price });
        }
        self.amount_want = want as u64;
        Ok(())
    }
}

impl fmt::Display for AuctionOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl AuctionOrder {
    /// An order with a random pubkey, no signature, bound to `auction_id`.
    pub fn dummy(side: OrderSide, amount_have: u64, amount_want: u64, auction_id: AuctionId) -> Self {
        let mut pubkey = [0u8; constants::PUBKEY_LEN];
        pubkey[0] = 0x02;
        for byte in &mut pubkey[1..] {
            *byte = rand::random::<u8>();
        }
        Self {
            pubkey: PubKey(pubkey),
            side,
            trading_pair: TradingPair::new(crate::Asset(1), crate::Asset(2)),
            amount_have,
            amount_want,
            orderbook_price: 0.0,
            auction_id,
            nonce: OrderNonce::from(rand::random::<u16>()),
            signature: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(side: OrderSide, have: u64, want: u64) -> AuctionOrder {
        AuctionOrder::dummy(side, have, want, AuctionId([7u8; 32]))
    }

    #[test]
    fn buy_price() {
        let o = order(OrderSide::Buy, 100, 200);
        assert!((o.price().unwrap() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sell_price() {
        let o = order(OrderSide::Sell, 200, 100);
        assert!((o.price().unwrap() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_want_is_divide_by_zero_on_both_sides() {
        for side in [OrderSide::Buy, OrderSide::Sell] {
            let o = order(side, 100, 0);
            assert_eq!(o.price().unwrap_err(), SealbidError::DivideByZero);
        }
    }

    #[test]
    fn set_then_get_buy() {
        let mut o = order(OrderSide::Buy, 100, 1);
        o.set_amount_want(2.0).unwrap();
        assert_eq!(o.amount_want, 200);
        assert!((o.price().unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn set_then_get_sell() {
        let mut o = order(OrderSide::Sell, 300, 1);
        o.set_amount_want(1.5).unwrap();
        assert_eq!(o.amount_want, 200);
        assert!((o.price().unwrap() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn set_amount_want_rounds() {
        let mut o = order(OrderSide::Buy, 3, 1);
        o.set_amount_want(0.5).unwrap();
        // 1.5 rounds away from zero
        assert_eq!(o.amount_want, 2);
    }

    #[test]
    fn non_positive_price_rejected() {
        let mut o = order(OrderSide::Buy, 100, 50);
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                o.set_amount_want(bad),
                Err(SealbidError::InvalidPrice(_))
            ));
        }
        assert_eq!(o.amount_want, 50, "failed update must not touch the order");
    }

    #[test]
    fn unrepresentable_amount_rejected() {
        let mut buy = order(OrderSide::Buy, u64::MAX / 2, 7);
        assert_eq!(
            buy.set_amount_want(4.0).unwrap_err(),
            SealbidError::AmountOutOfRange { price: 4.0 }
        );
        assert_eq!(buy.amount_want, 7);

        let mut sell = order(OrderSide::Sell, 10, 9);
        assert!(matches!(
            sell.set_amount_want(1e-300),
            Err(SealbidError::AmountOutOfRange { .. })
        ));
        assert_eq!(sell.amount_want, 9);

        // Large but representable results still go through.
        let mut edge = order(OrderSide::Buy, 1 << 40, 1);
        edge.set_amount_want(1024.0).unwrap();
        assert_eq!(edge.amount_want, 1 << 50);
    }

    #[test]
    fn zero_have_buy_prices_at_infinity() {
        let o = order(OrderSide::Buy, 0, 5);
        assert!(o.price().unwrap().is_infinite());
    }

    #[test]
    fn side_helpers_are_total() {
        let buy = order(OrderSide::Buy, 1, 1);
        let sell = order(OrderSide::Sell, 1, 1);
        assert!(buy.is_buy_side() && !buy.is_sell_side());
        assert!(sell.is_sell_side() && !sell.is_buy_side());
        assert_eq!(buy.opposite_side(), OrderSide::Sell);
        assert_eq!(sell.opposite_side(), OrderSide::Buy);
    }

    #[test]
    fn side_parsing() {
        assert_eq!("buy".parse::<OrderSide>().unwrap(), OrderSide::Buy);
        assert_eq!("sell".parse::<OrderSide>().unwrap(), OrderSide::Sell);
        assert_eq!(
            "BUY".parse::<OrderSide>().unwrap_err(),
            SealbidError::InvalidSide("BUY".into())
        );
        assert!("".parse::<OrderSide>().is_err());
    }

    #[test]
    fn equality_ignores_orderbook_price() {
        let a = order(OrderSide::Buy, 10, 20);
        let mut b = a.clone();
        b.orderbook_price = 42.0;
        assert_eq!(a, b);
        b.amount_have = 11;
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_json() {
        let o = order(OrderSide::Sell, 5, 6);
        let text = format!("{o}");
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["side"], "sell");
        assert_eq!(value["amount_have"], 5);
        assert_eq!(value["pair"]["asset_want"], 1);
    }
}

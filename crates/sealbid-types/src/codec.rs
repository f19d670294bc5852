//! Canonical binary encoding of an [`AuctionOrder`].
//!
//! This layout is what bidders sign and what the exchange decodes after a
//! puzzle is solved, so it must match bit-for-bit across implementations:
//!
//! ```text
//! pubkey[33] | pair[2] | amount_have[8 LE] | amount_want[8 LE]
//!   | side_len[8 LE] | side[side_len] | auction_id[32] | nonce[2]
//!   | sig_len[8 LE] | signature[sig_len]
//! ```
//!
//! The signable encoding is the same layout cut off after `nonce`.
//! `orderbook_price` is never encoded.

use crate::{
    constants, AuctionId, AuctionOrder, OrderNonce, OrderSide, PubKey, Result, SealbidError,
    TradingPair,
};

/// Cursor over an input buffer. Every read is bounds-checked.
pub struct Reader<'a> {
    data: &'a [u8],
    consumed: usize,
}

impl<'a> Reader<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, consumed: 0 }
    }

    /// Take the next `len` bytes.
    ///
    /// # Errors
    /// `TooShort` if fewer than `len` bytes remain.
    pub fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.data.len() < len {
            return Err(SealbidError::TooShort {
                needed: self.consumed.saturating_add(len),
                actual: self.consumed + self.data.len(),
            });
        }
        let (head, tail) = self.data.split_at(len);
        self.data = tail;
        self.consumed += len;
        Ok(head)
    }

    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    pub fn u8(&mut self) -> Result<u8> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn u64_le(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    /// Read an 8-byte little-endian length prefix and then that many bytes.
    pub fn length_prefixed(&mut self) -> Result<&'a [u8]> {
        let len = self.u64_le()?;
        let len = usize::try_from(len).map_err(|_| SealbidError::LengthOverflow(len))?;
        self.take(len)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len()
    }

    /// Succeeds only if every input byte was consumed.
    ///
    /// # Errors
    /// `TrailingBytes` otherwise.
    pub fn finish(self) -> Result<()> {
        if self.data.is_empty() {
            Ok(())
        } else {
            Err(SealbidError::TrailingBytes {
                count: self.data.len(),
            })
        }
    }
}

/// Append `bytes` preceded by their length as 8 little-endian bytes.
pub fn put_length_prefixed(buf: &mut Vec<u8>, bytes: &[u8]) {
    buf.extend_from_slice(&(bytes.len() as u64).to_le_bytes());
    buf.extend_from_slice(bytes);
}

impl AuctionOrder {
    /// The bytes that get signed, and verified. A strict prefix of
    /// [`Self::serialize`].
    #[must_use]
    pub fn serialize_signable(&self) -> Vec<u8> {
        let side = self.side.as_wire_str().as_bytes();
        let mut buf =
            Vec::with_capacity(constants::MIN_ORDER_LEN + side.len() + self.signature.len());
        buf.extend_from_slice(self.pubkey.as_bytes());
        buf.extend_from_slice(&self.trading_pair.to_bytes());
        buf.extend_from_slice(&self.amount_have.to_le_bytes());
        buf.extend_from_slice(&self.amount_want.to_le_bytes());
        put_length_prefixed(&mut buf, side);
        buf.extend_from_slice(self.auction_id.as_bytes());
        buf.extend_from_slice(&self.nonce.0);
        buf
    }

    /// Full wire encoding, signature included.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = self.serialize_signable();
        put_length_prefixed(&mut buf, &self.signature);
        buf
    }

    /// Decode an order from its wire encoding.
    ///
    /// `orderbook_price` comes back as `0.0`.
    ///
    /// # Errors
    /// - `TooShort` if the input is shorter than the fixed-width fields, or
    ///   a length prefix points past the end
    /// - `InvalidSide` if the side is neither `buy` nor `sell`
    /// - `TrailingBytes` if bytes remain after the signature
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        if data.len() < constants::MIN_ORDER_LEN {
            return Err(SealbidError::TooShort {
                needed: constants::MIN_ORDER_LEN,
                actual: data.len(),
            });
        }

        let mut r = Reader::new(data);
        let pubkey = PubKey(r.take_array()?);
        let trading_pair = TradingPair::from_bytes(r.take_array()?);
        let amount_have = r.u64_le()?;
        let amount_want = r.u64_le()?;
        let side_bytes = r.length_prefixed()?;
        let side = std::str::from_utf8(side_bytes)
            .map_err(|_| SealbidError::InvalidSide(String::from_utf8_lossy(side_bytes).into_owned()))?
            .parse::<OrderSide>()?;
        let auction_id = AuctionId(r.take_array()?);
        let nonce = OrderNonce(r.take_array()?);
        let signature = r.length_prefixed()?.to_vec();
        r.finish()?;

        Ok(Self {
            pubkey,
            side,
            trading_pair,
            amount_have,
            amount_want,
            orderbook_price: 0.0,
            auction_id,
            nonce,
            signature,
        })
    }
}

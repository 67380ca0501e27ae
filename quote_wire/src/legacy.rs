//! Legacy fixed record: symbol, price, quantity and timestamp.
//!
//! Older listeners expect a 48-byte record without a field list:
//! the 24-byte symbol block followed by the scaled price, the scaled
//! quantity and the capture timestamp in microseconds, each a little-endian
//! `i64`. Both price and quantity use [`PRICE_SCALE`](crate::layout::PRICE_SCALE).
use std::fmt;

use crate::layout::{
    SYMBOL_LEN, decode_symbol, encode_symbol, read_i64, scale_price, unscale_price, write_i64,
};
use crate::record::{QuoteUpdate, format_timestamp, now_micros};
use crate::result::Result;

const PRICE_OFFSET: usize = SYMBOL_LEN;
const QUANTITY_OFFSET: usize = PRICE_OFFSET + 8;
const TIMESTAMP_OFFSET: usize = QUANTITY_OFFSET + 8;

/// Size of an encoded legacy record.
pub const LEGACY_RECORD_LEN: usize = TIMESTAMP_OFFSET + 8;

/// Encoded legacy record, exactly [`LEGACY_RECORD_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyRecord {
    bytes: [u8; LEGACY_RECORD_LEN],
}

impl LegacyRecord {
    /// Encodes a price/quantity print stamped with the current time.
    pub fn encode(symbol: &str, price: f64, quantity: f64) -> Result<Self> {
        Self::encode_at(symbol, price, quantity, now_micros())
    }

    /// Encodes a price/quantity print with an explicit timestamp.
    pub fn encode_at(
        symbol: &str,
        price: f64,
        quantity: f64,
        timestamp_micros: i64,
    ) -> Result<Self> {
        let block = encode_symbol(symbol)?;
        let mut bytes = [0u8; LEGACY_RECORD_LEN];
        bytes[..SYMBOL_LEN].copy_from_slice(&block);
        write_i64(&mut bytes, PRICE_OFFSET, scale_price(price));
        write_i64(&mut bytes, QUANTITY_OFFSET, scale_price(quantity));
        write_i64(&mut bytes, TIMESTAMP_OFFSET, timestamp_micros);
        Ok(LegacyRecord { bytes })
    }

    /// Folds a two-sided quote into a legacy print.
    ///
    /// The price is the bid/ask midpoint and the quantity is the volume.
    pub fn from_update(update: &QuoteUpdate, timestamp_micros: i64) -> Result<Self> {
        let mid = (update.bid + update.ask) / 2.0;
        Self::encode_at(&update.symbol, mid, update.volume as f64, timestamp_micros)
    }

    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Symbol without its zero padding.
    pub fn symbol(&self) -> &str {
        decode_symbol(&self.bytes[..SYMBOL_LEN])
    }

    /// Price as a floating point value.
    pub fn price(&self) -> f64 {
        unscale_price(read_i64(&self.bytes, PRICE_OFFSET))
    }

    /// Quantity as a floating point value.
    pub fn quantity(&self) -> f64 {
        unscale_price(read_i64(&self.bytes, QUANTITY_OFFSET))
    }

    /// Capture time in microseconds since the Unix epoch.
    pub fn timestamp_micros(&self) -> i64 {
        read_i64(&self.bytes, TIMESTAMP_OFFSET)
    }
}

impl AsRef<[u8]> for LegacyRecord {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for LegacyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{symbol<{}>, price<{}>, quantity<{}>, timestamp<{}>}}",
            self.symbol(),
            self.price(),
            self.quantity(),
            format_timestamp(self.timestamp_micros())
        )
    }
}

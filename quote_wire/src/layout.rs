//! Byte layout shared by every record published on the wire.
//!
//! All integers are little-endian regardless of the host. A field record
//! looks like this:
//!
//! | Offset | Size | Content                                   |
//! |--------|------|-------------------------------------------|
//! | 0      | 24   | symbol, ASCII, zero padded                |
//! | 24     | 8    | timestamp, `i64` microseconds since epoch |
//! | 32     | 2    | field count, `i16`                        |
//! | 34     | 12×n | fields: 3-byte tag, 1-byte type, `i64`    |
//!
//! There is no trailing alignment filler.
use strum_macros::Display;

use crate::error::WireError;
use crate::result::Result;

/// Size of the zero padded symbol block.
pub const SYMBOL_LEN: usize = 24;
/// Offset of the capture timestamp.
pub const TIMESTAMP_OFFSET: usize = SYMBOL_LEN;
/// Offset of the field count.
pub const FIELD_COUNT_OFFSET: usize = TIMESTAMP_OFFSET + 8;
/// Offset of the first field entry.
pub const FIELDS_OFFSET: usize = FIELD_COUNT_OFFSET + 2;
/// Length of a field tag.
pub const TAG_LEN: usize = 3;
/// Size of one field entry: tag, type code and payload.
pub const FIELD_LEN: usize = TAG_LEN + 1 + 8;
/// Prices travel as integers equal to the real value times this factor.
pub const PRICE_SCALE: f64 = 1_000_000_000.0;

/// Type code stored after each field tag.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FieldType {
    /// Raw integer payload (counts).
    Integer = 1,
    /// Fixed-point payload, real value times [`PRICE_SCALE`].
    ScaledDecimal = 2,
}

impl FieldType {
    /// Wire value of the type code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Maps a wire type code back to a `FieldType`.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(FieldType::Integer),
            2 => Some(FieldType::ScaledDecimal),
            _ => None,
        }
    }
}

/// Offset of the field entry at `index`.
pub const fn field_offset(index: usize) -> usize {
    FIELDS_OFFSET + index * FIELD_LEN
}

/// Total record size for a record carrying `field_count` fields.
pub const fn record_len(field_count: usize) -> usize {
    field_offset(field_count)
}

/// Converts a price to its fixed-point payload.
///
/// The `as` cast truncates toward zero, saturates at the `i64` bounds and maps
/// NaN to zero.
pub fn scale_price(price: f64) -> i64 {
    (price * PRICE_SCALE) as i64
}

/// Converts a fixed-point payload back to a price.
pub fn unscale_price(raw: i64) -> f64 {
    raw as f64 / PRICE_SCALE
}

/// Builds the zero padded symbol block.
///
/// Fails with [`WireError::InvalidSymbolLength`] when the symbol is longer than
/// the block and with [`WireError::NonAsciiSymbol`] when it is not ASCII.
pub fn encode_symbol(symbol: &str) -> Result<[u8; SYMBOL_LEN]> {
    if !symbol.is_ascii() {
        return Err(WireError::NonAsciiSymbol(symbol.to_string()));
    }
    let bytes = symbol.as_bytes();
    if bytes.len() > SYMBOL_LEN {
        return Err(WireError::InvalidSymbolLength {
            symbol: symbol.to_string(),
            len: bytes.len(),
            max: SYMBOL_LEN,
        });
    }
    let mut block = [0u8; SYMBOL_LEN];
    block[..bytes.len()].copy_from_slice(bytes);
    Ok(block)
}

/// Reads a symbol block back, stopping at the first zero byte.
pub fn decode_symbol(block: &[u8]) -> &str {
    let end = block.iter().position(|&b| b == 0).unwrap_or(block.len());
    std::str::from_utf8(&block[..end]).unwrap_or("")
}

pub(crate) fn write_i64(buf: &mut [u8], offset: usize, value: i64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

pub(crate) fn read_i64(buf: &[u8], offset: usize) -> i64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&buf[offset..offset + 8]);
    i64::from_le_bytes(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_match_table() {
        assert_eq!(TIMESTAMP_OFFSET, 24);
        assert_eq!(FIELD_COUNT_OFFSET, 32);
        assert_eq!(FIELDS_OFFSET, 34);
        assert_eq!(FIELD_LEN, 12);
        assert_eq!(field_offset(1), 46);
        assert_eq!(record_len(3), 70);
    }

    #[test]
    fn symbol_is_zero_padded() {
        let block = encode_symbol("MSFT").unwrap();
        assert_eq!(&block[..4], b"MSFT");
        assert!(block[4..].iter().all(|&b| b == 0));
        assert_eq!(decode_symbol(&block), "MSFT");
    }

    #[test]
    fn symbol_of_exactly_24_bytes_fills_block() {
        let symbol = "ABCDEFGHIJKLMNOPQRSTUVWX";
        let block = encode_symbol(symbol).unwrap();
        assert_eq!(&block[..], symbol.as_bytes());
        assert_eq!(decode_symbol(&block), symbol);
    }

    #[test]
    fn empty_symbol_is_all_zero() {
        assert_eq!(encode_symbol("").unwrap(), [0u8; SYMBOL_LEN]);
    }

    #[test]
    fn long_symbol_is_rejected() {
        let err = encode_symbol("ABCDEFGHIJKLMNOPQRSTUVWXY").unwrap_err();
        match err {
            WireError::InvalidSymbolLength { len, max, .. } => {
                assert_eq!(len, 25);
                assert_eq!(max, 24);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_ascii_symbol_is_rejected() {
        assert!(matches!(
            encode_symbol("ÆBC"),
            Err(WireError::NonAsciiSymbol(_))
        ));
    }

    #[test]
    fn scaling_truncates_toward_zero() {
        assert_eq!(scale_price(100.01), 100_010_000_000);
        assert_eq!(scale_price(1.0000000009), 1_000_000_000);
        assert_eq!(scale_price(-1.0000000009), -1_000_000_000);
        assert_eq!(scale_price(0.0), 0);
        assert_eq!(scale_price(f64::NAN), 0);
        assert_eq!(scale_price(f64::INFINITY), i64::MAX);
    }

    #[test]
    fn type_codes() {
        assert_eq!(FieldType::Integer.code(), 1);
        assert_eq!(FieldType::ScaledDecimal.code(), 2);
        assert_eq!(FieldType::from_code(2), Some(FieldType::ScaledDecimal));
        assert_eq!(FieldType::from_code(7), None);
        assert_eq!(FieldType::ScaledDecimal.to_string(), "scaled_decimal");
    }
}

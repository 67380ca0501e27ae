//! Quote update model and the field record encoder.
//!
//! A `QuoteUpdate` is what the publisher hands over per symbol per tick. It is
//! encoded into a `WireRecord`: the symbol block, a capture timestamp taken at
//! encode time, the field count and the fixed field list `bid`, `ask`, `vol`.
//! The field list is described once in [`QUOTE_FIELDS`] and written in a single
//! pass, so the produced bytes always agree with the table.
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::layout::{
    FIELD_COUNT_OFFSET, FIELD_LEN, FIELDS_OFFSET, FieldType, SYMBOL_LEN, TAG_LEN,
    TIMESTAMP_OFFSET, decode_symbol, encode_symbol, field_offset, read_i64, record_len,
    scale_price, unscale_price, write_i64,
};
use crate::result::Result;

/// Market quote for a single symbol, as fetched from a data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteUpdate {
    /// Ticker identifier, ASCII, at most 24 bytes.
    pub symbol: String,
    /// Best bid price.
    pub bid: f64,
    /// Best ask price.
    pub ask: f64,
    /// Traded volume, passed through unscaled.
    pub volume: i64,
}

impl QuoteUpdate {
    /// Creates a new quote update.
    pub fn new(symbol: &str, bid: f64, ask: f64, volume: i64) -> Self {
        QuoteUpdate {
            symbol: symbol.to_string(),
            bid,
            ask,
            volume,
        }
    }
}

/// Descriptor of one entry in the field list.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Three ASCII characters naming the field.
    pub tag: [u8; TAG_LEN],
    /// How the payload is interpreted.
    pub kind: FieldType,
    /// Produces the payload from a quote.
    pub value: fn(&QuoteUpdate) -> i64,
}

impl FieldSpec {
    /// Tag as a string slice.
    pub fn tag_str(&self) -> &str {
        std::str::from_utf8(&self.tag).unwrap_or("")
    }
}

/// Field list of a quote record, in wire order.
pub const QUOTE_FIELDS: [FieldSpec; 3] = [
    FieldSpec {
        tag: *b"bid",
        kind: FieldType::ScaledDecimal,
        value: |q| scale_price(q.bid),
    },
    FieldSpec {
        tag: *b"ask",
        kind: FieldType::ScaledDecimal,
        value: |q| scale_price(q.ask),
    },
    FieldSpec {
        tag: *b"vol",
        kind: FieldType::Integer,
        value: |q| q.volume,
    },
];

/// Number of fields in a quote record.
pub const QUOTE_FIELD_COUNT: usize = QUOTE_FIELDS.len();

/// Size of an encoded quote record.
pub const RECORD_LEN: usize = record_len(QUOTE_FIELD_COUNT);

/// One entry of an encoded field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Raw tag bytes.
    pub tag: [u8; TAG_LEN],
    /// Raw type code.
    pub type_code: u8,
    /// Raw payload.
    pub value: i64,
}

impl Field {
    /// Tag as a string slice, empty if the tag is not ASCII.
    pub fn tag_str(&self) -> &str {
        std::str::from_utf8(&self.tag).unwrap_or("")
    }

    /// Type of the payload, if the code is known.
    pub fn kind(&self) -> Option<FieldType> {
        FieldType::from_code(self.type_code)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(FieldType::ScaledDecimal) => {
                write!(f, "{}<{}>", self.tag_str(), unscale_price(self.value))
            }
            _ => write!(f, "{}<{}>", self.tag_str(), self.value),
        }
    }
}

/// Encoded quote record, exactly [`RECORD_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRecord {
    bytes: [u8; RECORD_LEN],
}

impl WireRecord {
    /// Encodes `update`, stamping it with the current time.
    pub fn encode(update: &QuoteUpdate) -> Result<Self> {
        Self::encode_at(update, now_micros())
    }

    /// Encodes `update` with an explicit capture timestamp.
    pub fn encode_at(update: &QuoteUpdate, timestamp_micros: i64) -> Result<Self> {
        let symbol = encode_symbol(&update.symbol)?;

        let mut bytes = [0u8; RECORD_LEN];
        bytes[..SYMBOL_LEN].copy_from_slice(&symbol);
        write_i64(&mut bytes, TIMESTAMP_OFFSET, timestamp_micros);
        bytes[FIELD_COUNT_OFFSET..FIELDS_OFFSET]
            .copy_from_slice(&(QUOTE_FIELD_COUNT as i16).to_le_bytes());

        for (index, spec) in QUOTE_FIELDS.iter().enumerate() {
            let at = field_offset(index);
            bytes[at..at + TAG_LEN].copy_from_slice(&spec.tag);
            bytes[at + TAG_LEN] = spec.kind.code();
            write_i64(&mut bytes, at + TAG_LEN + 1, (spec.value)(update));
        }

        Ok(WireRecord { bytes })
    }

    /// The encoded bytes, ready to be sent as one datagram.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Record size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; records have a fixed non-zero size.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Symbol without its zero padding.
    pub fn symbol(&self) -> &str {
        decode_symbol(&self.bytes[..SYMBOL_LEN])
    }

    /// Capture time in microseconds since the Unix epoch.
    pub fn timestamp_micros(&self) -> i64 {
        read_i64(&self.bytes, TIMESTAMP_OFFSET)
    }

    /// Number of field entries announced by the header.
    pub fn field_count(&self) -> i16 {
        i16::from_le_bytes([
            self.bytes[FIELD_COUNT_OFFSET],
            self.bytes[FIELD_COUNT_OFFSET + 1],
        ])
    }

    /// Field entries in wire order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.bytes[FIELDS_OFFSET..]
            .chunks_exact(FIELD_LEN)
            .map(|entry| {
                let mut tag = [0u8; TAG_LEN];
                tag.copy_from_slice(&entry[..TAG_LEN]);
                Field {
                    tag,
                    type_code: entry[TAG_LEN],
                    value: read_i64(entry, TAG_LEN + 1),
                }
            })
    }
}

impl AsRef<[u8]> for WireRecord {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for WireRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{symbol<{}>, timestamp<{}>, # of fields<{}>:",
            self.symbol(),
            format_timestamp(self.timestamp_micros()),
            self.field_count()
        )?;
        for field in self.fields() {
            write!(f, " {}", field)?;
        }
        write!(f, "}}")
    }
}

/// Encodes a quote record from scalar values, stamped with the current time.
pub fn encode(symbol: &str, bid: f64, ask: f64, volume: i64) -> Result<WireRecord> {
    WireRecord::encode(&QuoteUpdate::new(symbol, bid, ask, volume))
}

/// Current wall-clock time in microseconds since the Unix epoch.
pub fn now_micros() -> i64 {
    Utc::now().timestamp_micros()
}

pub(crate) fn format_timestamp(micros: i64) -> String {
    DateTime::<Utc>::from_timestamp_micros(micros)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string())
        .unwrap_or_else(|| micros.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WireError;

    fn ibm() -> WireRecord {
        let update = QuoteUpdate::new("IBM", 100.01, 200.02, 1_000_000);
        WireRecord::encode_at(&update, 1_700_000_000_000_000).unwrap()
    }

    #[test]
    fn record_is_70_bytes() {
        assert_eq!(RECORD_LEN, 70);
        assert_eq!(ibm().len(), 70);
        assert_eq!(ibm().as_bytes().len(), 70);
    }

    #[test]
    fn ibm_example_layout() {
        let record = ibm();
        let bytes = record.as_bytes();
        assert_eq!(&bytes[0..3], b"IBM");
        assert!(bytes[3..24].iter().all(|&b| b == 0));
        assert_eq!(&bytes[24..32], &1_700_000_000_000_000i64.to_le_bytes());
        assert_eq!(&bytes[32..34], &3i16.to_le_bytes());
        assert_eq!(&bytes[34..37], b"bid");
        assert_eq!(bytes[37], 2);
        assert_eq!(&bytes[38..46], &100_010_000_000i64.to_le_bytes());
        assert_eq!(&bytes[46..49], b"ask");
        assert_eq!(bytes[49], 2);
        assert_eq!(&bytes[50..58], &200_020_000_000i64.to_le_bytes());
        assert_eq!(&bytes[58..61], b"vol");
        assert_eq!(bytes[61], 1);
        assert_eq!(&bytes[62..70], &1_000_000i64.to_le_bytes());
    }

    #[test]
    fn accessors_read_back_header() {
        let record = ibm();
        assert_eq!(record.symbol(), "IBM");
        assert_eq!(record.timestamp_micros(), 1_700_000_000_000_000);
        assert_eq!(record.field_count(), 3);
    }

    #[test]
    fn fields_are_bid_ask_vol() {
        let fields: Vec<Field> = ibm().fields().collect();
        let tags: Vec<&str> = fields.iter().map(|f| f.tag_str()).collect();
        let codes: Vec<u8> = fields.iter().map(|f| f.type_code).collect();
        assert_eq!(tags, ["bid", "ask", "vol"]);
        assert_eq!(codes, [2, 2, 1]);
        assert_eq!(fields[2].value, 1_000_000);
        assert_eq!(fields[0].kind(), Some(FieldType::ScaledDecimal));
    }

    #[test]
    fn field_table_matches_record() {
        let record = ibm();
        for (spec, field) in QUOTE_FIELDS.iter().zip(record.fields()) {
            assert_eq!(spec.tag, field.tag);
            assert_eq!(spec.kind.code(), field.type_code);
        }
        assert_eq!(QUOTE_FIELDS[0].tag_str(), "bid");
    }

    #[test]
    fn long_symbol_fails_without_output() {
        let update = QuoteUpdate::new("THIS_SYMBOL_IS_FAR_TOO_LONG", 1.0, 2.0, 3);
        assert!(matches!(
            WireRecord::encode(&update),
            Err(WireError::InvalidSymbolLength { len: 27, max: 24, .. })
        ));
    }

    #[test]
    fn negative_volume_passes_through() {
        let record = WireRecord::encode_at(&QuoteUpdate::new("X", 0.0, 0.0, -5), 0).unwrap();
        assert_eq!(record.fields().last().map(|f| f.value), Some(-5));
    }

    #[test]
    fn encode_stamps_current_time() {
        let before = now_micros();
        let record = encode("MSFT", 1.0, 2.0, 10).unwrap();
        let after = now_micros();
        assert!(record.timestamp_micros() >= before);
        assert!(record.timestamp_micros() <= after);
    }

    #[test]
    fn display_describes_record() {
        let text = ibm().to_string();
        assert!(text.starts_with("{symbol<IBM>, timestamp<2023-11-14 22:13:20.000000>"));
        assert!(text.contains("# of fields<3>"));
        assert!(text.contains("bid<100.01>"));
        assert!(text.contains("ask<200.02>"));
        assert!(text.ends_with("vol<1000000>}"));
    }
}

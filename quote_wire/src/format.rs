//! Record formats the publisher can put on the wire.
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::legacy::LegacyRecord;
use crate::record::{QuoteUpdate, WireRecord, now_micros};
use crate::result::Result;

/// Wire layout selector.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    Hash,
    Eq,
    PartialEq,
)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    /// 70-byte record with the tagged `bid`/`ask`/`vol` field list.
    #[default]
    Fields,
    /// 48-byte symbol/price/quantity/timestamp record.
    Legacy,
}

impl RecordFormat {
    /// Encodes `update` in this format, stamped with the current time.
    pub fn encode(self, update: &QuoteUpdate) -> Result<EncodedRecord> {
        let timestamp = now_micros();
        match self {
            RecordFormat::Fields => Ok(EncodedRecord::Fields(WireRecord::encode_at(
                update, timestamp,
            )?)),
            RecordFormat::Legacy => Ok(EncodedRecord::Legacy(LegacyRecord::from_update(
                update, timestamp,
            )?)),
        }
    }
}

/// A record encoded in one of the [`RecordFormat`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedRecord {
    /// Tagged field record.
    Fields(WireRecord),
    /// Legacy fixed record.
    Legacy(LegacyRecord),
}

impl EncodedRecord {
    /// The encoded bytes, ready to be sent as one datagram.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            EncodedRecord::Fields(record) => record.as_bytes(),
            EncodedRecord::Legacy(record) => record.as_bytes(),
        }
    }
}

impl std::fmt::Display for EncodedRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodedRecord::Fields(record) => std::fmt::Display::fmt(record, f),
            EncodedRecord::Legacy(record) => std::fmt::Display::fmt(record, f),
        }
    }
}

//! Upstream quote sources.
//!
//! The publisher only needs per-symbol scalar values; where they come from is
//! behind the `QuoteSource` trait. Any `FnMut(&str) -> Result<SourceQuote>`
//! closure is a source as well.
use clap::ValueEnum;
use quote_wire::Result;
use serde::de::{Deserializer, Error as _};
use serde::Deserialize;
use strum::{Display, EnumString};

/// Values fetched for one symbol on one tick.
///
/// Missing values default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceQuote {
    /// Best bid price.
    pub bid: f64,
    /// Best ask price.
    pub ask: f64,
    /// Traded volume. Feeds that report volume as a float are accepted as
    /// long as the value is a whole number.
    #[serde(deserialize_with = "whole_volume")]
    pub volume: i64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawVolume {
    Integer(i64),
    Float(f64),
}

fn whole_volume<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match RawVolume::deserialize(deserializer)? {
        RawVolume::Integer(volume) => Ok(volume),
        RawVolume::Float(volume)
            if volume.fract() == 0.0 && volume >= i64::MIN as f64 && volume < i64::MAX as f64 =>
        {
            Ok(volume as i64)
        }
        RawVolume::Float(volume) => Err(D::Error::custom(format!(
            "volume {} is not a whole number",
            volume
        ))),
    }
}

impl SourceQuote {
    /// Creates a new quote triple.
    pub fn new(bid: f64, ask: f64, volume: i64) -> Self {
        SourceQuote { bid, ask, volume }
    }
}

/// Provider of quote values, polled once per symbol per tick.
pub trait QuoteSource {
    /// Fetches the current values for `symbol`.
    fn fetch(&mut self, symbol: &str) -> Result<SourceQuote>;
}

impl<F> QuoteSource for F
where
    F: FnMut(&str) -> Result<SourceQuote>,
{
    fn fetch(&mut self, symbol: &str) -> Result<SourceQuote> {
        self(symbol)
    }
}

/// Source implementations selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display, EnumString)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum SourceKind {
    /// Random-walk prices generated in process.
    Synthetic,
    /// Quotes read from a JSON-lines file.
    Replay,
    /// Deterministic ramp starting at 100.01 / 200.02 / 1000000.
    Demo,
}

//! Quotes replayed from a JSON-lines file.
//!
//! Every non-empty line that does not start with `#` is one object:
//!
//! ```text
//! {"symbol": "IBM", "bid": 100.01, "ask": 100.03, "volume": 1200}
//! ```
//!
//! Numeric fields may be omitted and default to zero. Volume may be written
//! as a float if it is a whole number. Quotes are replayed per symbol in file
//! order and wrap around at the end. A symbol that never appears in the file
//! yields an all-zero quote.
use std::collections::HashMap;
use std::io::BufRead;

use log::debug;
use quote_wire::{Result, WireError};
use serde::Deserialize;

use crate::model::source::{QuoteSource, SourceQuote};

#[derive(Debug, Deserialize)]
struct ReplayLine {
    symbol: String,
    #[serde(flatten)]
    quote: SourceQuote,
}

#[derive(Debug, Default)]
struct Track {
    quotes: Vec<SourceQuote>,
    cursor: usize,
}

/// Source cycling through recorded quotes.
#[derive(Debug, Default)]
pub struct ReplaySource {
    tracks: HashMap<String, Track>,
}

impl ReplaySource {
    /// Loads all quotes from `reader`.
    ///
    /// Fails on the first line that is not a valid quote object.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut source = ReplaySource::default();
        for (index, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(WireError::Io)?;
            let trimmed_line = line.trim();
            if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                continue;
            }
            let parsed: ReplayLine = serde_json::from_str(trimmed_line)
                .map_err(|e| WireError::Format(format!("replay line {}: {}", index + 1, e)))?;
            source
                .tracks
                .entry(parsed.symbol)
                .or_default()
                .quotes
                .push(parsed.quote);
        }
        Ok(source)
    }

    /// Number of recorded quotes across all symbols.
    pub fn len(&self) -> usize {
        self.tracks.values().map(|t| t.quotes.len()).sum()
    }

    /// Whether the file held no quotes at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl QuoteSource for ReplaySource {
    fn fetch(&mut self, symbol: &str) -> Result<SourceQuote> {
        let Some(track) = self.tracks.get_mut(symbol) else {
            debug!("No recorded quotes for {}", symbol);
            return Ok(SourceQuote::default());
        };
        if track.quotes.is_empty() {
            return Ok(SourceQuote::default());
        }
        let quote = track.quotes[track.cursor];
        track.cursor = (track.cursor + 1) % track.quotes.len();
        Ok(quote)
    }
}

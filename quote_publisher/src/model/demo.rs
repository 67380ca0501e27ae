//! Deterministic ramp used to smoke-test listeners.
//!
//! The n-th fetch of a symbol (starting at zero) yields bid `100.01 + n`,
//! ask `200.02 + n` and volume `1000000 + n`.
use std::collections::HashMap;

use quote_wire::Result;

use crate::model::source::{QuoteSource, SourceQuote};

const BASE_BID: f64 = 100.01;
const BASE_ASK: f64 = 200.02;
const BASE_VOLUME: i64 = 1_000_000;

/// Ramp source, one counter per symbol.
#[derive(Debug, Default)]
pub struct DemoSource {
    steps: HashMap<String, i64>,
}

impl DemoSource {
    /// Creates a ramp starting at step zero for every symbol.
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuoteSource for DemoSource {
    fn fetch(&mut self, symbol: &str) -> Result<SourceQuote> {
        let step = self.steps.entry(symbol.to_string()).or_insert(0);
        let n = *step;
        *step += 1;
        Ok(SourceQuote::new(
            BASE_BID + n as f64,
            BASE_ASK + n as f64,
            BASE_VOLUME + n,
        ))
    }
}

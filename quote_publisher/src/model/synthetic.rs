//! Random-walk quote generator.
//!
//! Keeps a mid price per symbol and moves it by up to ±1% on every fetch, so
//! consecutive quotes for a symbol look like a plausible price path. The
//! bid/ask straddle the mid with a spread proportional to the price.
use std::collections::HashMap;

use quote_wire::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::model::source::{QuoteSource, SourceQuote};

/// Mid price every symbol starts from.
pub const INITIAL_PRICE: f64 = 100.0;
/// Half of the bid/ask spread relative to the mid price.
const HALF_SPREAD: f64 = 0.0005;

/// Synthetic market generating quotes for any symbol it is asked about.
pub struct SyntheticSource {
    rng: StdRng,
    prices: HashMap<String, f64>,
}

impl SyntheticSource {
    /// Creates a generator seeded from the OS.
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_os_rng())
    }

    /// Creates a reproducible generator.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        SyntheticSource {
            rng,
            prices: HashMap::new(),
        }
    }

    /// Next mid price: a uniform move in `[-1%, +1%]` around `current_price`,
    /// never below one cent.
    fn next_price(&mut self, current_price: f64) -> f64 {
        let change: f64 = self.rng.random_range(-0.01..0.01);
        let new_price = current_price * (1.0 + change);
        new_price.max(0.01)
    }

    /// Liquid names trade more.
    fn next_volume(&mut self, symbol: &str) -> i64 {
        match symbol {
            "AAPL" | "MSFT" | "TSLA" => 1000 + self.rng.random_range(0..5000),
            _ => 100 + self.rng.random_range(0..1000),
        }
    }
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteSource for SyntheticSource {
    fn fetch(&mut self, symbol: &str) -> Result<SourceQuote> {
        let current = self.prices.get(symbol).copied().unwrap_or(INITIAL_PRICE);
        let mid = self.next_price(current);
        self.prices.insert(symbol.to_string(), mid);

        let half_spread = (mid * HALF_SPREAD).max(0.005);
        let bid = round_cents(mid - half_spread).max(0.0);
        let ask = round_cents(mid + half_spread).max(bid + 0.01);
        let volume = self.next_volume(symbol);
        Ok(SourceQuote::new(bid, ask, volume))
    }
}

fn round_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

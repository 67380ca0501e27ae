//! Quote multicast publisher.
//!
//! This binary polls a quote source for a list of symbols on a fixed interval,
//! encodes every quote into a fixed-layout binary record and publishes it as a
//! single UDP datagram to a multicast group. It wires together:
//!
//! - a `QuoteSource` — synthetic random walk, JSON-lines replay or a
//!   deterministic demo ramp (see `model`);
//! - `MulticastTransport` — one socket with a bounded multicast TTL, opened once
//!   and closed on exit;
//! - `Publisher` — fetch → encode → send per symbol per tick.
//!
//! Ticks are scheduled with `crossbeam_channel::tick`; Ctrl+C sends a stop
//! signal that the publishing loop picks up between ticks.
//!
//! Usage example (CLI):
//! ```bash
//! quote_publisher --group 239.9.61.1 --port 5000 --ttl 1 --symbols IBM,MSFT
//! ```
#![warn(missing_docs)]
mod args;
mod model;
mod publisher;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossbeam_channel::bounded;
use log::{error, info, warn};
use quote_wire::{MulticastTransport, Result, WireError};

use crate::args::Args;
use crate::model::demo::DemoSource;
use crate::model::replay::ReplaySource;
use crate::model::source::{QuoteSource, SourceKind, SourceQuote};
use crate::model::symbols::{normalize_symbols, parse_symbols};
use crate::model::synthetic::SyntheticSource;
use crate::publisher::Publisher;

/// Source chosen on the command line.
enum AnySource {
    Synthetic(SyntheticSource),
    Replay(ReplaySource),
    Demo(DemoSource),
}

impl QuoteSource for AnySource {
    fn fetch(&mut self, symbol: &str) -> Result<SourceQuote> {
        match self {
            AnySource::Synthetic(source) => source.fetch(symbol),
            AnySource::Replay(source) => source.fetch(symbol),
            AnySource::Demo(source) => source.fetch(symbol),
        }
    }
}

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();

    let symbols = load_symbols(&args)?;
    if symbols.is_empty() {
        return Err(WireError::Format("no symbols to publish".to_string()));
    }
    info!("Symbols: {:?}", symbols);

    let source = build_source(&args)?;
    let transport = MulticastTransport::open(&args.transport_config())?;

    let (stop_tx, stop_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down publisher...");
        let _ = stop_tx.try_send(());
    })
    .map_err(|e| WireError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;

    let mut publisher = Publisher::new(source, transport, symbols, args.format);
    let outcome = publisher.run(Duration::from_millis(args.interval_ms), args.ticks, &stop_rx);

    let stats = publisher.stats();
    let mut transport = publisher.into_sink();
    transport.close();

    match outcome {
        Ok(_) => {
            info!(
                "Published {} record(s) over {} tick(s); {} send failure(s), {} encode failure(s), {} source failure(s)",
                stats.sent, stats.ticks, stats.send_failures, stats.encode_failures, stats.source_failures
            );
            if stats.send_failures > 0 {
                warn!("{} datagram(s) were not sent", stats.send_failures);
            }
            Ok(())
        }
        Err(e) => {
            error!("Publisher stopped: {}", e);
            Err(e)
        }
    }
}

fn load_symbols(args: &Args) -> Result<Vec<String>> {
    match &args.symbols_file {
        Some(path) => {
            let file = File::open(normalize_path(path))?;
            parse_symbols(BufReader::new(file))
        }
        None => normalize_symbols(&args.symbols),
    }
}

fn build_source(args: &Args) -> Result<AnySource> {
    match args.source {
        SourceKind::Synthetic => Ok(AnySource::Synthetic(match args.seed {
            Some(seed) => SyntheticSource::with_seed(seed),
            None => SyntheticSource::new(),
        })),
        SourceKind::Demo => Ok(AnySource::Demo(DemoSource::new())),
        SourceKind::Replay => {
            let path = args
                .replay_file
                .as_deref()
                .ok_or_else(|| WireError::Format("--replay-file is required".to_string()))?;
            let file = File::open(normalize_path(path))?;
            let source = ReplaySource::from_reader(BufReader::new(file))?;
            if source.is_empty() {
                warn!("Replay file {} holds no quotes; all quotes will be zero", path);
            }
            Ok(AnySource::Replay(source))
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

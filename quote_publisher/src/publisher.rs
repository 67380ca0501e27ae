//! Publishing loop: fetch, encode, send.
//!
//! On every tick the publisher polls its source once per symbol, encodes the
//! quote and hands the record to the sink. A failure affects only that one
//! symbol on that one tick:
//! - source failures and encode failures (e.g. a symbol that does not fit the
//!   record) are logged and the symbol is skipped;
//! - transient send failures are logged and counted, the datagram is lost.
//!
//! Only non-transient sink errors stop the loop.
use std::time::Duration;

use crossbeam_channel::{Receiver, select, tick};
use log::{debug, error, info, warn};
use quote_wire::{DatagramSink, QuoteUpdate, RecordFormat, Result};

use crate::model::source::QuoteSource;

/// Counters describing what a publisher has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishStats {
    /// Completed ticks.
    pub ticks: u64,
    /// Datagrams accepted by the sink.
    pub sent: u64,
    /// Datagrams the sink failed to send.
    pub send_failures: u64,
    /// Quotes dropped because they could not be encoded.
    pub encode_failures: u64,
    /// Symbols the source failed to produce a quote for.
    pub source_failures: u64,
}

/// Drives a quote source into a datagram sink.
pub struct Publisher<S, K> {
    source: S,
    sink: K,
    symbols: Vec<String>,
    format: RecordFormat,
    stats: PublishStats,
}

impl<S: QuoteSource, K: DatagramSink> Publisher<S, K> {
    /// Creates a publisher for `symbols`, encoding in `format`.
    pub fn new(source: S, sink: K, symbols: Vec<String>, format: RecordFormat) -> Self {
        Publisher {
            source,
            sink,
            symbols,
            format,
            stats: PublishStats::default(),
        }
    }

    /// Publishes one quote per symbol.
    pub fn publish_tick(&mut self) -> Result<()> {
        for symbol in &self.symbols {
            let quote = match self.source.fetch(symbol) {
                Ok(quote) => quote,
                Err(e) => {
                    warn!("Source failed for {}: {}", symbol, e);
                    self.stats.source_failures += 1;
                    continue;
                }
            };

            let update = QuoteUpdate::new(symbol, quote.bid, quote.ask, quote.volume);
            let record = match self.format.encode(&update) {
                Ok(record) => record,
                Err(e) => {
                    error!("Dropping quote for {}: {}", symbol, e);
                    self.stats.encode_failures += 1;
                    continue;
                }
            };

            match self.sink.send_datagram(record.as_bytes()) {
                Ok(()) => {
                    self.stats.sent += 1;
                    debug!("Published {}", record);
                }
                Err(e) if e.is_transient() => {
                    self.stats.send_failures += 1;
                    error!("Failed to send quote for {}: {}", symbol, e);
                }
                Err(e) => return Err(e),
            }
        }
        self.stats.ticks += 1;
        Ok(())
    }

    /// Publishes a tick right away and then one every `interval` until
    /// `max_ticks` ticks are done or a stop signal arrives on `stop_rx`.
    /// `Some(0)` publishes nothing.
    ///
    /// A disconnected `stop_rx` counts as a stop signal.
    pub fn run(
        &mut self,
        interval: Duration,
        max_ticks: Option<u64>,
        stop_rx: &Receiver<()>,
    ) -> Result<PublishStats> {
        let ticker = tick(interval);
        info!(
            "Publishing {} symbol(s) as {} records every {:?}",
            self.symbols.len(),
            self.format,
            interval
        );

        let done = |stats: &PublishStats| max_ticks.is_some_and(|max| stats.ticks >= max);
        loop {
            if done(&self.stats) {
                info!("Reached {} tick(s)", self.stats.ticks);
                break;
            }
            self.publish_tick()?;
            if done(&self.stats) {
                info!("Reached {} tick(s)", self.stats.ticks);
                break;
            }
            select! {
                recv(stop_rx) -> _ => {
                    info!("Stop requested after {} tick(s)", self.stats.ticks);
                    break;
                },
                recv(ticker) -> _ => {},
            }
        }
        Ok(self.stats)
    }

    /// Counters so far.
    pub fn stats(&self) -> PublishStats {
        self.stats
    }

    /// Consumes the publisher, returning the sink so the caller can close it.
    pub fn into_sink(self) -> K {
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::demo::DemoSource;
    use crate::model::source::SourceQuote;
    use crossbeam_channel::bounded;
    use quote_wire::WireError;
    use std::io;

    #[derive(Default)]
    struct VecSink {
        datagrams: Vec<Vec<u8>>,
    }

    impl DatagramSink for VecSink {
        fn send_datagram(&mut self, datagram: &[u8]) -> Result<()> {
            self.datagrams.push(datagram.to_vec());
            Ok(())
        }
    }

    struct FlakySink {
        calls: u32,
    }

    impl DatagramSink for FlakySink {
        fn send_datagram(&mut self, _datagram: &[u8]) -> Result<()> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                Err(WireError::Transport(io::Error::other("no buffer space")))
            } else {
                Ok(())
            }
        }
    }

    struct BrokenSink;

    impl DatagramSink for BrokenSink {
        fn send_datagram(&mut self, _datagram: &[u8]) -> Result<()> {
            Err(WireError::Format("sink misconfigured".to_string()))
        }
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn one_record_per_symbol_per_tick() {
        let mut publisher = Publisher::new(
            DemoSource::new(),
            VecSink::default(),
            symbols(&["IBM", "MSFT"]),
            RecordFormat::Fields,
        );
        publisher.publish_tick().unwrap();
        publisher.publish_tick().unwrap();

        let stats = publisher.stats();
        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.sent, 4);

        let sink = publisher.into_sink();
        assert_eq!(sink.datagrams.len(), 4);
        assert!(sink.datagrams.iter().all(|d| d.len() == 70));
        assert_eq!(&sink.datagrams[0][..3], b"IBM");
        assert_eq!(&sink.datagrams[1][..4], b"MSFT");
        assert_eq!(&sink.datagrams[2][38..46], &101_010_000_000i64.to_le_bytes());
    }

    #[test]
    fn legacy_format_is_48_bytes() {
        let mut publisher = Publisher::new(
            DemoSource::new(),
            VecSink::default(),
            symbols(&["IBM"]),
            RecordFormat::Legacy,
        );
        publisher.publish_tick().unwrap();
        assert_eq!(publisher.into_sink().datagrams[0].len(), 48);
    }

    #[test]
    fn bad_symbol_is_skipped() {
        let mut publisher = Publisher::new(
            DemoSource::new(),
            VecSink::default(),
            symbols(&["IBM", "THIS_SYMBOL_DOES_NOT_FIT_THE_BLOCK", "MSFT"]),
            RecordFormat::Fields,
        );
        publisher.publish_tick().unwrap();
        let stats = publisher.stats();
        assert_eq!(stats.sent, 2);
        assert_eq!(stats.encode_failures, 1);
    }

    #[test]
    fn source_errors_skip_symbol() {
        let source = |symbol: &str| {
            if symbol == "MSFT" {
                Err(WireError::Format("provider timeout".to_string()))
            } else {
                Ok(SourceQuote::new(1.0, 2.0, 3))
            }
        };
        let mut publisher = Publisher::new(
            source,
            VecSink::default(),
            symbols(&["IBM", "MSFT"]),
            RecordFormat::Fields,
        );
        publisher.publish_tick().unwrap();
        assert_eq!(publisher.stats().source_failures, 1);
        assert_eq!(publisher.stats().sent, 1);
    }

    #[test]
    fn send_failures_do_not_stop_the_tick() {
        let mut publisher = Publisher::new(
            DemoSource::new(),
            FlakySink { calls: 0 },
            symbols(&["A", "B", "C", "D"]),
            RecordFormat::Fields,
        );
        publisher.publish_tick().unwrap();
        let stats = publisher.stats();
        assert_eq!(stats.sent, 2);
        assert_eq!(stats.send_failures, 2);
        assert_eq!(stats.ticks, 1);
    }

    #[test]
    fn non_transient_sink_error_is_returned() {
        let mut publisher = Publisher::new(
            DemoSource::new(),
            BrokenSink,
            symbols(&["IBM"]),
            RecordFormat::Fields,
        );
        assert!(matches!(publisher.publish_tick(), Err(WireError::Format(_))));
    }

    #[test]
    fn run_stops_after_max_ticks() {
        let (_stop_tx, stop_rx) = bounded::<()>(1);
        let mut publisher = Publisher::new(
            DemoSource::new(),
            VecSink::default(),
            symbols(&["IBM"]),
            RecordFormat::Fields,
        );
        let stats = publisher
            .run(Duration::from_millis(1), Some(3), &stop_rx)
            .unwrap();
        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.sent, 3);
    }

    #[test]
    fn run_with_zero_ticks_publishes_nothing() {
        let (_stop_tx, stop_rx) = bounded::<()>(1);
        let mut publisher = Publisher::new(
            DemoSource::new(),
            VecSink::default(),
            symbols(&["IBM"]),
            RecordFormat::Fields,
        );
        let stats = publisher
            .run(Duration::from_millis(1), Some(0), &stop_rx)
            .unwrap();
        assert_eq!(stats.ticks, 0);
        assert_eq!(stats.sent, 0);
        assert!(publisher.into_sink().datagrams.is_empty());
    }

    #[test]
    fn run_stops_on_signal() {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        stop_tx.send(()).unwrap();
        let mut publisher = Publisher::new(
            DemoSource::new(),
            VecSink::default(),
            symbols(&["IBM"]),
            RecordFormat::Fields,
        );
        let stats = publisher
            .run(Duration::from_secs(3600), None, &stop_rx)
            .unwrap();
        assert_eq!(stats.ticks, 1);
    }
}

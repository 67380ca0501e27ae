//! Command-line arguments for the quote publisher.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use clap::Parser;
use quote_wire::RecordFormat;
use quote_wire::TransportConfig;
use quote_wire::net::{DEFAULT_GROUP, DEFAULT_PORT, DEFAULT_TTL};

use crate::model::source::SourceKind;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Multicast group address to publish to.
    #[clap(long, default_value = DEFAULT_GROUP)]
    pub group: String,

    /// UDP port of the multicast group.
    #[clap(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Multicast TTL; 1 keeps datagrams on the local segment.
    #[clap(long, default_value_t = DEFAULT_TTL)]
    pub ttl: u8,

    /// Local IPv4 address of the interface to send from (OS default if omitted).
    #[clap(long)]
    pub interface: Option<String>,

    /// Do not deliver published datagrams to listeners on this host.
    #[clap(long)]
    pub no_loopback: bool,

    /// Comma separated symbols to publish.
    #[clap(long, value_delimiter = ',', default_value = "IBM,MSFT")]
    pub symbols: Vec<String>,

    /// Path to a text file with symbols; replaces `--symbols` when given.
    /// Symbols may be separated by commas, spaces, or new lines.
    #[clap(long)]
    pub symbols_file: Option<String>,

    /// Where quotes come from.
    #[clap(long, value_enum, default_value_t = SourceKind::Synthetic)]
    pub source: SourceKind,

    /// Seed for the synthetic source, for reproducible price paths.
    #[clap(long)]
    pub seed: Option<u64>,

    /// JSON-lines file used by the replay source.
    #[clap(long, required_if_eq("source", "replay"))]
    pub replay_file: Option<String>,

    /// Record layout put on the wire.
    #[clap(long, value_enum, default_value_t = RecordFormat::Fields)]
    pub format: RecordFormat,

    /// Milliseconds between ticks.
    #[clap(long, default_value_t = 1000)]
    pub interval_ms: u64,

    /// Stop after this many ticks (run until Ctrl+C if omitted).
    #[clap(long)]
    pub ticks: Option<u64>,
}

impl Args {
    /// Transport settings selected on the command line.
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            group: self.group.trim().to_string(),
            port: self.port,
            ttl: self.ttl,
            interface: self.interface.clone(),
            loopback: !self.no_loopback,
        }
    }
}

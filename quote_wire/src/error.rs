//! Error types shared between the wire library and the publisher.
//!
//! The `WireError` enum covers encoding failures, multicast socket setup and
//! send failures, plus the I/O and parsing errors the publisher runs into while
//! feeding quotes to the encoder. Both crates propagate this single error type.
use std::io;

use thiserror::Error;

/// Unified error type for record encoding, transport and the publishing driver.
#[derive(Error, Debug)]
pub enum WireError {
    /// Symbol does not fit into the fixed symbol block of a record.
    #[error("Invalid symbol length: {symbol:?} is {len} bytes, at most {max} allowed")]
    InvalidSymbolLength {
        /// Offending symbol.
        symbol: String,
        /// Encoded length of the symbol in bytes.
        len: usize,
        /// Size of the symbol block.
        max: usize,
    },

    /// Symbol contains characters outside of the ASCII range.
    #[error("Symbol is not ASCII: {0:?}")]
    NonAsciiSymbol(String),

    /// The multicast socket could not be created or configured.
    #[error("Socket setup error for {target}: {source}")]
    SocketSetup {
        /// Group address (and port) the transport was opened for.
        target: String,
        /// Underlying OS or validation error.
        #[source]
        source: io::Error,
    },

    /// A single datagram could not be handed to the OS.
    #[error("Transport error: {0}")]
    Transport(#[source] io::Error),

    /// I/O error originating from files read by the publisher.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),

    /// Error while parsing the symbols file.
    #[error("Parse symbols file error: {0}")]
    ParseSymbolsFile(String),
}

impl WireError {
    /// Wraps an I/O error raised while opening the transport for `target`.
    pub fn socket_setup(target: impl Into<String>, source: io::Error) -> Self {
        WireError::SocketSetup {
            target: target.into(),
            source,
        }
    }

    /// Returns `true` for errors that only cost one datagram.
    ///
    /// The publishing loop keeps running after these.
    pub fn is_transient(&self) -> bool {
        matches!(self, WireError::Transport(_))
    }
}

//! Domain models and utilities for the quote publisher.
//!
//! - `source` — `QuoteSource` trait, `SourceQuote` values and `SourceKind`.
//! - `synthetic` — random-walk quote generator.
//! - `replay` — quotes replayed from a JSON-lines file.
//! - `demo` — deterministic price ramp.
//! - `symbols` — symbol list parsing.

pub mod demo;
pub mod replay;
pub mod source;
pub mod symbols;
pub mod synthetic;

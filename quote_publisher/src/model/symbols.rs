//! Symbol lists for the publisher.
//!
//! Symbols may be separated by commas, spaces or new lines; everything after a
//! `#` on a line is ignored. Every symbol must fit the record's symbol block.
use std::io::BufRead;

use quote_wire::layout::encode_symbol;
use quote_wire::{Result, WireError};

/// Parses symbols from a buffered reader, dropping duplicates but keeping the
/// first-seen order.
pub fn parse_symbols<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut symbols = Vec::new();
    for line_result in reader.lines() {
        let line = line_result.map_err(WireError::Io)?;
        let content = line.split('#').next().unwrap_or("");
        for token in content.split(|c: char| c == ',' || c.is_whitespace()) {
            push_symbol(&mut symbols, token)?;
        }
    }
    Ok(symbols)
}

/// Normalizes and validates symbols given on the command line.
pub fn normalize_symbols<I, S>(raw: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut symbols = Vec::new();
    for token in raw {
        push_symbol(&mut symbols, token.as_ref())?;
    }
    Ok(symbols)
}

fn push_symbol(symbols: &mut Vec<String>, token: &str) -> Result<()> {
    let symbol = token.trim().trim_matches('"');
    if symbol.is_empty() {
        return Ok(());
    }
    encode_symbol(symbol).map_err(|e| WireError::ParseSymbolsFile(e.to_string()))?;
    if !symbols.iter().any(|s| s == symbol) {
        symbols.push(symbol.to_string());
    }
    Ok(())
}

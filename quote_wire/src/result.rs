//! Result type alias shared across the workspace.
//!
//! Defaults the error type to `WireError`, so functions can simply return
//! `Result<T>`.
use crate::error::WireError;

/// Workspace-wide `Result` alias with `WireError` as the default error.
pub type Result<T, E = WireError> = std::result::Result<T, E>;

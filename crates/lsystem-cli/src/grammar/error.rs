//! Errors produced while parsing an L-system grammar file.

use thiserror::Error;

use super::scanner::Position;

/// A grammar file failed to parse. Carries the offending position so the CLI can print a
/// `file:line:column: message` diagnostic the way most text-format parsers do.
#[derive(Debug, Error)]
#[error("{position}: {message}")]
pub struct ParseError {
    pub position: Position,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(position: Position, message: impl Into<String>) -> Self {
        Self { position, message: message.into() }
    }
}

//! Parse errors for the simulator.

use thiserror::Error;

/// Errors raised while reading a program.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A word letter without a readable number.
    #[error("Malformed word '{word}' on line {line}")]
    MalformedWord { line: usize, word: String },

    /// A character that starts no word.
    #[error("Unexpected character '{found}' on line {line}")]
    UnexpectedChar { line: usize, found: char },
}

pub type SimResult<T> = Result<T, ParseError>;

//! Tokenizer errors.

use std::fmt;

/// Errors from encoding or decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizerError {
    /// A character in the input never occurred in the corpus the vocabulary
    /// was built from.
    UnknownChar(char),

    /// A token id outside `0..vocab_size`.
    InvalidId(usize),
}

impl fmt::Display for TokenizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerError::UnknownChar(c) => write!(f, "character {c:?} not in vocabulary"),
            TokenizerError::InvalidId(id) => write!(f, "token id {id} out of range"),
        }
    }
}

impl std::error::Error for TokenizerError {}

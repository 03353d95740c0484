//! Corpus loading errors.

use std::fmt;

/// Errors from loading the training corpus.
#[derive(Debug)]
pub enum DataError {
    /// The source could not be read (missing file, bad UTF-8, permissions).
    Io(std::io::Error),

    /// The source was readable but contained no non-blank lines.
    EmptyCorpus,
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataError::Io(e) => write!(f, "corpus io: {e}"),
            DataError::EmptyCorpus => write!(f, "corpus contains no documents"),
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io(e) => Some(e),
            DataError::EmptyCorpus => None,
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(e: std::io::Error) -> Self {
        DataError::Io(e)
    }
}

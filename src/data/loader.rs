//! File-backed corpus loader: UTF-8 text, one document per line.

use std::fs;
use std::path::{Path, PathBuf};

use super::{CorpusLoader, DataError};

/// Reads the corpus from a file path. Lines are trimmed; blank lines are
/// dropped rather than treated as documents.
#[derive(Clone, Debug)]
pub struct PathLoader {
    path: PathBuf,
}

impl PathLoader {
    /// Creates a loader for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PathLoader { path: path.into() }
    }
}

impl CorpusLoader for PathLoader {
    fn load(&self) -> Result<Vec<String>, DataError> {
        let content = fs::read_to_string(&self.path)?;
        let docs: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        if docs.is_empty() {
            return Err(DataError::EmptyCorpus);
        }
        Ok(docs)
    }
}

/// Convenience: load a corpus from a path with a throwaway [`PathLoader`].
///
/// # Errors
///
/// See [`CorpusLoader::load`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Vec<String>, DataError> {
    PathLoader::new(path.as_ref()).load()
}

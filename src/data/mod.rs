//! Corpus loading: one training document per line.
//!
//! The learning core only ever consumes an ordered list of lines; this module
//! is the collaborator that produces it. [`CorpusLoader`] keeps the seam a
//! trait so a different source (in-memory, network) can be swapped in.

mod error;
mod loader;

pub use error::DataError;
pub use loader::{load_from_path, PathLoader};

/// Produces the training corpus.
pub trait CorpusLoader {
    /// Loads the corpus lines.
    ///
    /// # Errors
    ///
    /// [`DataError`] when the source cannot be read or yields no usable lines.
    fn load(&self) -> Result<Vec<String>, DataError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, "{contents}").unwrap();
        f.sync_all().unwrap();
        path
    }

    #[test]
    fn loads_trimmed_lines_in_order() {
        let path = write_temp("chargpt_data_lines.txt", "ana\n  bob  \ncarol\n");
        let result = load_from_path(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(result.unwrap(), ["ana", "bob", "carol"]);
    }

    #[test]
    fn blank_lines_are_dropped() {
        let path = write_temp("chargpt_data_blank.txt", "ana\n\n   \nbob\n");
        let result = load_from_path(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(result.unwrap(), ["ana", "bob"]);
    }

    #[test]
    fn empty_file_is_an_error() {
        let path = write_temp("chargpt_data_empty.txt", "\n  \n");
        let result = load_from_path(&path);
        let _ = std::fs::remove_file(&path);
        assert!(matches!(result, Err(DataError::EmptyCorpus)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_from_path(Path::new("/nonexistent/chargpt_never.txt"));
        assert!(matches!(result, Err(DataError::Io(_))));
    }

    #[test]
    fn path_loader_implements_the_trait() {
        let loader = PathLoader::new("/nonexistent/chargpt_never.txt");
        assert!(matches!(loader.load(), Err(DataError::Io(_))));
    }

    #[test]
    fn error_display_and_source() {
        use std::error::Error as _;
        let e = DataError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "nope"));
        assert!(e.source().is_some());
        assert!(DataError::EmptyCorpus.to_string().contains("no documents"));
    }
}

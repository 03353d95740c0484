//! Tokenization: encode text to token ids and decode ids back to text.
//!
//! The scheme is fixed character-level: the vocabulary is the sorted set of
//! unique corpus characters, plus one synthetic boundary token appended after
//! the largest real id, used to mark sequence start and end. The trait keeps
//! the seam explicit even though only [`CharTokenizer`] exists.

mod char_level;
mod error;
mod vocab;

pub use char_level::CharTokenizer;
pub use error::TokenizerError;
pub use vocab::Vocab;

/// Encode/decode between text and contiguous token ids.
pub trait Tokenizer {
    /// Encodes a string into token ids.
    ///
    /// # Errors
    ///
    /// [`TokenizerError::UnknownChar`] if a character is not in the vocabulary.
    fn encode(&self, s: &str) -> Result<Vec<usize>, TokenizerError>;

    /// Decodes token ids into a string. The boundary token decodes to nothing;
    /// it marks structure, not content.
    ///
    /// # Errors
    ///
    /// [`TokenizerError::InvalidId`] if an id is outside `0..vocab_size`.
    fn decode(&self, ids: &[usize]) -> Result<String, TokenizerError>;

    /// Total vocabulary size, boundary token included.
    fn vocab_size(&self) -> usize;

    /// Id of the boundary (sequence start/end) token.
    fn bos_id(&self) -> usize;
}

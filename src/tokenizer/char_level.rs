//! Character-level tokenizer over a [`Vocab`].

use super::{Tokenizer, TokenizerError, Vocab};

/// One token per character; the vocabulary is fixed at construction.
#[derive(Clone, Debug)]
pub struct CharTokenizer {
    vocab: Vocab,
}

impl CharTokenizer {
    /// Builds the tokenizer from the training documents.
    #[must_use]
    pub fn from_docs(docs: &[String]) -> Self {
        CharTokenizer {
            vocab: Vocab::from_docs(docs),
        }
    }

    /// The character table in id order.
    #[must_use]
    pub fn chars(&self) -> &[char] {
        self.vocab.chars()
    }
}

impl Tokenizer for CharTokenizer {
    fn encode(&self, s: &str) -> Result<Vec<usize>, TokenizerError> {
        s.chars()
            .map(|ch| {
                self.vocab
                    .id_for(ch)
                    .ok_or(TokenizerError::UnknownChar(ch))
            })
            .collect()
    }

    fn decode(&self, ids: &[usize]) -> Result<String, TokenizerError> {
        let mut s = String::new();
        for &id in ids {
            if id >= self.vocab.size() {
                return Err(TokenizerError::InvalidId(id));
            }
            if let Some(ch) = self.vocab.char_for(id) {
                s.push(ch);
            }
        }
        Ok(s)
    }

    fn vocab_size(&self) -> usize {
        self.vocab.size()
    }

    fn bos_id(&self) -> usize {
        self.vocab.boundary_id()
    }
}

//! Vocabulary: a bijection between characters and small contiguous ids, plus
//! the synthetic boundary id appended after the largest real id.

use std::collections::{BTreeSet, HashMap};

/// Character vocabulary built once from a corpus.
///
/// Real ids run `0..chars.len()` in sorted character order; the boundary token
/// takes id `chars.len()`, so the total vocabulary size is `chars.len() + 1`.
#[derive(Clone, Debug)]
pub struct Vocab {
    id_to_char: Vec<char>,
    char_to_id: HashMap<char, usize>,
}

impl Vocab {
    /// Builds the vocabulary from every character occurring in `docs`,
    /// deduplicated and sorted.
    #[must_use]
    pub fn from_docs(docs: &[String]) -> Self {
        let unique: BTreeSet<char> = docs.iter().flat_map(|d| d.chars()).collect();
        let id_to_char: Vec<char> = unique.into_iter().collect();
        let char_to_id = id_to_char
            .iter()
            .enumerate()
            .map(|(i, &c)| (c, i))
            .collect();
        Vocab {
            id_to_char,
            char_to_id,
        }
    }

    /// Number of real (character) entries, boundary excluded.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.id_to_char.len()
    }

    /// Id of the boundary token: one past the largest real id.
    #[must_use]
    pub fn boundary_id(&self) -> usize {
        self.id_to_char.len()
    }

    /// Total size including the boundary token.
    #[must_use]
    pub fn size(&self) -> usize {
        self.id_to_char.len() + 1
    }

    /// Character for a real id, `None` for the boundary id or out of range.
    #[must_use]
    pub fn char_for(&self, id: usize) -> Option<char> {
        self.id_to_char.get(id).copied()
    }

    /// Id for a character, `None` if it never occurred in the corpus.
    #[must_use]
    pub fn id_for(&self, ch: char) -> Option<usize> {
        self.char_to_id.get(&ch).copied()
    }

    /// The character table in id order (for telemetry snapshots).
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.id_to_char
    }
}

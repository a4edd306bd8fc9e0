//! The ordered word playlist shown while loading.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("word playlist must contain at least one non-blank word")]
pub struct EmptyPlaylistError;

/// Ordered, read-only sequence of display words. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct WordPlaylist(Vec<String>);

impl WordPlaylist {
    /// Build a playlist, dropping blank entries.
    pub fn new<I, S>(words: I) -> Result<Self, EmptyPlaylistError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(Into::into)
            .filter(|word| !word.trim().is_empty())
            .collect();
        if words.is_empty() {
            Err(EmptyPlaylistError)
        } else {
            Ok(Self(words))
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.0.len() - 1
    }

    /// Word at `index`, clamped to the last entry.
    #[must_use]
    pub fn word(&self, index: usize) -> &str {
        &self.0[index.min(self.last_index())]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for WordPlaylist {
    type Error = EmptyPlaylistError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WordPlaylist> for Vec<String> {
    fn from(value: WordPlaylist) -> Self {
        value.0
    }
}

/// Split a word into user-perceived characters.
///
/// Scripts like Devanagari combine several code points into one glyph, so
/// per-character animation must step over grapheme clusters, not `char`s.
#[must_use]
pub fn graphemes(word: &str) -> Vec<&str> {
    word.graphemes(true).collect()
}

// crates/memdrift-measures/src/document.rs
//
// Document preprocessing: raw Memento bytes to the units a measure compares.

use rust_stemmers::{Algorithm, Stemmer};
use unicode_segmentation::UnicodeSegmentation;

use crate::options::MeasureOptions;

/// A Memento prepared for comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    byte_len: usize,
    word_count: usize,
    tokenized: bool,
    units: Vec<String>,
}

impl Document {
    /// Prepare raw content under the given options.
    ///
    /// Content is decoded as UTF-8, replacing invalid sequences. With
    /// `tokenize` the units are Unicode words (stemmed and lowercased with
    /// `stemming`); otherwise they are the individual characters.
    pub fn prepare(content: &[u8], options: MeasureOptions) -> Self {
        let text = String::from_utf8_lossy(content);
        let word_count = text.unicode_words().count();

        let units: Vec<String> = if options.tokenize {
            let words = text.unicode_words();
            if options.stemming {
                let stemmer = Stemmer::create(Algorithm::English);
                words
                    .map(|w| stemmer.stem(&w.to_lowercase()).into_owned())
                    .collect()
            } else {
                words.map(str::to_string).collect()
            }
        } else {
            text.chars().map(String::from).collect()
        };

        Self {
            byte_len: content.len(),
            word_count,
            tokenized: options.tokenize,
            units,
        }
    }

    /// Length of the raw content in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Number of word tokens, whether or not the document was tokenized.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_tokenized(&self) -> bool {
        self.tokenized
    }

    /// Tokens or characters, in document order.
    pub fn units(&self) -> &[String] {
        &self.units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &[u8] = b"<html><body>Content1 is wonderful</body></html>";

    #[test]
    fn untokenized_uses_characters() {
        let doc = Document::prepare(b"abc", MeasureOptions::default());
        assert_eq!(doc.units(), ["a", "b", "c"]);
        assert_eq!(doc.byte_len(), 3);
        assert!(!doc.is_tokenized());
    }

    #[test]
    fn tokenized_splits_words() {
        let doc = Document::prepare(PAGE, MeasureOptions::new(true, false));
        assert_eq!(
            doc.units(),
            ["html", "body", "Content1", "is", "wonderful", "body", "html"]
        );
        assert_eq!(doc.word_count(), 7);
    }

    #[test]
    fn stemming_lowercases_and_stems() {
        let doc = Document::prepare(b"Jumping jumps JUMPED", MeasureOptions::new(true, true));
        assert_eq!(doc.units(), ["jump", "jump", "jump"]);
    }

    #[test]
    fn word_count_is_independent_of_tokenize() {
        let raw = Document::prepare(PAGE, MeasureOptions::default());
        let tokens = Document::prepare(PAGE, MeasureOptions::new(true, false));
        assert_eq!(raw.word_count(), tokens.word_count());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let doc = Document::prepare(&[b'a', 0xff, b'b'], MeasureOptions::default());
        assert_eq!(doc.byte_len(), 3);
        assert_eq!(doc.units().len(), 3);
    }

    #[test]
    fn empty_document() {
        let doc = Document::prepare(b"", MeasureOptions::new(true, true));
        assert_eq!(doc.byte_len(), 0);
        assert_eq!(doc.word_count(), 0);
        assert!(doc.units().is_empty());
    }
}

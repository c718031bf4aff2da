//! Chunker - service layer
//!
//! Splits one document into overlapping word windows.
//!
//! With `chunk_size = 5` and `overlap = 2` the stride is 3:
//!
//! ```text
//! A B C D E F G H I J
//! [A B C D E]
//!       [D E F G H]
//!             [G H I J]
//! ```

use crate::error::ConfigError;
use crate::models::{Document, TextChunk};

/// Word-window chunker
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    /// Words per chunk
    chunk_size: usize,
    /// Words shared by adjacent chunks
    overlap: usize,
}

impl Chunker {
    /// Create a chunker; `overlap` must be smaller than `chunk_size`
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, ConfigError> {
        if overlap >= chunk_size {
            return Err(ConfigError::InvalidValue {
                field: "chunk_overlap",
                reason: format!(
                    "overlap ({}) must be less than chunk_size ({})",
                    overlap, chunk_size
                ),
            });
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    /// Split a document into chunks numbered from 1
    ///
    /// Chunk ids are `"{doc_id}-{chunk_number}"`, so they stay stable as long
    /// as the document and the window settings do.
    pub fn chunk(&self, document: &Document) -> Vec<TextChunk> {
        self.split_words(&document.content)
            .into_iter()
            .enumerate()
            .map(|(idx, text)| {
                let chunk_number = idx + 1;
                TextChunk {
                    chunk_id: format!("{}-{}", document.doc_id, chunk_number),
                    doc_id: document.doc_id.clone(),
                    chunk_number,
                    text,
                    post_title: document.title.clone(),
                    source: document.source.clone(),
                }
            })
            .collect()
    }

    /// Chunk every document, keeping document order
    pub fn chunk_all(&self, documents: &[Document]) -> Vec<TextChunk> {
        documents.iter().flat_map(|doc| self.chunk(doc)).collect()
    }

    fn split_words(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let stride = self.chunk_size - self.overlap;
        let mut windows = Vec::new();
        let mut start = 0usize;

        loop {
            let end = (start + self.chunk_size).min(words.len());
            windows.push(words[start..end].join(" "));
            if end == words.len() {
                break;
            }
            start += stride;
        }

        windows
    }
}

/// Apply the `max_questions` cap
///
/// A non-positive cap keeps every chunk; a positive cap keeps the first
/// `min(cap, len)` chunks in source order.
pub fn limit_chunks(mut chunks: Vec<TextChunk>, max_questions: i64) -> Vec<TextChunk> {
    if max_questions > 0 {
        let cap = usize::try_from(max_questions).unwrap_or(usize::MAX);
        chunks.truncate(cap);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(doc_id: &str, content: &str) -> Document {
        Document {
            doc_id: doc_id.to_string(),
            title: format!("Title of {}", doc_id),
            source: format!("data/{}.md", doc_id),
            content: content.to_string(),
        }
    }

    fn numbered_chunks(n: usize) -> Vec<TextChunk> {
        (1..=n)
            .map(|i| TextChunk::new(format!("c{}", i), format!("text {}", i)))
            .collect()
    }

    #[test]
    fn test_windows_overlap() {
        let chunker = Chunker::new(5, 2).unwrap();
        let chunks = chunker.chunk(&doc("d", "a b c d e f g h i j"));

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["a b c d e", "d e f g h", "g h i j"]);
    }

    #[test]
    fn test_chunk_ids_and_metadata() {
        let chunker = Chunker::new(3, 1).unwrap();
        let chunks = chunker.chunk(&doc("guide", "one two three four five"));

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chunk_id, "guide-1");
        assert_eq!(chunks[1].chunk_id, "guide-2");
        assert_eq!(chunks[1].chunk_number, 2);
        assert_eq!(chunks[0].post_title, "Title of guide");
        assert_eq!(chunks[0].source, "data/guide.md");
    }

    #[test]
    fn test_short_and_empty_documents() {
        let chunker = Chunker::new(100, 10).unwrap();
        assert_eq!(chunker.chunk(&doc("s", "just a few words")).len(), 1);
        assert!(chunker.chunk(&doc("e", "   \n  ")).is_empty());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        assert!(Chunker::new(5, 5).is_err());
        assert!(Chunker::new(5, 4).is_ok());
    }

    #[test]
    fn test_chunk_all_keeps_document_order() {
        let chunker = Chunker::new(2, 0).unwrap();
        let chunks = chunker.chunk_all(&[doc("a", "1 2 3"), doc("b", "4")]);
        let ids: Vec<&str> = chunks.iter().map(|c| c.chunk_id.as_str()).collect();
        assert_eq!(ids, vec!["a-1", "a-2", "b-1"]);
    }

    #[test]
    fn test_limit_non_positive_keeps_everything() {
        assert_eq!(limit_chunks(numbered_chunks(4), 0).len(), 4);
        assert_eq!(limit_chunks(numbered_chunks(4), -1).len(), 4);
        assert_eq!(limit_chunks(numbered_chunks(4), -100).len(), 4);
    }

    #[test]
    fn test_limit_keeps_first_m_in_order() {
        let limited = limit_chunks(numbered_chunks(5), 2);
        let ids: Vec<&str> = limited.iter().map(|c| c.chunk_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2"]);

        assert_eq!(limit_chunks(numbered_chunks(3), 10).len(), 3);
    }
}

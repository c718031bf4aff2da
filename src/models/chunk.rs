use serde::{Deserialize, Serialize};

/// A source document read from the input folder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier (the file name, unique within the folder)
    pub doc_id: String,
    /// First `# ` heading, or the file stem when there is none
    pub title: String,
    /// Path the document was read from
    pub source: String,
    pub content: String,
}

/// A bounded span of document text, the unit of generation work
///
/// Never mutated after the chunker produces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextChunk {
    pub chunk_id: String,
    pub doc_id: String,
    /// Position within the document, starting at 1
    pub chunk_number: usize,
    pub text: String,
    #[serde(default)]
    pub post_title: String,
    #[serde(default)]
    pub source: String,
}

impl TextChunk {
    /// Build a chunk without document metadata
    pub fn new(chunk_id: impl Into<String>, text: impl Into<String>) -> Self {
        let chunk_id = chunk_id.into();
        Self {
            doc_id: chunk_id.clone(),
            chunk_id,
            chunk_number: 1,
            text: text.into(),
            post_title: String::new(),
            source: String::new(),
        }
    }
}

//! Chunk context
//!
//! Which chunk of the batch is being processed, for log prefixes.

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct ChunkCtx {
    pub chunk_id: String,
    /// Submission position within the batch, starting at 1 (logging only)
    pub position: usize,
    /// Batch size
    pub total: usize,
}

impl ChunkCtx {
    pub fn new(chunk_id: impl Into<String>, position: usize, total: usize) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            position,
            total,
        }
    }
}

impl Display for ChunkCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[chunk {}/{} {}]",
            self.position, self.total, self.chunk_id
        )
    }
}

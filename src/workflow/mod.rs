pub mod chunk_ctx;
pub mod generation_flow;

pub use chunk_ctx::ChunkCtx;
pub use generation_flow::{GenerationFlow, RetryPolicy};

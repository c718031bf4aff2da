//! # RAG App
//!
//! Builds synthetic question/answer evaluation data for a RAG application
//! from a folder of documents.
//!
//! ## Architecture
//!
//! The system is split into four layers:
//!
//! ### ① Clients
//! - `clients/` - talk to the outside world, expose one capability each
//! - `GenerationClient` - one structured chat completion
//!
//! ### ② Services
//! - `services/` - "what I can do", one item at a time
//! - `Chunker` - split a document into overlapping chunks
//! - `QuestionGenerator` - one attempt at a pair for one chunk
//! - `EvaluationWriter` / `JsonlAppender` - write `.jsonl` output
//!
//! ### ③ Workflow
//! - `workflow/` - the full lifecycle of a single chunk
//! - `ChunkCtx` - log context (chunk id + position)
//! - `GenerationFlow` - generate under a fixed-delay retry budget
//!
//! ### ④ Orchestration
//! - `orchestrator/batch_processor` - concurrent fan-out/fan-in over all chunks
//! - `orchestrator/synthetic_questions` - one command run, end to end

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// re-exports
pub use clients::{GenerationClient, OpenAiClient, ResponseShape};
pub use config::{Config, FailurePolicy};
pub use error::{AppError, AppResult};
pub use models::{EvaluationDataItem, QuestionAnswerPair, TextChunk};
pub use orchestrator::{App, GenerationReport, SyntheticQuestionsRequest};
pub use workflow::{ChunkCtx, GenerationFlow, RetryPolicy};

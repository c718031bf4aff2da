//! Orchestration layer
//!
//! ## Responsibilities
//!
//! This layer runs batches and schedules the flow. It is the only layer that
//! knows about more than one chunk at a time.
//!
//! ## Modules
//!
//! ### `synthetic_questions` - command runner
//! - Owns the generation client
//! - Checks output preconditions
//! - Loads and limits chunks
//! - Persists the results and prints statistics
//!
//! ### `batch_processor` - fan-out/fan-in coordinator
//! - One task per chunk, gated by a `Semaphore`
//! - Collects results in completion order
//! - Applies the failure policy
//!
//! ## Layering
//!
//! ```text
//! synthetic_questions (one run)
//!     ↓
//! batch_processor (Vec<TextChunk>)
//!     ↓
//! workflow::GenerationFlow (one chunk, with retries)
//!     ↓
//! services (QuestionGenerator / Chunker / EvaluationWriter)
//!     ↓
//! clients (GenerationClient)
//! ```

pub mod batch_processor;
pub mod synthetic_questions;

pub use batch_processor::{BatchProcessor, ChunkFailure, GenerationReport};
pub use synthetic_questions::{App, SyntheticQuestionsRequest};

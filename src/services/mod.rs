pub mod chunker;
pub mod evaluation_writer;
pub mod question_generator;

pub use chunker::{limit_chunks, Chunker};
pub use evaluation_writer::{validate_output_path, EvaluationWriter, JsonlAppender};
pub use question_generator::QuestionGenerator;

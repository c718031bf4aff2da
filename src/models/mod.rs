pub mod chunk;
pub mod evaluation;
pub mod loaders;

pub use chunk::{Document, TextChunk};
pub use evaluation::{EvaluationDataItem, QuestionAnswerPair};
pub use loaders::{load_document, read_files};

//! Error types
//!
//! One top-level [`AppError`] wraps a family of domain errors. Each domain
//! error is returned directly by the layer that owns it, so callers can match
//! on exactly what can go wrong there.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Application error
#[derive(Debug, Error)]
pub enum AppError {
    /// Output destination rejected before any work started
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionError),
    /// Question generation for a single chunk failed
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    /// The batch run was aborted
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
    /// File read/write failure
    #[error("file error: {0}")]
    File(#[from] FileError),
    /// Invalid configuration
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Output path preconditions, checked before the first generation call
#[derive(Debug, Error)]
pub enum PreconditionError {
    /// Parent directory of the output file is missing
    #[error("the directory {} does not exist", .path.display())]
    MissingParentDirectory { path: PathBuf },
    /// Output path names an existing directory
    #[error("the output path {} is a directory", .path.display())]
    OutputIsDirectory { path: PathBuf },
    /// Output file is not a `.jsonl` file
    #[error("the output file must have a .jsonl extension (got {})", .path.display())]
    WrongExtension { path: PathBuf },
}

/// Generation errors
///
/// Every variant except [`GenerationError::Exhausted`] describes a single
/// failed attempt and is retried.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The API call itself failed
    #[error("LLM API call failed (model: {model}): {source}")]
    Request {
        model: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The API answered without any message content
    #[error("LLM returned no content (model: {model})")]
    EmptyContent { model: String },
    /// The content could not be decoded into a question/answer pair
    #[error("LLM response does not match the question/answer shape: {reason}")]
    MalformedResponse { reason: String },
    /// Retry budget used up
    #[error("chunk {chunk_id} failed after {attempts} attempts: {last}")]
    Exhausted {
        chunk_id: String,
        attempts: u32,
        #[source]
        last: Box<GenerationError>,
    },
}

impl GenerationError {
    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, GenerationError::Exhausted { .. })
    }

    /// Create an API call failure
    pub fn request_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        GenerationError::Request {
            model: model.into(),
            source: Box::new(source),
        }
    }

    /// Create a decode failure
    pub fn malformed(reason: impl Into<String>) -> Self {
        GenerationError::MalformedResponse {
            reason: reason.into(),
        }
    }
}

/// Batch-level errors raised by the coordinator
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A chunk exhausted its retries under the abort policy
    #[error("generation aborted after {completed}/{total} chunks: {source}")]
    Aborted {
        completed: usize,
        total: usize,
        source: GenerationError,
    },
    /// A generation task panicked
    #[error("generation task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
    /// Incremental sink failed while the batch was running
    #[error("failed to persist item: {0}")]
    Sink(#[from] FileError),
}

/// File errors
#[derive(Debug, Error)]
pub enum FileError {
    /// Directory does not exist
    #[error("directory does not exist: {}", .path.display())]
    DirectoryNotFound { path: PathBuf },
    /// Reading failed
    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Writing failed
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Record could not be serialized
    #[error("failed to serialize record for {}: {source}", .path.display())]
    SerializeFailed {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// TOML parse failure
    #[error("failed to parse TOML {}: {source}", .path.display())]
    TomlParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl FileError {
    /// Create a read error
    pub fn read_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        FileError::ReadFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a write error
    pub fn write_failed(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        FileError::WriteFailed {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable holds a value of the wrong type
    #[error("environment variable {var_name} could not be parsed: '{value}' is not a valid {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: &'static str,
    },
    /// Value out of range
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;

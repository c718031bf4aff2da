//! Evaluation writer - service layer
//!
//! Persists evaluation items as JSON Lines.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FileError, PreconditionError};
use crate::models::EvaluationDataItem;

/// Check an output destination before any work is done
///
/// The parent directory must exist, the path itself must not be a directory
/// and the file name must end in `.jsonl`. A bare file name has the current
/// directory as its parent.
pub fn validate_output_path(path: &Path) -> Result<(), PreconditionError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    if !parent.is_dir() {
        return Err(PreconditionError::MissingParentDirectory {
            path: parent.to_path_buf(),
        });
    }

    if path.is_dir() {
        return Err(PreconditionError::OutputIsDirectory {
            path: path.to_path_buf(),
        });
    }

    if path.extension().and_then(|e| e.to_str()) != Some("jsonl") {
        return Err(PreconditionError::WrongExtension {
            path: path.to_path_buf(),
        });
    }

    Ok(())
}

/// Writes a whole batch at once
pub struct EvaluationWriter {
    output_path: PathBuf,
}

impl EvaluationWriter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// Replace the destination with one JSON line per item, in the given order
    pub fn write_all(&self, items: &[EvaluationDataItem]) -> Result<(), FileError> {
        let mut appender = JsonlAppender::create(&self.output_path)?;
        for item in items {
            appender.append(item)?;
        }
        appender.finish()?;

        debug!(
            "Wrote {} items to {}",
            items.len(),
            self.output_path.display()
        );
        Ok(())
    }
}

/// Writes items one at a time as they complete
///
/// The file is truncated once on creation; every [`append`](Self::append)
/// is flushed so a line is on disk as soon as the call returns.
pub struct JsonlAppender {
    path: PathBuf,
    writer: BufWriter<File>,
    written: usize,
}

impl JsonlAppender {
    pub fn create(path: impl AsRef<Path>) -> Result<Self, FileError> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|e| FileError::write_failed(&path, e))?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn append(&mut self, item: &EvaluationDataItem) -> Result<(), FileError> {
        serde_json::to_writer(&mut self.writer, item).map_err(|source| {
            FileError::SerializeFailed {
                path: self.path.clone(),
                source,
            }
        })?;
        self.writer
            .write_all(b"\n")
            .and_then(|_| self.writer.flush())
            .map_err(|e| FileError::write_failed(&self.path, e))?;

        self.written += 1;
        Ok(())
    }

    /// Number of lines written so far
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn finish(mut self) -> Result<usize, FileError> {
        self.writer
            .flush()
            .map_err(|e| FileError::write_failed(&self.path, e))?;
        Ok(self.written)
    }
}

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use tokio::fs;

use crate::error::FileError;
use crate::models::chunk::Document;

/// Load a single file into a [`Document`]
pub async fn load_document(path: &Path) -> Result<Document, FileError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| FileError::read_failed(path, e))?;

    // file names are unique within one folder, stems are not
    let doc_id = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let title = extract_title(&content).unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| doc_id.clone())
    });

    Ok(Document {
        doc_id,
        title,
        source: path.to_string_lossy().to_string(),
        content,
    })
}

/// Load every file in `folder` whose name ends with `file_suffix`
///
/// Non-recursive. Files are returned sorted by path so chunk order is stable
/// between runs. A file that fails to load is logged and skipped.
///
/// # Arguments
/// - `folder`: directory to scan
/// - `file_suffix`: matched against the end of each file name
///
/// # Returns
/// The loaded documents, or `DirectoryNotFound` when `folder` is missing
pub async fn read_files(folder: &Path, file_suffix: &str) -> Result<Vec<Document>, FileError> {
    if !fs::try_exists(folder).await.unwrap_or(false) {
        return Err(FileError::DirectoryNotFound {
            path: folder.to_path_buf(),
        });
    }

    let mut paths: Vec<PathBuf> = Vec::new();
    let mut entries = fs::read_dir(folder)
        .await
        .map_err(|e| FileError::read_failed(folder, e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FileError::read_failed(folder, e))?
    {
        let path = entry.path();
        let matches_suffix = path
            .file_name()
            .map(|name| name.to_string_lossy().ends_with(file_suffix))
            .unwrap_or(false);

        if matches_suffix && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        tracing::debug!(
            "Loading: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );
        match load_document(&path).await {
            Ok(doc) => documents.push(doc),
            Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
        }
    }

    tracing::info!(
        "Loaded {} documents from {}",
        documents.len(),
        folder.display()
    );
    Ok(documents)
}

fn extract_title(content: &str) -> Option<String> {
    static HEADING: OnceLock<Option<Regex>> = OnceLock::new();
    let heading = HEADING.get_or_init(|| Regex::new(r"(?m)^#\s+(.+?)\s*$").ok());

    heading
        .as_ref()?
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

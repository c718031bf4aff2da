pub mod markdown_loader;

pub use markdown_loader::{load_document, read_files};

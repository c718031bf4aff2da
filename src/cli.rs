//! Command line interface
//!
//! ```text
//! rag-app [--config <file>] [-v] generate synthetic-questions --folder-path <dir> [options]
//! ```
//!
//! Flags override the config file and environment for the current run only.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{Config, FailurePolicy};
use crate::orchestrator::SyntheticQuestionsRequest;

#[derive(Parser, Debug)]
#[command(
    name = "rag-app",
    version,
    about = "A CLI for building evaluation data for a local RAG application"
)]
pub struct Cli {
    /// TOML config file; environment variables still override it
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Commands to help generate synthetic data from your documents
    #[command(subcommand)]
    Generate(GenerateCommand),
}

#[derive(Subcommand, Debug)]
pub enum GenerateCommand {
    /// Generate a question/answer pair for each chunk in a folder
    SyntheticQuestions(SyntheticQuestionsArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SyntheticQuestionsArgs {
    /// Folder containing the source documents
    #[arg(long)]
    pub folder_path: PathBuf,

    /// Maximum number of chunks to generate for; zero or negative means all
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub max_questions: i64,

    /// Destination file; must end in .jsonl and its directory must exist
    #[arg(long, default_value = "output.jsonl")]
    pub output_path: PathBuf,

    /// Only read files ending with this suffix
    #[arg(long)]
    pub file_suffix: Option<String>,

    /// Maximum number of generation requests in flight
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// What to do when a chunk exhausts its retries
    #[arg(long, value_enum)]
    pub on_failure: Option<FailurePolicy>,

    /// Append each item to the output file as soon as it is generated
    #[arg(long, action = ArgAction::SetTrue)]
    pub incremental: bool,
}

impl SyntheticQuestionsArgs {
    /// Fold the flags that were given into `config`
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(suffix) = &self.file_suffix {
            config.file_suffix = suffix.clone();
        }
        if let Some(max_concurrent) = self.max_concurrent {
            config.max_concurrent_requests = max_concurrent;
        }
        if let Some(policy) = self.on_failure {
            config.failure_policy = policy;
        }
        if self.incremental {
            config.incremental_output = true;
        }
    }

    pub fn request(&self) -> SyntheticQuestionsRequest {
        SyntheticQuestionsRequest {
            folder_path: self.folder_path.clone(),
            max_questions: self.max_questions,
            output_path: self.output_path.clone(),
        }
    }
}

//! Synthetic questions command - orchestration layer
//!
//! ## Responsibilities
//!
//! This module is the entry point of `generate synthetic-questions`. It owns
//! the generation client and drives one run end to end.
//!
//! ## Steps
//!
//! 1. **Preconditions**: reject a bad output path before anything else
//! 2. **Chunk source**: read documents, chunk them, apply `max_questions`
//! 3. **Generation**: hand the chunks to [`BatchProcessor`]
//! 4. **Persistence**: write the whole batch at the end, or append each item
//!    as it completes when incremental output is on
//! 5. **Statistics**: print the final summary

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use tracing::{info, warn};

use crate::clients::{GenerationClient, OpenAiClient};
use crate::config::Config;
use crate::error::AppResult;
use crate::models::{read_files, TextChunk};
use crate::orchestrator::batch_processor::{BatchProcessor, GenerationReport};
use crate::services::{
    limit_chunks, validate_output_path, Chunker, EvaluationWriter, JsonlAppender,
    QuestionGenerator,
};
use crate::utils::logging::{log_chunks_loaded, log_startup, print_final_stats};
use crate::workflow::GenerationFlow;

/// Arguments of one run
#[derive(Debug, Clone)]
pub struct SyntheticQuestionsRequest {
    /// Folder scanned for source documents
    pub folder_path: PathBuf,
    /// Cap on chunks sent to the model; zero or negative means no cap
    pub max_questions: i64,
    /// `.jsonl` destination, truncated on write
    pub output_path: PathBuf,
}

/// Application
pub struct App {
    config: Config,
    client: Arc<dyn GenerationClient>,
}

impl App {
    /// Initialize with the OpenAI-compatible client built from `config`
    pub fn initialize(config: Config) -> AppResult<Self> {
        config.validate()?;
        let client = Arc::new(OpenAiClient::new(&config));
        Ok(Self::with_client(config, client))
    }

    /// Initialize with any generation client
    pub fn with_client(config: Config, client: Arc<dyn GenerationClient>) -> Self {
        Self { config, client }
    }

    /// Run the command
    ///
    /// Under the abort policy a failed chunk fails the whole run. Without
    /// incremental output nothing is written in that case.
    ///
    /// # Arguments
    /// - `request`: folder, chunk cap and output path of this run
    ///
    /// # Returns
    /// The run report. A precondition error means no document was read and
    /// no request was sent.
    pub async fn run(&self, request: SyntheticQuestionsRequest) -> AppResult<GenerationReport> {
        // before reading a single document
        validate_output_path(&request.output_path)?;

        log_startup(&self.config);
        let started = Local::now();

        let chunks = self.load_chunks(&request).await?;
        if chunks.is_empty() {
            warn!(
                "⚠️ No {} files with content found in {}",
                self.config.file_suffix,
                request.folder_path.display()
            );
        }

        let processor = self.build_processor();

        let report = if self.config.incremental_output {
            let mut appender = JsonlAppender::create(&request.output_path)?;
            let report = processor
                .generate_with(chunks, |item| appender.append(item))
                .await?;
            appender.finish()?;
            report
        } else {
            let report = processor.generate_all(chunks).await?;
            EvaluationWriter::new(&request.output_path).write_all(&report.items)?;
            report
        };

        for failure in &report.failures {
            warn!("⚠️ Skipped chunk {}: {}", failure.chunk_id, failure.error);
        }

        print_final_stats(
            report.success(),
            report.failed(),
            report.total,
            &request.output_path,
        );
        let elapsed = Local::now() - started;
        info!(
            "⏱️ Elapsed: {:.1}s",
            elapsed.num_milliseconds() as f64 / 1000.0
        );

        Ok(report)
    }

    async fn load_chunks(&self, request: &SyntheticQuestionsRequest) -> AppResult<Vec<TextChunk>> {
        info!("\n📁 Reading {}...", request.folder_path.display());
        let documents = read_files(&request.folder_path, &self.config.file_suffix).await?;

        let chunker = Chunker::new(self.config.chunk_size, self.config.chunk_overlap)?;
        let chunks = chunker.chunk_all(&documents);
        let produced = chunks.len();

        let selected = limit_chunks(chunks, request.max_questions);
        log_chunks_loaded(documents.len(), produced, selected.len());

        Ok(selected)
    }

    fn build_processor(&self) -> BatchProcessor {
        let generator = QuestionGenerator::new(Arc::clone(&self.client));
        let flow = GenerationFlow::new(generator, self.config.retry_policy());
        BatchProcessor::new(
            flow,
            self.config.max_concurrent_requests,
            self.config.failure_policy,
        )
    }
}

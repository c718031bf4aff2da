//! Batch processor - orchestration layer
//!
//! ## Responsibilities
//!
//! 1. **Fan-out**: one task per chunk, all submitted up front
//! 2. **Concurrency gate**: a `Semaphore` caps in-flight generation requests
//! 3. **Fan-in**: results are drained from a `JoinSet` in completion order,
//!    never in submission order
//! 4. **Aggregation**: each success becomes one `EvaluationDataItem`, pushed
//!    into an accumulator owned by this task alone
//! 5. **Failure policy**: abort the batch on the first exhausted chunk, or
//!    record it and keep going
//!
//! Tasks share the flow (and through it the client) read-only. Each task
//! hands its chunk back together with its result, so nothing mutable crosses
//! a task boundary.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::FailurePolicy;
use crate::error::{FileError, GenerationError, PipelineError};
use crate::models::{EvaluationDataItem, TextChunk};
use crate::workflow::{ChunkCtx, GenerationFlow};

/// A chunk that exhausted its retries under [`FailurePolicy::Skip`]
#[derive(Debug)]
pub struct ChunkFailure {
    pub chunk_id: String,
    pub error: GenerationError,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Items in completion order
    pub items: Vec<EvaluationDataItem>,
    pub failures: Vec<ChunkFailure>,
    /// Chunks submitted
    pub total: usize,
}

impl GenerationReport {
    pub fn success(&self) -> usize {
        self.items.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    fn finished(&self) -> usize {
        self.success() + self.failed()
    }
}

/// Fan-out/fan-in coordinator
pub struct BatchProcessor {
    flow: Arc<GenerationFlow>,
    max_concurrent: usize,
    failure_policy: FailurePolicy,
}

impl BatchProcessor {
    /// `max_concurrent` is clamped to at least 1
    pub fn new(flow: GenerationFlow, max_concurrent: usize, failure_policy: FailurePolicy) -> Self {
        Self {
            flow: Arc::new(flow),
            max_concurrent: max_concurrent.max(1),
            failure_policy,
        }
    }

    /// Generate one item per chunk and collect them in memory
    pub async fn generate_all(
        &self,
        chunks: Vec<TextChunk>,
    ) -> Result<GenerationReport, PipelineError> {
        self.generate_with(chunks, |_| Ok(())).await
    }

    /// Like [`generate_all`](Self::generate_all), handing each item to
    /// `on_item` the moment it completes
    ///
    /// Use this to persist incrementally: under the abort policy, items
    /// passed to `on_item` before the failure stay persisted even though the
    /// call returns an error. An `on_item` error stops the batch.
    ///
    /// # Arguments
    /// - `chunks`: the batch, one task per chunk
    /// - `on_item`: sink called once per success, in completion order
    ///
    /// # Returns
    /// The report, or the first error under the abort policy
    pub async fn generate_with<F>(
        &self,
        chunks: Vec<TextChunk>,
        mut on_item: F,
    ) -> Result<GenerationReport, PipelineError>
    where
        F: FnMut(&EvaluationDataItem) -> Result<(), FileError>,
    {
        let total = chunks.len();
        let mut report = GenerationReport {
            items: Vec::with_capacity(total),
            total,
            ..Default::default()
        };
        if total == 0 {
            return Ok(report);
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let mut tasks = JoinSet::new();

        for (idx, chunk) in chunks.into_iter().enumerate() {
            let ctx = ChunkCtx::new(chunk.chunk_id.clone(), idx + 1, total);
            let flow = Arc::clone(&self.flow);
            let semaphore = Arc::clone(&semaphore);

            tasks.spawn(async move {
                // the semaphore is never closed, so this only waits
                let _permit = semaphore.acquire_owned().await;
                let result = flow.run(&chunk, &ctx).await;
                (result, chunk)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            let (result, chunk) = joined?;

            match result {
                Ok(pair) => {
                    let item = EvaluationDataItem::new(pair, &chunk);
                    on_item(&item)?;
                    report.items.push(item);
                }
                Err(error) => match self.failure_policy {
                    FailurePolicy::Abort => {
                        warn!(
                            "⛔ chunk {} failed, aborting the batch ({} pending tasks dropped)",
                            chunk.chunk_id,
                            tasks.len()
                        );
                        tasks.abort_all();
                        return Err(PipelineError::Aborted {
                            completed: report.success(),
                            total,
                            source: error,
                        });
                    }
                    FailurePolicy::Skip => {
                        warn!("⚠️ chunk {} skipped: {}", chunk.chunk_id, error);
                        report.failures.push(ChunkFailure {
                            chunk_id: chunk.chunk_id,
                            error,
                        });
                    }
                },
            }

            info!("📈 progress {}/{}", report.finished(), total);
        }

        Ok(report)
    }
}

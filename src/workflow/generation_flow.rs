//! Generation flow - workflow layer
//!
//! Defines the full lifecycle of one chunk:
//!
//! ```text
//! PENDING → (ATTEMPTING → SUCCESS | RETRY) × max_attempts → SUCCESS | FAILED
//! ```
//!
//! Attempts are strictly sequential and separated by a fixed delay. Any
//! attempt failure (transport, empty content, undecodable output) is retried
//! the same way; only the exhausted budget is terminal.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::error::GenerationError;
use crate::models::{QuestionAnswerPair, TextChunk};
use crate::services::QuestionGenerator;
use crate::utils::logging::truncate_text;
use crate::workflow::chunk_ctx::ChunkCtx;

/// Fixed-delay retry budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    max_attempts: u32,
    /// Delay between two attempts; constant, no backoff
    delay: Duration,
}

impl RetryPolicy {
    /// `max_attempts` is clamped to at least 1
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(30))
    }
}

/// Runs one chunk through the generator under a retry budget
///
/// Holds no per-chunk state, so one flow is shared by every task.
pub struct GenerationFlow {
    generator: QuestionGenerator,
    policy: RetryPolicy,
}

impl GenerationFlow {
    pub fn new(generator: QuestionGenerator, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    /// Generate a pair for `chunk`
    ///
    /// Returns [`GenerationError::Exhausted`] carrying the last attempt's
    /// error once the budget is spent. The failure is not handled here.
    pub async fn run(
        &self,
        chunk: &TextChunk,
        ctx: &ChunkCtx,
    ) -> Result<QuestionAnswerPair, GenerationError> {
        let max_attempts = self.policy.max_attempts;
        let mut attempt = 0u32;

        loop {
            attempt += 1;

            match self.generator.generate_once(chunk).await {
                Ok(pair) => {
                    if attempt > 1 {
                        info!(
                            "{} ✓ succeeded on attempt {}/{}",
                            ctx, attempt, max_attempts
                        );
                    }
                    info!("{} ✓ question: {}", ctx, truncate_text(&pair.question, 80));
                    return Ok(pair);
                }
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(
                        "{} ⚠️ attempt {}/{} failed: {}, retrying in {}s...",
                        ctx,
                        attempt,
                        max_attempts,
                        e,
                        self.policy.delay.as_secs()
                    );
                    sleep(self.policy.delay).await;
                }
                Err(e) => {
                    error!(
                        "{} ❌ giving up after {} attempts: {}",
                        ctx, attempt, e
                    );
                    return Err(GenerationError::Exhausted {
                        chunk_id: chunk.chunk_id.clone(),
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{GenerationClient, ResponseShape};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    /// Fails the first `failures` calls, then answers
    struct FlakyClient {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakyClient {
        fn new(failures: u32) -> Arc<Self> {
            Arc::new(Self {
                failures,
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationClient for FlakyClient {
        async fn complete(
            &self,
            _system_prompt: &str,
            _user_prompt: &str,
            _shape: &ResponseShape,
        ) -> Result<String, GenerationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                // alternate the two kinds of transient failure
                if call % 2 == 0 {
                    return Ok("not json at all".to_string());
                }
                return Err(GenerationError::request_failed(
                    "flaky",
                    std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer"),
                ));
            }
            Ok(r#"{"chain_of_thought":"c","question":"q?","answer":"a."}"#.to_string())
        }

        fn model_name(&self) -> &str {
            "flaky"
        }
    }

    fn flow_for(client: Arc<FlakyClient>, policy: RetryPolicy) -> GenerationFlow {
        GenerationFlow::new(QuestionGenerator::new(client), policy)
    }

    fn ctx() -> ChunkCtx {
        ChunkCtx::new("doc-1", 1, 1)
    }

    #[test]
    fn test_default_policy_is_five_attempts_thirty_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.delay(), Duration::from_secs(30));
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_does_not_wait() {
        let client = FlakyClient::new(0);
        let flow = flow_for(client.clone(), RetryPolicy::default());
        let chunk = TextChunk::new("doc-1", "text");

        let start = Instant::now();
        let pair = flow.run(&chunk, &ctx()).await.unwrap();

        assert_eq!(pair.question, "q?");
        assert_eq!(client.calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_k_failures_with_fixed_delay() {
        for k in 1..5u32 {
            let client = FlakyClient::new(k);
            let flow = flow_for(client.clone(), RetryPolicy::default());
            let chunk = TextChunk::new("doc-1", "text");

            let start = Instant::now();
            let result = flow.run(&chunk, &ctx()).await;

            assert!(result.is_ok(), "k = {} should recover", k);
            assert_eq!(client.calls(), k + 1);
            // constant delay: k waits of 30s each
            let elapsed = start.elapsed();
            assert!(elapsed >= Duration::from_secs(30 * k as u64));
            assert!(elapsed < Duration::from_secs(30 * k as u64 + 1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_five_failures_exhaust_the_budget() {
        let client = FlakyClient::new(5);
        let flow = flow_for(client.clone(), RetryPolicy::default());
        let chunk = TextChunk::new("doc-1", "text");

        let start = Instant::now();
        let err = flow.run(&chunk, &ctx()).await.unwrap_err();

        assert_eq!(client.calls(), 5);
        // no delay after the final attempt
        assert!(start.elapsed() < Duration::from_secs(4 * 30 + 1));
        match err {
            GenerationError::Exhausted {
                chunk_id,
                attempts,
                last,
            } => {
                assert_eq!(chunk_id, "doc-1");
                assert_eq!(attempts, 5);
                assert!(last.is_retryable());
            }
            other => panic!("expected Exhausted, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_custom_budget_is_respected() {
        let client = FlakyClient::new(10);
        let flow = flow_for(client.clone(), RetryPolicy::new(2, Duration::ZERO));
        let chunk = TextChunk::new("doc-1", "text");

        let err = flow.run(&chunk, &ctx()).await.unwrap_err();
        assert!(!err.is_retryable());
        assert_eq!(client.calls(), 2);
    }
}

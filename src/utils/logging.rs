//! Logging helpers
//!
//! Subscriber setup plus the banner lines printed around a run.

use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the global subscriber
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` when verbose.
/// Calling it twice is harmless.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Log run parameters
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 Synthetic question generation");
    info!("🤖 Model: {}", config.llm_model_name);
    info!("📊 Max concurrent requests: {}", config.max_concurrent_requests);
    info!(
        "🔁 Retry budget: {} attempts, {}s apart",
        config.max_attempts, config.retry_delay_secs
    );
    info!("🧯 On failure: {:?}", config.failure_policy);
    info!("{}", "=".repeat(60));
}

/// Log what the chunk source produced
///
/// # Arguments
/// - `documents`: documents read
/// - `chunks`: chunks produced by the chunker
/// - `selected`: chunks left after the `max_questions` cap
pub fn log_chunks_loaded(documents: usize, chunks: usize, selected: usize) {
    info!("✓ Read {} documents, {} chunks", documents, chunks);
    if selected < chunks {
        info!("📋 Limited to the first {} chunks", selected);
    }
}

/// Log final statistics
///
/// # Arguments
/// - `success` / `failed`: items written and chunks skipped
/// - `total`: chunks submitted
/// - `output_path`: where the items went
pub fn print_final_stats(success: usize, failed: usize, total: usize, output_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 Generation finished");
    info!(
        "Finished at: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ Generated: {}/{}", success, total);
    info!("❌ Failed: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\nOutput written to: {}", output_path.display());
}

/// Truncate long text for display
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

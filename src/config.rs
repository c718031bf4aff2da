use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AppResult, ConfigError, FileError};
use crate::workflow::RetryPolicy;

/// What the coordinator does when a chunk exhausts its retries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the batch and surface the failure
    #[default]
    Abort,
    /// Record the failure and keep processing the remaining chunks
    Skip,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(format!("unknown failure policy '{}'", other)),
        }
    }
}

/// Program configuration
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM ---
    pub llm_api_key: String,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
    // --- generation ---
    /// Maximum number of generation requests in flight
    pub max_concurrent_requests: usize,
    /// Attempts per chunk, including the first one
    pub max_attempts: u32,
    /// Fixed delay between two attempts on the same chunk
    pub retry_delay_secs: u64,
    pub failure_policy: FailurePolicy,
    /// Write each item as soon as it completes instead of once at the end
    pub incremental_output: bool,
    // --- chunk source ---
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub file_suffix: String,
    /// Show debug logs
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_api_key: String::new(),
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
            max_concurrent_requests: 16,
            max_attempts: 5,
            retry_delay_secs: 30,
            failure_policy: FailurePolicy::Abort,
            incremental_output: false,
            chunk_size: 300,
            chunk_overlap: 50,
            file_suffix: ".md".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// Defaults overridden by the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Load an optional TOML file, then apply environment overrides and validate
    pub async fn load(path: Option<&Path>) -> AppResult<Self> {
        let base = match path {
            Some(path) => {
                let content = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| FileError::read_failed(path, e))?;
                Self::from_toml_str(&content).map_err(|source| FileError::TomlParseFailed {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => Self::default(),
        };

        let config = base.with_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Apply overrides from a key lookup (the environment in production)
    pub fn with_overrides<F>(self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            llm_api_key: lookup("OPENAI_API_KEY").unwrap_or(self.llm_api_key),
            llm_api_base_url: lookup("OPENAI_BASE_URL").unwrap_or(self.llm_api_base_url),
            llm_model_name: lookup("LLM_MODEL_NAME").unwrap_or(self.llm_model_name),
            max_concurrent_requests: parse_override(
                &lookup,
                "MAX_CONCURRENT_REQUESTS",
                "unsigned integer",
            )?
            .unwrap_or(self.max_concurrent_requests),
            max_attempts: parse_override(&lookup, "GENERATION_MAX_ATTEMPTS", "unsigned integer")?
                .unwrap_or(self.max_attempts),
            retry_delay_secs: parse_override(
                &lookup,
                "GENERATION_RETRY_DELAY_SECS",
                "unsigned integer",
            )?
            .unwrap_or(self.retry_delay_secs),
            failure_policy: parse_override(&lookup, "GENERATION_FAILURE_POLICY", "abort|skip")?
                .unwrap_or(self.failure_policy),
            incremental_output: parse_override(&lookup, "INCREMENTAL_OUTPUT", "bool")?
                .unwrap_or(self.incremental_output),
            chunk_size: parse_override(&lookup, "CHUNK_SIZE", "unsigned integer")?
                .unwrap_or(self.chunk_size),
            chunk_overlap: parse_override(&lookup, "CHUNK_OVERLAP", "unsigned integer")?
                .unwrap_or(self.chunk_overlap),
            file_suffix: lookup("FILE_SUFFIX").unwrap_or(self.file_suffix),
            verbose_logging: parse_override(&lookup, "VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
        })
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_requests == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_concurrent_requests",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::InvalidValue {
                field: "chunk_overlap",
                reason: format!(
                    "overlap ({}) must be less than chunk_size ({})",
                    self.chunk_overlap, self.chunk_size
                ),
            });
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_secs(self.retry_delay_secs))
    }
}

fn parse_override<T, F>(
    lookup: &F,
    var_name: &str,
    expected_type: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type,
            }),
    }
}

use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use sluice::prelude::*;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub client: ClientConfig,
    #[serde(default)]
    pub consumer: ConsumerConfig,
    pub stream: StreamSettings,
    pub cursors: CursorSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamSettings {
    pub subscription_id: String,
    pub batch_limit: Option<u32>,
    pub stream_limit: Option<u32>,
    pub batch_flush_timeout_secs: Option<u64>,
    pub stream_timeout_secs: Option<u64>,
    pub max_uncommitted_events: Option<u32>,
    /// "sync" or "async"
    pub commit_mode: String,
    pub commit_window_ms: Option<u64>,
    pub commit_window_count: Option<usize>,
}

impl StreamSettings {
    pub fn parameters(&self) -> StreamParameters {
        StreamParameters {
            batch_limit: self.batch_limit,
            stream_limit: self.stream_limit,
            batch_flush_timeout: self.batch_flush_timeout_secs.map(Duration::from_secs),
            stream_timeout: self.stream_timeout_secs.map(Duration::from_secs),
            max_uncommitted_events: self.max_uncommitted_events,
            ..StreamParameters::default()
        }
    }

    pub fn commit_strategy(&self) -> Result<CommitStrategy, ConfigError> {
        let buffering = match (self.commit_window_ms, self.commit_window_count) {
            (None, None) => CommitBufferingStrategy::NoBuffer,
            (Some(ms), None) => CommitBufferingStrategy::time_window(Duration::from_millis(ms)),
            (None, Some(count)) => CommitBufferingStrategy::count_window(count),
            (Some(ms), Some(count)) => {
                CommitBufferingStrategy::time_or_count(Duration::from_millis(ms), count)
            }
        };

        match self.commit_mode.as_str() {
            "sync" => Ok(CommitStrategy::Sync),
            "async" => Ok(CommitStrategy::Async(buffering)),
            other => Err(ConfigError::Message(format!(
                "commit_mode must be \"sync\" or \"async\", got \"{}\"",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CursorSettings {
    pub event_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub format: String,
}

impl Settings {
    /// Load settings from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables prefixed with SLUICE (e.g. SLUICE_STREAM__BATCH_LIMIT)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("SLUICE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut settings: Settings = builder.build()?.try_deserialize()?;

        // Secrets come from the environment only
        settings.client.access_token = std::env::var("SLUICE_ACCESS_TOKEN").ok();

        Ok(settings)
    }

    /// Load settings from a specific file (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }
}

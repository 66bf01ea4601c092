use serde::Deserialize;
use std::env;

use shared::DEFAULT_WORKER_COUNT;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub pipeline: PipelineConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PipelineConfig {
    pub worker_count: usize,
    /// Fixed capacity for every queue; `None` sizes queues from the event count
    pub channel_buffer_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            channel_buffer_size: None,
        }
    }
}

impl PipelineConfig {
    pub fn with_worker_count(worker_count: usize) -> Self {
        Self {
            worker_count,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.worker_count == 0 {
            anyhow::bail!("worker_count must be at least 1");
        }
        if self.channel_buffer_size == Some(0) {
            anyhow::bail!("channel_buffer_size must be at least 1");
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let channel_buffer_size = match env::var("NORMALIZER_CHANNEL_BUFFER_SIZE") {
            Ok(value) => Some(value.parse()?),
            Err(_) => None,
        };

        let config = Config {
            pipeline: PipelineConfig {
                worker_count: env::var("NORMALIZER_WORKER_COUNT")
                    .unwrap_or_else(|_| DEFAULT_WORKER_COUNT.to_string())
                    .parse()?,
                channel_buffer_size,
            },
            input: InputConfig {
                path: env::var("NORMALIZER_INPUT_PATH")
                    .unwrap_or_else(|_| "external-api-response.json".to_string()),
            },
            output: OutputConfig {
                pretty: env::var("NORMALIZER_OUTPUT_PRETTY")
                    .unwrap_or_else(|_| "true".to_string())
                    .parse()?,
            },
        };

        config.pipeline.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.worker_count, 10);
        assert_eq!(config.channel_buffer_size, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(PipelineConfig::with_worker_count(0).validate().is_err());
    }

    #[test]
    fn test_zero_buffer_rejected() {
        let config = PipelineConfig {
            worker_count: 1,
            channel_buffer_size: Some(0),
        };
        assert!(config.validate().is_err());
    }
}

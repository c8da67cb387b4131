use std::env;

use super::Environment;

#[derive(Debug, Clone)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub search: SearchSettings,
    pub llm: LlmSettings,
    pub pipeline: PipelineSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// When unset, jobs live in the in-memory store.
    pub database_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub tavily_api_key: String,
    pub max_results: usize,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub ollama_base_url: String,
    pub ollama_model: String,
    pub max_extraction_length: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Per-stage wall-clock budget in seconds; unset means unbounded.
    pub stage_timeout_secs: Option<u64>,
    pub queue_capacity: usize,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub json_format: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self, String> {
        let environment = Environment::try_from(
            env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
        )?;

        Ok(Self {
            environment,
            server: ServerSettings {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_or("SERVER_PORT", 8000)?,
            },
            storage: StorageSettings {
                database_url: env::var("DATABASE_URL").ok(),
            },
            search: SearchSettings {
                tavily_api_key: env::var("TAVILY_API_KEY").unwrap_or_default(),
                max_results: parse_or("MAX_SEARCH_RESULTS", 20)?,
            },
            llm: LlmSettings {
                ollama_base_url: env::var("OLLAMA_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string()),
                ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama2".to_string()),
                max_extraction_length: parse_or("MAX_EXTRACTION_LENGTH", 4000)?,
            },
            pipeline: PipelineSettings {
                stage_timeout_secs: env::var("STAGE_TIMEOUT_SECS")
                    .ok()
                    .map(|v| {
                        v.parse()
                            .map_err(|_| format!("Invalid STAGE_TIMEOUT_SECS: {}", v))
                    })
                    .transpose()?,
                queue_capacity: parse_or("PIPELINE_QUEUE_CAPACITY", 64)?,
            },
            logging: LoggingSettings {
                json_format: env::var("LOG_JSON")
                    .map(|v| v.eq_ignore_ascii_case("true"))
                    .unwrap_or(false),
            },
        })
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| format!("Invalid {}: {}", key, value)),
        Err(_) => Ok(default),
    }
}

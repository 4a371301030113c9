// Application configuration
//
// Read once from the environment at startup (after `.env` is loaded).

use std::str::FromStr;
use std::time::Duration;

/// Connection settings for the OpenAI-compatible model provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

/// Defaults applied when a generation request leaves settings out
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationDefaults {
    /// Model used by the direct completion strategy
    pub completion_model: String,
    /// Model used by the composable pipeline strategy
    pub chat_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            completion_model: "gpt-3.5-turbo-instruct".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        }
    }
}

/// Where the archive-trigger collaborator lives
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    pub trigger_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub llm: LlmConfig,
    pub generation: GenerationDefaults,
    pub archive: ArchiveConfig,
}

impl AppConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = GenerationDefaults::default();

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set, generation requests will fail");
        }

        Self {
            port: env_or("PORT", 3000),
            llm: LlmConfig {
                api_key,
                base_url: env_or(
                    "OPENAI_BASE_URL",
                    "https://api.openai.com/v1".to_string(),
                ),
                timeout: Duration::from_secs(env_or("LLM_TIMEOUT_SECS", 60)),
            },
            generation: GenerationDefaults {
                completion_model: env_or("COMPLETION_MODEL", defaults.completion_model),
                chat_model: env_or("CHAT_MODEL", defaults.chat_model),
                temperature: env_or("DEFAULT_TEMPERATURE", defaults.temperature),
                max_tokens: env_or("DEFAULT_MAX_TOKENS", defaults.max_tokens),
            },
            archive: ArchiveConfig {
                trigger_url: env_or(
                    "ARCHIVE_TRIGGER_URL",
                    "http://localhost:3001/api/archive".to_string(),
                ),
                timeout: Duration::from_secs(env_or("ARCHIVE_TIMEOUT_SECS", 30)),
            },
        }
    }
}

/// Parse an environment variable, keeping the default when unset or invalid
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("{} has an invalid value ({:?}), using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

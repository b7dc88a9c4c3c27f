use std::env;
use std::str::FromStr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::constants::prompts::SYSTEM_PROMPT;
use crate::errors::{AppError, AppResult};

pub const DEFAULT_ENDPOINT_URL: &str = "https://api.perplexity.ai/chat/completions";
pub const DEFAULT_MODEL_NAME: &str = "sonar-pro";

/// Settings for the chat-completion upstream.
#[derive(Clone, Debug)]
pub struct LlmSettings {
    pub endpoint_url: String,
    pub model_name: String,
    pub api_key: Option<SecretString>,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub system_prompt: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            api_key: None,
            request_timeout_secs: 60,
            max_retries: 3,
            retry_backoff_ms: 1000,
            temperature: 0.7,
            max_tokens: 2000,
            top_p: 0.9,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

impl LlmSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// True when a non-blank credential is present.
    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty())
    }

    /// Credential with everything but the edges hidden, for log lines.
    pub fn masked_credential(&self) -> String {
        match &self.api_key {
            Some(key) => {
                let key = key.expose_secret();
                let chars: Vec<char> = key.chars().collect();
                if chars.len() <= 12 {
                    "****".to_string()
                } else {
                    let head: String = chars[..8].iter().collect();
                    let tail: String = chars[chars.len() - 4..].iter().collect();
                    format!("{}...{}", head, tail)
                }
            }
            None => "<unset>".to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct GenerationSettings {
    pub max_concurrency: usize,
    pub max_text_chars: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            max_text_chars: 50_000,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub web_server_host: String,
    pub web_server_port: u16,
    pub llm: LlmSettings,
    pub generation: GenerationSettings,
}

impl Config {
    pub fn from_env() -> Self {
        let llm_defaults = LlmSettings::default();
        let generation_defaults = GenerationSettings::default();

        Self {
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: env_parse("WEB_SERVER_PORT", 8080),
            llm: LlmSettings {
                endpoint_url: env::var("LLM_ENDPOINT_URL")
                    .unwrap_or(llm_defaults.endpoint_url),
                model_name: env::var("LLM_MODEL").unwrap_or(llm_defaults.model_name),
                api_key: env::var("PERPLEXITY_API_KEY")
                    .ok()
                    .filter(|key| !key.trim().is_empty())
                    .map(SecretString::from),
                request_timeout_secs: env_parse(
                    "LLM_REQUEST_TIMEOUT_SECS",
                    llm_defaults.request_timeout_secs,
                ),
                max_retries: env_parse("LLM_MAX_RETRIES", llm_defaults.max_retries),
                retry_backoff_ms: env_parse("LLM_RETRY_BACKOFF_MS", llm_defaults.retry_backoff_ms),
                temperature: env_parse("LLM_TEMPERATURE", llm_defaults.temperature),
                max_tokens: env_parse("LLM_MAX_TOKENS", llm_defaults.max_tokens),
                top_p: env_parse("LLM_TOP_P", llm_defaults.top_p),
                system_prompt: llm_defaults.system_prompt,
            },
            generation: GenerationSettings {
                max_concurrency: env_parse(
                    "GENERATOR_MAX_CONCURRENCY",
                    generation_defaults.max_concurrency,
                ),
                max_text_chars: env_parse("MAX_TEXT_CHARS", generation_defaults.max_text_chars),
            },
        }
    }

    /// Rejects values that would make the pipeline misbehave.
    /// A missing credential is allowed: generation then serves default content.
    pub fn validate(&self) -> AppResult<()> {
        if self.llm.endpoint_url.trim().is_empty() {
            return Err(AppError::Configuration(
                "LLM_ENDPOINT_URL must not be empty".to_string(),
            ));
        }
        if self.llm.max_retries == 0 {
            return Err(AppError::Configuration(
                "LLM_MAX_RETRIES must be at least 1".to_string(),
            ));
        }
        if self.llm.request_timeout_secs == 0 {
            return Err(AppError::Configuration(
                "LLM_REQUEST_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(AppError::Configuration(format!(
                "LLM_TEMPERATURE must be within 0.0..=2.0, got {}",
                self.llm.temperature
            )));
        }
        if !(self.llm.top_p > 0.0 && self.llm.top_p <= 1.0) {
            return Err(AppError::Configuration(format!(
                "LLM_TOP_P must be within (0.0, 1.0], got {}",
                self.llm.top_p
            )));
        }
        if self.generation.max_concurrency == 0 {
            return Err(AppError::Configuration(
                "GENERATOR_MAX_CONCURRENCY must be at least 1".to_string(),
            ));
        }
        if self.generation.max_text_chars == 0 {
            return Err(AppError::Configuration(
                "MAX_TEXT_CHARS must be at least 1".to_string(),
            ));
        }

        if !self.llm.has_credential() {
            log::warn!("PERPLEXITY_API_KEY not set - generation will serve default content");
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            llm: LlmSettings {
                api_key: Some(SecretString::from("pplx-test-key-0000000000".to_string())),
                retry_backoff_ms: 0,
                request_timeout_secs: 1,
                ..LlmSettings::default()
            },
            generation: GenerationSettings::default(),
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

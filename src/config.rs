use anyhow::{Result, bail};
use std::env;
use std::fmt;

const API_KEY_VAR: &str = "PROXYAPI_KEY";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.proxyapi.ru/openai/v1";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.proxyapi.ru/anthropic";
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 60;

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub openai_base_url: String,
    pub anthropic_base_url: String,
    pub model_timeout_secs: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("openai_base_url", &self.openai_base_url)
            .field("anthropic_base_url", &self.anthropic_base_url)
            .field("model_timeout_secs", &self.model_timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| env::var(key).ok())
    }

    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Result<Self> {
        let Some(api_key) = get_var(API_KEY_VAR)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        else {
            bail!(
                "{} is not set. Export it or add it to a .env file in the working directory.",
                API_KEY_VAR
            );
        };

        Ok(Self {
            api_key,
            openai_base_url: parse_base_url(
                get_var("OPENAI_BASE_URL").as_deref(),
                DEFAULT_OPENAI_BASE_URL,
            ),
            anthropic_base_url: parse_base_url(
                get_var("ANTHROPIC_BASE_URL").as_deref(),
                DEFAULT_ANTHROPIC_BASE_URL,
            ),
            model_timeout_secs: parse_model_timeout_secs(
                get_var("MODEL_TIMEOUT_SECS").as_deref(),
            ),
        })
    }
}

fn parse_base_url(raw: Option<&str>, default: &str) -> String {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(default)
        .trim_end_matches('/')
        .to_string()
}

fn parse_model_timeout_secs(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS)
}

#[cfg(test)]
pub(crate) fn test_config(base_url: &str) -> Config {
    Config {
        api_key: "test-key".to_string(),
        openai_base_url: base_url.to_string(),
        anthropic_base_url: base_url.to_string(),
        model_timeout_secs: 5,
    }
}

//! Configuration loader and validator for the homework status bot.
use reqwest::Url;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const RETRY_TIME_SECS: u64 = 600;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Отсутствует переменная окружения: {0}")]
    MissingVar(&'static str),
    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpoint(String),
    #[error("env file error: {0}")]
    EnvFile(#[from] dotenv::Error),
}

/// Immutable runtime configuration, built once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
    pub endpoint: Url,
    pub retry_interval: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("retry_interval", &self.retry_interval)
            .finish_non_exhaustive()
    }
}

/// True iff every secret is present and non-empty. Values are taken as-is.
pub fn check_tokens(tokens: &[Option<&str>]) -> bool {
    tokens
        .iter()
        .all(|t| t.map(|v| !v.is_empty()).unwrap_or(false))
}

/// Load `.env`-style variables into the process environment if the file exists.
pub fn load_env_file(path: &Path) -> Result<(), ConfigError> {
    if !path.exists() {
        return Ok(());
    }
    dotenv::from_path(path)?;
    Ok(())
}

/// Build the configuration from the process environment.
pub fn from_env() -> Result<Config, ConfigError> {
    load_from(|key| std::env::var(key).ok())
}

/// Build the configuration from an arbitrary variable lookup.
pub fn load_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let practicum_token = lookup(PRACTICUM_TOKEN);
    let telegram_token = lookup(TELEGRAM_TOKEN);
    let telegram_chat_id = lookup(TELEGRAM_CHAT_ID);

    let secrets = [
        (PRACTICUM_TOKEN, practicum_token.as_deref()),
        (TELEGRAM_TOKEN, telegram_token.as_deref()),
        (TELEGRAM_CHAT_ID, telegram_chat_id.as_deref()),
    ];
    if !check_tokens(&secrets.map(|(_, v)| v)) {
        let missing = secrets
            .iter()
            .find(|(_, v)| !check_tokens(&[*v]))
            .map(|(name, _)| *name)
            .unwrap_or(PRACTICUM_TOKEN);
        return Err(ConfigError::MissingVar(missing));
    }

    let endpoint = Url::parse(ENDPOINT).map_err(|e| ConfigError::InvalidEndpoint(e.to_string()))?;

    Ok(Config {
        practicum_token: practicum_token.unwrap_or_default(),
        telegram_token: telegram_token.unwrap_or_default(),
        telegram_chat_id: telegram_chat_id.unwrap_or_default(),
        endpoint,
        retry_interval: Duration::from_secs(RETRY_TIME_SECS),
    })
}

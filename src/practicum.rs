use crate::config::Config;
use crate::error::BotError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use std::fmt;
use tracing::{debug, error};

/// Source of homework status snapshots.
#[async_trait]
pub trait HomeworkApi: Send + Sync {
    /// Fetch statuses changed since `from_date` (unix seconds). `None` means now.
    async fn get_api_answer(&self, from_date: Option<i64>) -> Result<Value, BotError>;
}

#[derive(Clone)]
pub struct PracticumClient {
    http: Client,
    endpoint: Url,
    token: String,
}

impl fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl PracticumClient {
    pub fn new(token: String, endpoint: Url) -> Result<Self> {
        let http = Client::builder()
            .user_agent("homework-bot/0.1")
            .no_proxy()
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            endpoint,
            token,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(cfg.practicum_token.clone(), cfg.endpoint.clone())
    }

    pub fn build_request(&self, from_date: i64) -> Result<reqwest::Request, BotError> {
        self.http
            .get(self.endpoint.clone())
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .build()
            .map_err(|e| BotError::Api(e.to_string()))
    }

    async fn fetch(&self, from_date: i64) -> Result<Value, BotError> {
        let request = self.build_request(from_date)?;
        debug!(url = %request.url(), "requesting homework statuses");
        let res = self
            .http
            .execute(request)
            .await
            .map_err(|e| BotError::Api(e.to_string()))?;

        if res.status() != StatusCode::OK {
            return Err(BotError::Api(format!(
                "API недоступна: код ответа {}",
                res.status()
            )));
        }

        res.json::<Value>()
            .await
            .map_err(|e| BotError::Api(format!("ответ не является JSON: {}", e)))
    }
}

#[async_trait]
impl HomeworkApi for PracticumClient {
    async fn get_api_answer(&self, from_date: Option<i64>) -> Result<Value, BotError> {
        let from_date = from_date.unwrap_or_else(|| chrono::Utc::now().timestamp());
        let result = self.fetch(from_date).await;
        if let Err(err) = &result {
            error!(from_date, "{}", err);
        }
        result
    }
}

/// Check the response shape and hand back its `homeworks` list untouched.
pub fn check_response(response: &Value) -> Result<&[Value], BotError> {
    let result = homeworks_of(response);
    if let Err(err) = &result {
        error!("{}", err);
    }
    result
}

fn homeworks_of(response: &Value) -> Result<&[Value], BotError> {
    let body = response
        .as_object()
        .ok_or(BotError::InvalidType("ответ не является словарём"))?;
    let homeworks = body
        .get("homeworks")
        .ok_or(BotError::MissingResponseKey("homeworks"))?;
    homeworks
        .as_array()
        .map(Vec::as_slice)
        .ok_or(BotError::InvalidType("homeworks не является списком"))
}

/// Server-reported time to use as the next cursor, if any.
pub fn current_date(response: &Value) -> Option<i64> {
    response.get("current_date").and_then(Value::as_i64)
}

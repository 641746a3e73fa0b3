//! The polling loop: poll, validate, format, notify, sleep.
//!
//! The watcher owns the poll cursor and the last reported error. Cycles run
//! strictly one after another; cancellation is observed only while sleeping
//! between cycles, so an in-flight request always completes.
use crate::error::BotError;
use crate::notifier::{send_message, MessageSink};
use crate::practicum::{check_response, current_date, HomeworkApi};
use crate::status::parse_status;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

/// What a single cycle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The response carried no homeworks.
    Idle,
    /// A status message was produced for the newest homework.
    Notified { delivered: bool },
    /// The cycle aborted; `notified` is false when the message repeated the last error.
    Failed { message: String, notified: bool },
}

pub struct Watcher {
    api: Arc<dyn HomeworkApi>,
    sink: Arc<dyn MessageSink>,
    retry_interval: Duration,
    cursor: Option<i64>,
    last_error: Option<String>,
}

impl Watcher {
    pub fn new(
        api: Arc<dyn HomeworkApi>,
        sink: Arc<dyn MessageSink>,
        retry_interval: Duration,
    ) -> Self {
        Self {
            api,
            sink,
            retry_interval,
            cursor: Some(chrono::Utc::now().timestamp()),
            last_error: None,
        }
    }

    pub fn with_cursor(mut self, cursor: Option<i64>) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn cursor(&self) -> Option<i64> {
        self.cursor
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[instrument(skip_all, fields(cursor = ?self.cursor))]
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.poll_once().await {
            Ok(Some(delivered)) => CycleOutcome::Notified { delivered },
            Ok(None) => CycleOutcome::Idle,
            Err(err) => self.report_failure(err).await,
        }
    }

    /// Run cycles until `cancel` fires, sleeping `retry_interval` after each.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!(
            retry_secs = self.retry_interval.as_secs(),
            "homework watcher started"
        );
        while !cancel.is_cancelled() {
            let outcome = self.run_cycle().await;
            debug!(?outcome, cursor = ?self.cursor, "cycle finished");
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.retry_interval) => {}
            }
        }
        info!("homework watcher stopped");
    }

    async fn poll_once(&mut self) -> Result<Option<bool>, BotError> {
        let response = self.api.get_api_answer(self.cursor).await?;
        let homeworks = check_response(&response)?;
        let delivered = match homeworks.first() {
            Some(newest) => {
                let message = parse_status(newest)?;
                Some(send_message(self.sink.as_ref(), &message).await)
            }
            None => None,
        };
        // An absent current_date leaves no cursor; the next poll then asks from "now".
        self.cursor = current_date(&response);
        Ok(delivered)
    }

    async fn report_failure(&mut self, err: BotError) -> CycleOutcome {
        let message = format!("Сбой в работе программы: {}", err);
        error!(kind = ?err.kind(), "{}", message);
        let notified = self.last_error.as_deref() != Some(message.as_str());
        if notified {
            send_message(self.sink.as_ref(), &message).await;
            self.last_error = Some(message.clone());
        }
        CycleOutcome::Failed { message, notified }
    }
}

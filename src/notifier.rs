use crate::config::Config;
use crate::error::BotError;
use async_trait::async_trait;
use std::fmt;
use teloxide::prelude::*;
use teloxide::types::Recipient;
use tracing::{error, info, instrument};

/// A destination that accepts plain-text notifications.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn deliver(&self, text: &str) -> Result<(), BotError>;
}

#[derive(Clone)]
pub struct TelegramSink {
    bot: Bot,
    chat: Recipient,
}

impl fmt::Debug for TelegramSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSink")
            .field("chat", &self.chat)
            .finish_non_exhaustive()
    }
}

impl TelegramSink {
    pub fn new(bot: Bot, chat: Recipient) -> Self {
        Self { bot, chat }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            Bot::new(cfg.telegram_token.clone()),
            parse_recipient(&cfg.telegram_chat_id),
        )
    }
}

#[async_trait]
impl MessageSink for TelegramSink {
    async fn deliver(&self, text: &str) -> Result<(), BotError> {
        self.bot
            .send_message(self.chat.clone(), text)
            .await
            .map(|_| ())
            .map_err(|e| BotError::Delivery(e.to_string()))
    }
}

/// Numeric ids address chats directly; anything else is a channel username.
pub fn parse_recipient(raw: &str) -> Recipient {
    let raw = raw.trim();
    match raw.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(raw.to_string()),
    }
}

/// Best-effort delivery. Failures are logged and swallowed; the return value
/// only reports whether the message went out.
#[instrument(skip_all)]
pub async fn send_message(sink: &dyn MessageSink, text: &str) -> bool {
    match sink.deliver(text).await {
        Ok(()) => {
            info!("Сообщение успешно отправлено");
            true
        }
        Err(err) => {
            let err = match err {
                BotError::Delivery(_) => err,
                other => BotError::Delivery(other.to_string()),
            };
            error!("{}", err);
            false
        }
    }
}

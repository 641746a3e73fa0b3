//! Error taxonomy shared by the poller, validator, formatter and notifier.
use crate::config::ConfigError;
use thiserror::Error;

/// Coarse origin of a failure. The watcher only ever reasons in these terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
    Schema,
    Content,
    Delivery,
}

#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Ошибка обращения к API: {0}")]
    Api(String),
    #[error("Недопустимый тип ответа API: {0}")]
    InvalidType(&'static str),
    #[error("Ошибка проверки ответа API: отсутствует ключ {0}")]
    MissingResponseKey(&'static str),
    #[error("Некорректная запись о домашней работе: {0}")]
    InvalidHomework(&'static str),
    #[error("Отсутствует ключ {0}")]
    MissingHomeworkKey(&'static str),
    #[error("Неизвестный статус домашней работы: {0}")]
    UnknownStatus(String),
    #[error("Ошибка отправки сообщения: {0}")]
    Delivery(String),
}

impl BotError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BotError::Config(_) => ErrorKind::Configuration,
            BotError::Api(_) => ErrorKind::Transport,
            BotError::InvalidType(_) | BotError::MissingResponseKey(_) => ErrorKind::Schema,
            BotError::InvalidHomework(_)
            | BotError::MissingHomeworkKey(_)
            | BotError::UnknownStatus(_) => ErrorKind::Content,
            BotError::Delivery(_) => ErrorKind::Delivery,
        }
    }

    /// Response or record had the wrong JSON shape.
    pub fn is_type_error(&self) -> bool {
        matches!(self, BotError::InvalidType(_) | BotError::InvalidHomework(_))
    }

    /// A required key was absent, or a status code is not in the verdict table.
    pub fn is_missing_key(&self) -> bool {
        matches!(
            self,
            BotError::MissingResponseKey(_)
                | BotError::MissingHomeworkKey(_)
                | BotError::UnknownStatus(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_cover_each_origin() {
        assert_eq!(BotError::Api("x".into()).kind(), ErrorKind::Transport);
        assert_eq!(BotError::InvalidType("x").kind(), ErrorKind::Schema);
        assert_eq!(BotError::MissingResponseKey("homeworks").kind(), ErrorKind::Schema);
        assert_eq!(BotError::MissingHomeworkKey("status").kind(), ErrorKind::Content);
        assert_eq!(BotError::UnknownStatus("done".into()).kind(), ErrorKind::Content);
        assert_eq!(BotError::Delivery("x".into()).kind(), ErrorKind::Delivery);
        assert_eq!(
            BotError::from(ConfigError::MissingVar("TELEGRAM_TOKEN")).kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn missing_key_class_excludes_type_errors() {
        assert!(BotError::UnknownStatus("done".into()).is_missing_key());
        assert!(!BotError::UnknownStatus("done".into()).is_type_error());
        assert!(BotError::InvalidType("homeworks").is_type_error());
        assert!(!BotError::InvalidType("homeworks").is_missing_key());
    }

    #[test]
    fn display_is_operator_facing() {
        let err = BotError::Delivery("chat not found".into());
        assert_eq!(err.to_string(), "Ошибка отправки сообщения: chat not found");
        let err = BotError::MissingHomeworkKey("homework_name");
        assert_eq!(err.to_string(), "Отсутствует ключ homework_name");
    }
}

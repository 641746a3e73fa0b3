use crate::error::BotError;
use serde_json::Value;
use tracing::error;

/// Review states reported by the homework API, each mapped to a fixed verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(HomeworkStatus::Approved),
            "reviewing" => Some(HomeworkStatus::Reviewing),
            "rejected" => Some(HomeworkStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// Render the notification text for a single homework record.
///
/// A `null` field counts as absent. Any status outside the verdict table is
/// rejected rather than skipped.
pub fn parse_status(homework: &Value) -> Result<String, BotError> {
    let result = render(homework);
    if let Err(err) = &result {
        error!("{}", err);
    }
    result
}

fn render(homework: &Value) -> Result<String, BotError> {
    let record = homework
        .as_object()
        .ok_or(BotError::InvalidHomework("record is not an object"))?;

    let name = match record.get("homework_name") {
        None | Some(Value::Null) => return Err(BotError::MissingHomeworkKey("homework_name")),
        Some(Value::String(name)) => name,
        Some(_) => return Err(BotError::InvalidHomework("homework_name is not a string")),
    };

    let status = match record.get("status") {
        None | Some(Value::Null) => return Err(BotError::MissingHomeworkKey("status")),
        Some(Value::String(code)) => HomeworkStatus::from_code(code)
            .ok_or_else(|| BotError::UnknownStatus(code.clone()))?,
        Some(other) => return Err(BotError::UnknownStatus(other.to_string())),
    };

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UptimeError {
    #[error("invalid interval '{0}': expected HH:MM-HH:MM")]
    InvalidInterval(String),

    #[error("invalid time '{0}': expected HH:MM or HH:MM:SS")]
    InvalidTime(String),

    #[error("invalid date '{0}': expected DD.MM.YYYY (any separator)")]
    InvalidDate(String),

    #[error("owner must not be empty")]
    EmptyOwner,

    #[error("unknown recurrence type '{0}': expected DOW, DOM or DATE")]
    UnknownRecurrenceType(String),

    #[error("invalid value '{value}' for recurrence type {rtype}")]
    InvalidRecurrenceValue { rtype: String, value: String },

    #[error("settings file {path}: {message}")]
    Settings { path: String, message: String },

    #[error(transparent)]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, UptimeError>;

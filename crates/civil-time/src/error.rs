//! Error types for civil-time operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CivilTimeError {
    /// The composed calendar fields do not name a real point in time.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// An arithmetic result cannot be represented by the calendar.
    #[error("Invalid result: {0}")]
    InvalidResult(String),

    /// A numeric time-of-day literal failed validation.
    #[error("Invalid time literal: {0}")]
    InvalidTimeLiteral(String),

    /// Text did not match the expected pattern.
    #[error("Parse failure: {0}")]
    ParseFailure(String),

    /// The calendar cannot supply the requested field for an instant.
    #[error("Unrepresentable field: {0}")]
    UnrepresentableField(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CivilTimeError>;

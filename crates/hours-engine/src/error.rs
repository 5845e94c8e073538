//! Error types for hours-engine operations.
//!
//! Parsing scraped hours text never fails: unparseable fragments are dropped.
//! These errors only come from the strict surfaces (canonical clock-time
//! strings, interval construction, deserialization, and zone resolution).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HoursError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid clock time: {0}")]
    InvalidClockTime(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Invalid day index: {0}")]
    InvalidDay(u8),
}

pub type Result<T> = std::result::Result<T, HoursError>;

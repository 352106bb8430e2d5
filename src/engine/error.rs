use serde::Serialize;
use thiserror::Error;

use crate::types::YearMonth;

/// Per-request failures. Load-time failures are `anyhow` errors raised at
/// construction instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("unsupported country '{0}': expected 'us' or 'japan'")]
    UnsupportedCountry(String),

    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(i32),

    #[error("invalid range: {from} is after {to}")]
    InvalidRange { from: YearMonth, to: YearMonth },

    #[error("budget must be positive, got {0}")]
    InvalidBudget(String),

    #[error("no recorded rate for {0}")]
    MissingMonth(YearMonth),

    #[error("forecasts are limited to {cap} months after the latest data ({latest}); {requested} is {months_ahead} months ahead")]
    HorizonExceeded {
        cap: u32,
        latest: YearMonth,
        requested: YearMonth,
        months_ahead: i64,
    },

    #[error("forecast failed: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    DataCompleteness,
    Horizon,
    Internal,
}

impl ForecastError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::UnsupportedCountry(_)
            | ForecastError::InvalidMonth(_)
            | ForecastError::InvalidRange { .. }
            | ForecastError::InvalidBudget(_) => ErrorKind::Validation,
            ForecastError::MissingMonth(_) => ErrorKind::DataCompleteness,
            ForecastError::HorizonExceeded { .. } => ErrorKind::Horizon,
            ForecastError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl From<anyhow::Error> for ForecastError {
    fn from(err: anyhow::Error) -> Self {
        ForecastError::Internal(format!("{:#}", err))
    }
}

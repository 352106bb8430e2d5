use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::error::{ErrorKind, ForecastError};
use crate::types::Country;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    Up,
    Down,
}

impl ChangeDirection {
    /// Strictly positive is up; zero counts as down
    pub fn from_change_rate(change_rate: f64) -> Self {
        if change_rate > 0.0 {
            ChangeDirection::Up
        } else {
            ChangeDirection::Down
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ChangeDirection::Up => "up",
            ChangeDirection::Down => "down",
        }
    }
}

/// Comparison against the last seeded month, present on model forecasts only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub latest_rate: Decimal,
    pub latest_date: String,
    pub change_rate: Decimal,
    pub change_direction: ChangeDirection,
    pub months_ahead: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub year: i32,
    pub month: u32,
    pub country: Country,
    pub predicted_rate: Decimal,
    pub currency: String,
    pub is_historical: bool,
    pub note: String,
    #[serde(flatten)]
    pub projection: Option<Projection>,
    /// Unrounded level behind `predicted_rate`
    #[serde(skip)]
    pub raw_rate: f64,
}

/// Boundary shape: `success` plus either the forecast fields or an error
#[derive(Debug, Clone, Serialize)]
pub struct ForecastResponse {
    pub success: bool,
    #[serde(flatten)]
    pub forecast: Option<Forecast>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl From<Result<Forecast, ForecastError>> for ForecastResponse {
    fn from(result: Result<Forecast, ForecastError>) -> Self {
        match result {
            Ok(forecast) => Self {
                success: true,
                forecast: Some(forecast),
                error: None,
                error_kind: None,
            },
            Err(err) => Self {
                success: false,
                forecast: None,
                error: Some(err.to_string()),
                error_kind: Some(err.kind()),
            },
        }
    }
}

/// Exact decimal for a finite f64
pub fn to_decimal(value: f64) -> Result<Decimal, ForecastError> {
    Decimal::from_f64(value).ok_or_else(|| ForecastError::Internal(format!("value {} is not representable", value)))
}

/// Two-decimal rounding used for reported figures.
///
/// Rounds the binary value itself, so 2.675 (stored as 2.67499...) gives 2.67;
/// only exact binary ties go to even.
pub fn round2(value: f64) -> Result<Decimal, ForecastError> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
        .ok_or_else(|| ForecastError::Internal(format!("value {} is not representable", value)))
}

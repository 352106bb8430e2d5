use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Destination countries the forecaster quotes KRW rates for.
///
/// The United States rate is the primary series the model predicts; the
/// Japan rate is derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Country {
    UnitedStates,
    Japan,
}

impl Country {
    pub const ALL: [Country; 2] = [Country::UnitedStates, Country::Japan];

    pub fn as_str(&self) -> &str {
        match self {
            Country::UnitedStates => "united_states",
            Country::Japan => "japan",
        }
    }

    pub fn currency_label(&self) -> &'static str {
        match self {
            Country::UnitedStates => "USD",
            Country::Japan => "JPY(100)",
        }
    }

    /// Foreign units one quoted rate buys (JPY is quoted per 100 yen)
    pub fn units_per_quote(&self) -> Decimal {
        match self {
            Country::UnitedStates => Decimal::ONE,
            Country::Japan => Decimal::ONE_HUNDRED,
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Country {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "us" | "usa" | "united-states" | "usd" => Ok(Country::UnitedStates),
            "jp" | "japan" | "jpy" => Ok(Country::Japan),
            _ => Err(s.to_string()),
        }
    }
}

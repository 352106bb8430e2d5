use serde::{Deserialize, Serialize};

use super::{Country, YearMonth};

/// One month of KRW rates for both currencies plus their month-over-month returns.
///
/// Returns are fractional (`0.01` is +1%) and measured against the previous
/// observation in the series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    pub date: YearMonth,
    pub level_primary: f64,
    pub level_secondary: f64,
    pub return_primary: f64,
    pub return_secondary: f64,
}

impl RateObservation {
    /// Builds an observation from this month's levels and the previous month's
    pub fn from_levels(date: YearMonth, level_primary: f64, level_secondary: f64, prev: (f64, f64)) -> Self {
        Self {
            date,
            level_primary,
            level_secondary,
            return_primary: level_primary / prev.0 - 1.0,
            return_secondary: level_secondary / prev.1 - 1.0,
        }
    }

    pub fn level(&self, country: Country) -> f64 {
        match country {
            Country::UnitedStates => self.level_primary,
            Country::Japan => self.level_secondary,
        }
    }

    /// Model input row: (primary return, secondary return)
    pub fn features(&self) -> [f64; 2] {
        [self.return_primary, self.return_secondary]
    }

    pub fn is_valid(&self) -> bool {
        self.level_primary > 0.0
            && self.level_secondary > 0.0
            && self.level_primary.is_finite()
            && self.level_secondary.is_finite()
            && self.return_primary.is_finite()
            && self.return_secondary.is_finite()
    }
}

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use tracing::warn;

use crate::types::{RateObservation, YearMonth};

/// First month of the compiled-in levels. It has no prior month, so no
/// return, and is dropped from the series.
const SEED_START: YearMonth = YearMonth { year: 2023, month: 10 };

/// KRW per 1 USD, 2023-10 .. 2025-10
const SEED_USD_LEVELS: [f64; 25] = [
    1300.0,
    1305.0, 1310.0, 1320.0, 1315.0, 1325.0, 1330.0,
    1335.0, 1340.0, 1345.0, 1350.0, 1355.0, 1360.0,
    1365.0, 1370.0, 1375.0, 1380.0, 1385.0, 1390.0,
    1395.0, 1400.0, 1405.0, 1410.0, 1415.0, 1420.0,
];

/// KRW per 100 JPY, 2023-10 .. 2025-10
const SEED_JPY100_LEVELS: [f64; 25] = [
    875.0,
    880.0, 885.0, 890.0, 895.0, 900.0, 905.0,
    910.0, 915.0, 920.0, 925.0, 930.0, 935.0,
    940.0, 945.0, 950.0, 955.0, 960.0, 965.0,
    970.0, 975.0, 980.0, 985.0, 990.0, 995.0,
];

/// Immutable monthly series the forecaster starts from.
///
/// Always non-empty and strictly chronological. Forecast runs never touch it
/// directly; they work on a [`WorkingSeries`] copy.
#[derive(Debug, Clone)]
pub struct SeedSeries {
    observations: Vec<RateObservation>,
}

impl SeedSeries {
    /// The compiled-in historical data
    pub fn builtin() -> Result<Self> {
        Self::from_levels(SEED_START, &SEED_USD_LEVELS, &SEED_JPY100_LEVELS)
    }

    /// Builds a gap-free series from consecutive monthly levels starting at `start`.
    /// The first month only anchors the first return.
    pub fn from_levels(start: YearMonth, primary: &[f64], secondary: &[f64]) -> Result<Self> {
        if primary.len() != secondary.len() {
            return Err(anyhow!(
                "Level series length mismatch: {} vs {}",
                primary.len(),
                secondary.len()
            ));
        }
        if primary.len() < 2 {
            return Err(anyhow!("Need at least two months of levels to derive returns"));
        }

        let mut observations = Vec::with_capacity(primary.len() - 1);
        let mut date = start;
        for i in 1..primary.len() {
            date = date.next();
            observations.push(RateObservation::from_levels(
                date,
                primary[i],
                secondary[i],
                (primary[i - 1], secondary[i - 1]),
            ));
        }
        Self::from_observations(observations)
    }

    /// Accepts pre-built observations. Ordering and level positivity are
    /// enforced; missing months are tolerated with a warning.
    pub fn from_observations(observations: Vec<RateObservation>) -> Result<Self> {
        if observations.is_empty() {
            return Err(anyhow!("Seed series is empty"));
        }
        if let Some(bad) = observations.iter().find(|o| !o.is_valid()) {
            return Err(anyhow!("Invalid observation for {}: levels must be positive and finite", bad.date));
        }
        for pair in observations.windows(2) {
            let gap = pair[0].date.months_until(pair[1].date);
            if gap <= 0 {
                return Err(anyhow!(
                    "Seed series is not chronological: {} followed by {}",
                    pair[0].date,
                    pair[1].date
                ));
            }
            if gap > 1 {
                warn!("Seed series gap: no data between {} and {}", pair[0].date, pair[1].date);
            }
        }
        Ok(Self { observations })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn first(&self) -> &RateObservation {
        &self.observations[0]
    }

    pub fn latest(&self) -> &RateObservation {
        &self.observations[self.observations.len() - 1]
    }

    pub fn get(&self, date: YearMonth) -> Option<&RateObservation> {
        self.observations
            .binary_search_by(|o| o.date.cmp(&date))
            .ok()
            .map(|i| &self.observations[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &RateObservation> {
        self.observations.iter()
    }

    /// Fresh per-run copy that can be extended without touching the template
    pub fn working_copy(&self) -> WorkingSeries {
        WorkingSeries {
            observations: self.observations.clone(),
            seeded_len: self.observations.len(),
        }
    }
}

/// Per-forecast copy of the seed, extended one month per roll-forward step
#[derive(Debug, Clone)]
pub struct WorkingSeries {
    observations: Vec<RateObservation>,
    seeded_len: usize,
}

impl WorkingSeries {
    pub fn push(&mut self, observation: RateObservation) {
        self.observations.push(observation);
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Observations appended since the copy was taken
    pub fn forecast_len(&self) -> usize {
        self.observations.len() - self.seeded_len
    }

    pub fn last(&self) -> &RateObservation {
        &self.observations[self.observations.len() - 1]
    }

    /// Trailing `n` observations ending at the last entry
    pub fn last_n(&self, n: usize) -> &[RateObservation] {
        let len = self.observations.len();
        if n >= len {
            &self.observations[..]
        } else {
            &self.observations[len - n..]
        }
    }

    pub fn forecasts(&self) -> &[RateObservation] {
        &self.observations[self.seeded_len..]
    }
}

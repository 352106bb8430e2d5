use anyhow::{anyhow, Result};
use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar month, the only granularity the forecaster works at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Returns None unless 1 <= month <= 12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self { year: date.year(), month: date.month() }
    }

    /// Current calendar month in UTC
    pub fn current() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// Signed distance in months: positive when `other` is later
    pub fn months_until(&self, other: YearMonth) -> i64 {
        12 * (other.year as i64 - self.year as i64) + (other.month as i64 - self.month as i64)
    }

    pub fn add_months(&self, n: u32) -> Self {
        let total = self.year as i64 * 12 + (self.month as i64 - 1) + n as i64;
        Self {
            year: total.div_euclid(12) as i32,
            month: (total.rem_euclid(12) + 1) as u32,
        }
    }

    /// Inclusive month range; empty when `to` precedes `self`
    pub fn range_inclusive(&self, to: YearMonth) -> Vec<YearMonth> {
        let mut months = Vec::new();
        let mut current = *self;
        while current <= to {
            months.push(current);
            current = current.next();
        }
        months
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow!("Invalid month format (expected YYYY-MM): {}", s))?;
        let year: i32 = year.parse()?;
        let month: u32 = month.parse()?;
        Self::new(year, month).ok_or_else(|| anyhow!("Month out of range in {}", s))
    }
}

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::error::ForecastError;
use super::forecast::ForecastEngine;
use super::results::{round2, to_decimal};
use crate::ml::ReturnPredictor;
use crate::types::{Country, YearMonth};

/// Rate and converted budget for one month of the plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthQuote {
    pub month: String,
    pub rate: Decimal,
    pub foreign_amount: Decimal,
    pub is_historical: bool,
}

/// What a KRW budget buys on the travel month, and the cheapest month to exchange
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetPlan {
    pub country: Country,
    pub currency: String,
    pub budget_krw: Decimal,
    pub travel: MonthQuote,
    pub best: MonthQuote,
    pub months_considered: usize,
}

/// Quotes every month in `from..=to` and picks the lowest rate (earliest on ties)
pub fn plan_budget<P: ReturnPredictor>(
    engine: &ForecastEngine<P>,
    from: YearMonth,
    to: YearMonth,
    country: Country,
    budget_krw: Decimal,
) -> Result<BudgetPlan, ForecastError> {
    if from > to {
        return Err(ForecastError::InvalidRange { from, to });
    }
    if budget_krw <= Decimal::ZERO {
        return Err(ForecastError::InvalidBudget(budget_krw.to_string()));
    }

    let mut quotes: Vec<(f64, MonthQuote)> = Vec::new();
    for month in from.range_inclusive(to) {
        let forecast = engine.forecast(month, country)?;
        let rate = to_decimal(forecast.raw_rate)?;
        let foreign_amount = budget_krw
            .checked_div(rate)
            .and_then(|units| units.checked_mul(country.units_per_quote()))
            .ok_or_else(|| ForecastError::Internal(format!("cannot convert budget at rate {} for {}", rate, month)))?
            .round_dp(2);
        quotes.push((
            forecast.raw_rate,
            MonthQuote {
                month: month.to_string(),
                rate: round2(forecast.raw_rate)?,
                foreign_amount,
                is_historical: forecast.is_historical,
            },
        ));
    }

    let mut best = &quotes[0];
    for quote in &quotes[1..] {
        if quote.0 < best.0 {
            best = quote;
        }
    }
    let best = best.1.clone();
    let travel = quotes[quotes.len() - 1].1.clone();

    info!(
        "Budget plan {}..{} {}: travel rate {}, best month {} at {}",
        from, to, country, travel.rate, best.month, best.rate
    );

    Ok(BudgetPlan {
        country,
        currency: country.currency_label().to_string(),
        budget_krw,
        travel,
        best,
        months_considered: quotes.len(),
    })
}

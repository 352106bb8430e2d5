pub mod error;
pub mod forecast;
pub mod planner;
pub mod policy;
pub mod results;

pub use forecast::ForecastEngine;
pub use planner::{plan_budget, BudgetPlan};
pub use results::ForecastResponse;

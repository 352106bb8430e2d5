mod config;
mod data;
mod engine;
mod ml;
mod types;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use config::{load_config, render_config, ForecasterConfig};
use engine::{plan_budget, BudgetPlan, ForecastEngine, ForecastResponse};
use types::{Country, YearMonth};

#[derive(Parser)]
#[command(name = "fx-forecaster")]
#[command(version = "0.1.0")]
#[command(about = "Monthly KRW exchange-rate forecaster for USD and JPY", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rate for one month: the recorded rate if known, a model forecast otherwise
    Predict {
        /// Target year (e.g. 2026)
        #[arg(short, long)]
        year: i32,
        /// Target month (1-12)
        #[arg(short, long)]
        month: i32,
        /// Destination country (us, japan)
        #[arg(long, default_value = "us")]
        country: String,
        /// Print the raw response as JSON
        #[arg(long)]
        json: bool,
    },
    /// Convert a KRW travel budget and find the cheapest month to exchange
    Plan {
        /// First month to consider (YYYY-MM, defaults to the current month)
        #[arg(long)]
        from: Option<String>,
        /// Travel month (YYYY-MM)
        #[arg(long)]
        to: String,
        /// Destination country (us, japan)
        #[arg(long, default_value = "us")]
        country: String,
        /// Budget in KRW
        #[arg(long)]
        budget: Decimal,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Forecast every month up to the horizon cap
    Horizon {
        /// Destination country (us, japan)
        #[arg(long, default_value = "us")]
        country: String,
    },
    /// Show the built-in historical series
    Seed,
    /// Show the effective configuration
    Config,
    /// Run the reference requests (2026-01 US, 2026-01 Japan, 2025-12 US)
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_logging(&cli, &config)?;

    info!("FX Forecaster v{}", env!("CARGO_PKG_VERSION"));

    // model artifacts are only needed by commands that forecast
    let load_engine = || ForecastEngine::from_config(&config);

    match cli.command {
        Commands::Predict { year, month, country, json } => {
            let engine = load_engine()?;
            let response = engine.predict_exchange_rate(year, month, &country);
            print_response(&response, json)?;
        }
        Commands::Plan { from, to, country, budget, json } => {
            let engine = load_engine()?;
            run_plan(&engine, from.as_deref(), &to, &country, budget, json)?;
        }
        Commands::Horizon { country } => {
            let engine = load_engine()?;
            run_horizon(&engine, &country).await?;
        }
        Commands::Seed => {
            show_seed(&load_engine()?);
        }
        Commands::Config => {
            println!("{}", render_config(&config)?);
        }
        Commands::Demo => {
            let engine = load_engine()?;
            for (year, month, country) in [(2026, 1, "us"), (2026, 1, "japan"), (2025, 12, "us")] {
                let response = engine.predict_exchange_rate(year, month, country);
                print_response(&response, false)?;
            }
        }
    }

    Ok(())
}

fn init_logging(cli: &Cli, config: &ForecasterConfig) -> Result<()> {
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::from_str(&config.logging.level).map_err(|e| anyhow!("Invalid log level: {}", e))?
    };

    if cli.json_logs {
        let subscriber = FmtSubscriber::builder()
            .json()
            .with_max_level(log_level)
            .with_target(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}

fn print_response(response: &ForecastResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    let forecast = match (&response.forecast, &response.error) {
        (Some(forecast), _) => forecast,
        (None, Some(err)) => {
            error!("{}", err);
            return Ok(());
        }
        (None, None) => return Err(anyhow!("Response carries neither a forecast nor an error")),
    };

    println!("\n=== {} {}-{:02} ===", forecast.currency, forecast.year, forecast.month);
    println!("Rate: {} KRW", forecast.predicted_rate);
    if let Some(projection) = &forecast.projection {
        println!("Latest: {} KRW ({})", projection.latest_rate, projection.latest_date);
        println!(
            "Change: {}% {} over {} months",
            projection.change_rate,
            projection.change_direction.as_str(),
            projection.months_ahead
        );
    }
    println!("Note: {}", forecast.note);
    Ok(())
}

fn run_plan(
    engine: &ForecastEngine,
    from: Option<&str>,
    to: &str,
    country: &str,
    budget: Decimal,
    json: bool,
) -> Result<()> {
    let country = Country::from_str(country).map_err(|c| anyhow!("Unsupported country: {}", c))?;
    let from = match from {
        Some(s) => YearMonth::from_str(s)?,
        None => YearMonth::current(),
    };
    let to = YearMonth::from_str(to)?;

    let plan = plan_budget(engine, from, to, country, budget)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print_plan(&plan);
    }
    Ok(())
}

fn print_plan(plan: &BudgetPlan) {
    println!("\n=== Budget Plan: {} KRW → {} ===", plan.budget_krw, plan.currency);
    println!(
        "Travel month {}: {} KRW → {} {}",
        plan.travel.month, plan.travel.rate, plan.travel.foreign_amount, plan.currency
    );
    println!(
        "Best month {}: {} KRW → {} {}",
        plan.best.month, plan.best.rate, plan.best.foreign_amount, plan.currency
    );
    println!("Months considered: {}", plan.months_considered);
}

async fn run_horizon(engine: &ForecastEngine, country: &str) -> Result<()> {
    let country = Country::from_str(country).map_err(|c| anyhow!("Unsupported country: {}", c))?;

    println!(
        "\n=== {} forecast horizon: {} months from {} ===",
        country.currency_label(),
        engine.horizon_cap(),
        engine.latest_month()
    );

    for (month, result) in engine.forecast_horizon(country).await {
        match result {
            Ok(forecast) => {
                let (change, direction) = forecast
                    .projection
                    .as_ref()
                    .map(|p| (p.change_rate, p.change_direction.as_str()))
                    .unwrap_or((Decimal::ZERO, "-"));
                println!("{}: {} KRW | {}% {}", month, forecast.predicted_rate, change, direction);
            }
            Err(e) => {
                error!("Forecast for {} failed: {}", month, e);
            }
        }
    }

    Ok(())
}

fn show_seed(engine: &ForecastEngine) {
    println!("\n=== Seed Series ({} months) ===", engine.seed().len());
    for obs in engine.seed().iter() {
        println!(
            "{}: USD {:.2} ({:+.4}%) | JPY(100) {:.2} ({:+.4}%)",
            obs.date,
            obs.level_primary,
            obs.return_primary * 100.0,
            obs.level_secondary,
            obs.return_secondary * 100.0
        );
    }
}

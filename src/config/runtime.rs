use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Months of history the model consumes per prediction
pub const LOOKBACK_MONTHS: usize = 24;

/// Maximum roll-forward steps per request
pub const DEFAULT_HORIZON_CAP_MONTHS: u32 = 12;

/// Share of the predicted USD return applied to JPY. An approximation, not a
/// separately modelled currency.
pub const DEFAULT_CORRELATION_FACTOR: f64 = 0.8;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecasterConfig {
    pub artifacts: ArtifactPaths,
    pub forecast: ForecastSettings,
    pub logging: LoggingSettings,
}

impl ForecasterConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.forecast.horizon_cap_months == 0 || self.forecast.horizon_cap_months > 120 {
            errors.push("forecast.horizon_cap_months must be between 1 and 120".to_string());
        }
        let factor = self.forecast.correlation_factor;
        if !factor.is_finite() || factor <= 0.0 || factor > 2.0 {
            errors.push("forecast.correlation_factor must be in (0, 2]".to_string());
        }
        if self.forecast.lookback == 0 {
            errors.push("forecast.lookback must be > 0".to_string());
        }

        for (name, path) in [
            ("artifacts.model", &self.artifacts.model),
            ("artifacts.input_scaler", &self.artifacts.input_scaler),
            ("artifacts.output_scaler", &self.artifacts.output_scaler),
        ] {
            if path.as_os_str().is_empty() {
                errors.push(format!("{} must not be empty", name));
            }
        }

        if tracing::Level::from_str(&self.logging.level).is_err() {
            errors.push(format!("logging.level '{}' is not a valid level", self.logging.level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Read-only artifacts produced by offline training
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub input_scaler: PathBuf,
    pub output_scaler: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from("models/fx_lstm_attention.json"),
            input_scaler: PathBuf::from("models/scaler_x.json"),
            output_scaler: PathBuf::from("models/scaler_y.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    pub horizon_cap_months: u32,
    pub correlation_factor: f64,
    pub lookback: usize,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            horizon_cap_months: DEFAULT_HORIZON_CAP_MONTHS,
            correlation_factor: DEFAULT_CORRELATION_FACTOR,
            lookback: LOOKBACK_MONTHS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

use anyhow::{anyhow, Context, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_feature_range() -> [f64; 2] {
    [0.0, 1.0]
}

/// Pre-fitted min-max scaler, loaded read-only from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScaler {
    data_min: Vec<f64>,
    data_max: Vec<f64>,
    #[serde(default = "default_feature_range")]
    feature_range: [f64; 2],
}

impl MinMaxScaler {
    pub fn new(data_min: Vec<f64>, data_max: Vec<f64>) -> Result<Self> {
        let scaler = Self { data_min, data_max, feature_range: default_feature_range() };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scaler file {}", path.display()))?;
        let scaler: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse scaler file {}", path.display()))?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<()> {
        if self.data_min.is_empty() || self.data_min.len() != self.data_max.len() {
            return Err(anyhow!(
                "Scaler min/max length mismatch: {} vs {}",
                self.data_min.len(),
                self.data_max.len()
            ));
        }
        if self.data_min.iter().chain(&self.data_max).chain(&self.feature_range).any(|v| !v.is_finite()) {
            return Err(anyhow!("Scaler parameters must be finite"));
        }
        if self.feature_range[0] >= self.feature_range[1] {
            return Err(anyhow!("Invalid feature range {:?}", self.feature_range));
        }
        Ok(())
    }

    pub fn n_features(&self) -> usize {
        self.data_min.len()
    }

    /// Zero-width fitted ranges scale by 1, like the fitting side does
    fn data_range(&self, j: usize) -> f64 {
        let range = self.data_max[j] - self.data_min[j];
        if range == 0.0 { 1.0 } else { range }
    }

    /// No clamping: values outside the fitted range extrapolate linearly
    pub fn transform_value(&self, j: usize, value: f64) -> f64 {
        let [lo, hi] = self.feature_range;
        (value - self.data_min[j]) / self.data_range(j) * (hi - lo) + lo
    }

    pub fn inverse_transform_value(&self, j: usize, scaled: f64) -> f64 {
        let [lo, hi] = self.feature_range;
        (scaled - lo) / (hi - lo) * self.data_range(j) + self.data_min[j]
    }
}

/// Input and output transforms fitted at training time
#[derive(Debug, Clone)]
pub struct Normalizer {
    input: MinMaxScaler,
    output: MinMaxScaler,
}

impl Normalizer {
    pub const INPUT_FEATURES: usize = 2;

    pub fn new(input: MinMaxScaler, output: MinMaxScaler) -> Result<Self> {
        if input.n_features() != Self::INPUT_FEATURES {
            return Err(anyhow!(
                "Input scaler must cover {} features, found {}",
                Self::INPUT_FEATURES,
                input.n_features()
            ));
        }
        if output.n_features() != 1 {
            return Err(anyhow!("Output scaler must cover 1 feature, found {}", output.n_features()));
        }
        Ok(Self { input, output })
    }

    pub fn load(input_path: impl AsRef<Path>, output_path: impl AsRef<Path>) -> Result<Self> {
        let input = MinMaxScaler::load(input_path)?;
        let output = MinMaxScaler::load(output_path)?;
        Self::new(input, output)
    }

    /// Maps a window of (primary, secondary) returns into model space
    pub fn normalize_input(&self, window: &[[f64; 2]]) -> Array2<f64> {
        Array2::from_shape_fn((window.len(), Self::INPUT_FEATURES), |(t, j)| {
            self.input.transform_value(j, window[t][j])
        })
    }

    pub fn denormalize_output(&self, scaled: f64) -> f64 {
        self.output.inverse_transform_value(0, scaled)
    }
}

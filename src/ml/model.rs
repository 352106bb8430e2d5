use anyhow::{anyhow, Context, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::attention::AttentionPooling;
use super::dense::{Activation, DenseLayer};
use super::lstm::LstmEncoder;

/// Anything that maps a normalized `[lookback, 2]` return window to one
/// normalized primary-currency return.
#[cfg_attr(test, mockall::automock)]
pub trait ReturnPredictor: Send + Sync {
    fn lookback(&self) -> usize;

    fn predict(&self, window: &Array2<f64>) -> Result<f64>;
}

/// On-disk model weights (JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub lookback: usize,
    pub n_features: usize,
    pub lstm: LstmWeights,
    pub attention: AttentionWeights,
    pub dense: Vec<DenseWeights>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LstmWeights {
    pub units: usize,
    pub kernel: Vec<Vec<f64>>,
    pub recurrent_kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttentionWeights {
    pub weight: Vec<f64>,
    /// One bias per time step
    pub bias: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseWeights {
    pub kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

fn to_array2(rows: &[Vec<f64>], name: &str) -> Result<Array2<f64>> {
    let n_rows = rows.len();
    let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
    if rows.iter().any(|r| r.len() != n_cols) {
        return Err(anyhow!("{} has ragged rows", name));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    if flat.iter().any(|v| !v.is_finite()) {
        return Err(anyhow!("{} contains non-finite values", name));
    }
    Ok(Array2::from_shape_vec((n_rows, n_cols), flat)?)
}

fn to_array1(values: &[f64], name: &str) -> Result<Array1<f64>> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(anyhow!("{} contains non-finite values", name));
    }
    Ok(Array1::from(values.to_vec()))
}

/// Fixed-weight LSTM → attention pooling → dense head
#[derive(Debug, Clone)]
pub struct SequenceModel {
    lookback: usize,
    n_features: usize,
    encoder: LstmEncoder,
    attention: AttentionPooling,
    head: Vec<DenseLayer>,
}

impl SequenceModel {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file {}", path.display()))?;
        let file: ModelFile = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse model file {}", path.display()))?;
        let model = Self::from_file(file)
            .with_context(|| format!("Invalid model weights in {}", path.display()))?;

        info!(
            "Loaded sequence model: lookback={}, features={}, lstm_units={}, dense_layers={}",
            model.lookback,
            model.n_features,
            model.encoder.units(),
            model.head.len()
        );
        Ok(model)
    }

    pub fn from_file(file: ModelFile) -> Result<Self> {
        if file.lookback == 0 || file.n_features == 0 {
            return Err(anyhow!("lookback and n_features must be > 0"));
        }

        let encoder = LstmEncoder::new(
            to_array2(&file.lstm.kernel, "lstm.kernel")?,
            to_array2(&file.lstm.recurrent_kernel, "lstm.recurrent_kernel")?,
            to_array1(&file.lstm.bias, "lstm.bias")?,
        )?;
        if encoder.units() != file.lstm.units {
            return Err(anyhow!("lstm.units is {} but weights have {} units", file.lstm.units, encoder.units()));
        }
        if encoder.input_size() != file.n_features {
            return Err(anyhow!(
                "lstm.kernel expects {} features, model declares {}",
                encoder.input_size(),
                file.n_features
            ));
        }

        if file.attention.weight.len() != encoder.units() {
            return Err(anyhow!(
                "attention.weight has {} entries for {} units",
                file.attention.weight.len(),
                encoder.units()
            ));
        }
        if file.attention.bias.len() != file.lookback {
            return Err(anyhow!(
                "attention.bias has {} entries for lookback {}",
                file.attention.bias.len(),
                file.lookback
            ));
        }
        let attention = AttentionPooling {
            weight: to_array1(&file.attention.weight, "attention.weight")?,
            bias: to_array1(&file.attention.bias, "attention.bias")?,
        };

        let mut head = Vec::with_capacity(file.dense.len());
        let mut width = encoder.units();
        for (i, layer) in file.dense.iter().enumerate() {
            let name = format!("dense[{}]", i);
            let dense = DenseLayer::new(
                to_array2(&layer.kernel, &name)?,
                to_array1(&layer.bias, &name)?,
                layer.activation,
            )?;
            if dense.input_size() != width {
                return Err(anyhow!("{} expects {} inputs, previous layer yields {}", name, dense.input_size(), width));
            }
            width = dense.output_size();
            head.push(dense);
        }
        if head.is_empty() || width != 1 {
            return Err(anyhow!("Dense head must end in a single output, got width {}", width));
        }

        Ok(Self {
            lookback: file.lookback,
            n_features: file.n_features,
            encoder,
            attention,
            head,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

impl ReturnPredictor for SequenceModel {
    fn lookback(&self) -> usize {
        self.lookback
    }

    fn predict(&self, window: &Array2<f64>) -> Result<f64> {
        if window.shape() != [self.lookback, self.n_features] {
            return Err(anyhow!(
                "Model expects a [{}, {}] window, got {:?}",
                self.lookback,
                self.n_features,
                window.shape()
            ));
        }

        let hidden = self.encoder.forward_sequence(window);
        let mut x = self.attention.forward(&hidden);
        for layer in &self.head {
            x = layer.forward(&x);
        }
        Ok(x[0])
    }
}

use anyhow::{anyhow, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Relu,
    Tanh,
    Linear,
}

impl Activation {
    fn apply(&self, x: f64) -> f64 {
        match self {
            Activation::Relu => x.max(0.0),
            Activation::Tanh => x.tanh(),
            Activation::Linear => x,
        }
    }
}

/// Fully connected layer, `y = act(x · kernel + bias)` with kernel `[in, out]`
#[derive(Debug, Clone)]
pub struct DenseLayer {
    kernel: Array2<f64>,
    bias: Array1<f64>,
    activation: Activation,
}

impl DenseLayer {
    pub fn new(kernel: Array2<f64>, bias: Array1<f64>, activation: Activation) -> Result<Self> {
        if kernel.ncols() != bias.len() {
            return Err(anyhow!(
                "Dense bias has {} entries for {} outputs",
                bias.len(),
                kernel.ncols()
            ));
        }
        Ok(Self { kernel, bias, activation })
    }

    pub fn input_size(&self) -> usize {
        self.kernel.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.kernel.ncols()
    }

    pub fn forward(&self, x: &Array1<f64>) -> Array1<f64> {
        let activation = self.activation;
        (x.dot(&self.kernel) + &self.bias).mapv(|v| activation.apply(v))
    }
}

//! Learned soft-pooling over the time axis.
//!
//! For hidden states `H` with shape `[T, U]`:
//! `score_t = tanh(H_t · w + b_t)`, `α = softmax(score)`, `context = Σ_t α_t H_t`.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Numerically stable softmax over a vector
pub fn softmax(scores: &Array1<f64>) -> Array1<f64> {
    let max_val = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exp = scores.mapv(|v| (v - max_val).exp());
    let sum = exp.sum();
    exp / sum
}

/// Pools `hidden` ([T, U]) into one context vector ([U]).
///
/// `weight` has one entry per hidden unit and `bias` one entry per time step.
/// Returns the context vector and the attention weights over time.
pub fn attention_pool(
    hidden: ArrayView2<f64>,
    weight: ArrayView1<f64>,
    bias: ArrayView1<f64>,
) -> (Array1<f64>, Array1<f64>) {
    let scores = (hidden.dot(&weight) + &bias).mapv(f64::tanh);
    let alpha = softmax(&scores);

    // Σ_t α_t · H_t
    let weighted = &hidden * &alpha.view().insert_axis(Axis(1));
    let context = weighted.sum_axis(Axis(0));

    (context, alpha)
}

/// Attention parameters as loaded from the model file
#[derive(Debug, Clone)]
pub struct AttentionPooling {
    pub weight: Array1<f64>,
    pub bias: Array1<f64>,
}

impl AttentionPooling {
    pub fn forward(&self, hidden: &Array2<f64>) -> Array1<f64> {
        attention_pool(hidden.view(), self.weight.view(), self.bias.view()).0
    }
}

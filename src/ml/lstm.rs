use anyhow::{anyhow, Result};
use ndarray::{s, Array1, Array2};

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Single-layer LSTM encoder with fixed weights.
///
/// Weights use the fused layout exported by Keras: `kernel` is
/// `[input_size, 4 * units]`, `recurrent_kernel` is `[units, 4 * units]` and
/// `bias` is `[4 * units]`, gates ordered input, forget, cell candidate, output.
#[derive(Debug, Clone)]
pub struct LstmEncoder {
    units: usize,
    kernel: Array2<f64>,
    recurrent_kernel: Array2<f64>,
    bias: Array1<f64>,
}

impl LstmEncoder {
    pub fn new(kernel: Array2<f64>, recurrent_kernel: Array2<f64>, bias: Array1<f64>) -> Result<Self> {
        let units = recurrent_kernel.nrows();
        if units == 0 {
            return Err(anyhow!("LSTM must have at least one unit"));
        }
        if recurrent_kernel.ncols() != 4 * units {
            return Err(anyhow!(
                "recurrent_kernel must be [{}, {}], got {:?}",
                units,
                4 * units,
                recurrent_kernel.shape()
            ));
        }
        if kernel.ncols() != 4 * units {
            return Err(anyhow!("kernel must have {} columns, got {}", 4 * units, kernel.ncols()));
        }
        if bias.len() != 4 * units {
            return Err(anyhow!("LSTM bias must have {} entries, got {}", 4 * units, bias.len()));
        }
        Ok(Self { units, kernel, recurrent_kernel, bias })
    }

    pub fn units(&self) -> usize {
        self.units
    }

    pub fn input_size(&self) -> usize {
        self.kernel.nrows()
    }

    /// One time step: returns (h_next, c_next)
    fn step(&self, x: &Array1<f64>, h_prev: &Array1<f64>, c_prev: &Array1<f64>) -> (Array1<f64>, Array1<f64>) {
        let u = self.units;
        let z = x.dot(&self.kernel) + h_prev.dot(&self.recurrent_kernel) + &self.bias;

        let i_gate = z.slice(s![0..u]).mapv(sigmoid);
        let f_gate = z.slice(s![u..2 * u]).mapv(sigmoid);
        let g = z.slice(s![2 * u..3 * u]).mapv(f64::tanh);
        let o_gate = z.slice(s![3 * u..4 * u]).mapv(sigmoid);

        let c_next = &f_gate * c_prev + &i_gate * &g;
        let h_next = &o_gate * &c_next.mapv(f64::tanh);
        (h_next, c_next)
    }

    /// Runs the whole window ([T, input_size]) and returns every hidden state ([T, units])
    pub fn forward_sequence(&self, inputs: &Array2<f64>) -> Array2<f64> {
        let seq_len = inputs.nrows();
        let mut hidden_states = Array2::zeros((seq_len, self.units));
        let mut h = Array1::zeros(self.units);
        let mut c = Array1::zeros(self.units);

        for t in 0..seq_len {
            let x = inputs.row(t).to_owned();
            let (h_next, c_next) = self.step(&x, &h, &c);
            hidden_states.row_mut(t).assign(&h_next);
            h = h_next;
            c = c_next;
        }

        hidden_states
    }
}

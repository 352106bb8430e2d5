use crate::config::DEFAULT_CORRELATION_FACTOR;

/// How the secondary (JPY) level follows the primary (USD) prediction.
///
/// There is no JPY model: each step applies the predicted USD return scaled
/// by a fixed correlation factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondaryCurrencyPolicy {
    pub correlation_factor: f64,
}

impl SecondaryCurrencyPolicy {
    pub fn new(correlation_factor: f64) -> Self {
        Self { correlation_factor }
    }

    pub fn secondary_return(&self, primary_return: f64) -> f64 {
        primary_return * self.correlation_factor
    }
}

impl Default for SecondaryCurrencyPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CORRELATION_FACTOR)
    }
}

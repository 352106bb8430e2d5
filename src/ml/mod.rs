#![allow(dead_code)]

pub mod attention;
pub mod dense;
pub mod lstm;
pub mod model;
pub mod normalizer;

pub use model::{ReturnPredictor, SequenceModel};
pub use normalizer::Normalizer;

#[cfg(test)]
pub use model::MockReturnPredictor;

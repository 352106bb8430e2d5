pub mod seed;

pub use seed::{SeedSeries, WorkingSeries};

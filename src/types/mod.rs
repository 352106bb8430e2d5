pub mod month;
pub mod currency;
pub mod observation;

pub use month::*;
pub use currency::*;
pub use observation::*;

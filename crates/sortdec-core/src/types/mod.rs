mod decimal;

pub use decimal::*;

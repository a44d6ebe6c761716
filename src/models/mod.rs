//! Forecasting models conforming to the [`Forecaster`](crate::forecaster::Forecaster) capability set.

mod autoreg;

pub use autoreg::AutoregLinear;

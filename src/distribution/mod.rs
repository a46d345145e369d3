//! Probability distributions fitted to accumulated precipitation.

pub mod gamma;

pub use gamma::GammaFit;

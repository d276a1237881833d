//! Model serving internals: artifact loading, feature encoding, forest
//! inference and risk bucketing, composed by [`predictor::ChurnPredictor`].

pub mod artifacts;
pub mod encoder;
pub mod forest;
pub mod predictor;
pub mod risk;

#[cfg(test)]
pub mod testutil;

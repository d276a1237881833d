//! Data models

pub mod customer;
pub mod metrics;
pub mod prediction;

pub use customer::*;
pub use metrics::*;
pub use prediction::*;

//! HTTP handlers

pub mod model_info;
pub mod predict;
pub mod service;
pub mod stats;

#[cfg(test)]
mod tests;

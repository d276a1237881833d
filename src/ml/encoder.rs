//! Feature encoding
//!
//! Turns a validated customer profile into the standardized numeric vector
//! the model consumes: categorical fields go through the exported label
//! encoder tables, fields are arranged in the training column order, and the
//! result is passed through the standard scaler.

use thiserror::Error;
use tracing::{debug, warn};

use crate::ml::artifacts::ArtifactStore;
use crate::models::customer::{CustomerRecord, FieldValue};

/// Code used when a category was never seen during training. Zero collides
/// with a real category in every table, so hitting this path skews the
/// prediction; request validation keeps it out of the normal flow.
pub const UNKNOWN_CATEGORY_CODE: f64 = 0.0;

#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    #[error("no encoder table for field {0}")]
    MissingEncoder(&'static str),
}

/// A standardized feature vector, ready for the forest.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<f64>> for FeatureVector {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// Encode and standardize one profile against the loaded artifacts.
pub fn encode(
    record: &CustomerRecord,
    artifacts: &ArtifactStore,
) -> Result<FeatureVector, EncodeError> {
    let fields = record.fields();
    let mut by_name = Vec::with_capacity(fields.len());
    for (name, value) in fields {
        let encoded = match value {
            FieldValue::Numeric(v) => v,
            FieldValue::Categorical(label) => {
                let table = artifacts
                    .encoder(name)
                    .ok_or(EncodeError::MissingEncoder(name))?;
                match table.get(label) {
                    Some(code) => *code,
                    None => {
                        warn!(field = name, category = label, "unseen category, using fallback code");
                        UNKNOWN_CATEGORY_CODE
                    }
                }
            }
        };
        by_name.push((name, encoded));
    }

    let raw: Vec<f64> = artifacts
        .feature_names
        .iter()
        .map(|feature| {
            match by_name.iter().find(|(name, _)| *name == feature.as_str()) {
                Some((_, encoded)) => *encoded,
                None => {
                    debug!(%feature, "feature absent from profile, filling zero");
                    0.0
                }
            }
        })
        .collect();

    Ok(FeatureVector(artifacts.scaler.transform(&raw)))
}

//! Model artifact loading
//!
//! The training pipeline exports four JSON files into the model directory:
//! `model.json` (the tree ensemble), `scaler.json` (feature standardization
//! parameters), `feature_names.json` (column order the model was trained on)
//! and `label_encoders.json` (category-to-code tables). All four are read
//! once at startup and cross-checked against each other; the process refuses
//! to start with an inconsistent set.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use ndarray::{aview1, Array1};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::ml::forest::Forest;

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";
pub const ENCODERS_FILE: &str = "label_encoders.json";

/// Category-to-code tables keyed by field name, then by category label.
pub type EncoderTables = BTreeMap<String, BTreeMap<String, f64>>;

/// Standardization parameters from the training run: `(x - mean) / scale`
/// per feature position.
#[derive(Debug, Clone, Deserialize)]
pub struct Scaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl Scaler {
    pub fn len(&self) -> usize {
        self.mean.len()
    }

    fn validate(&self) -> Result<(), String> {
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if let Some(i) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(format!("mean[{i}] is not finite"));
        }
        if let Some(i) = self
            .scale
            .iter()
            .position(|s| !s.is_finite() || *s == 0.0)
        {
            return Err(format!("scale[{i}] must be finite and non-zero"));
        }
        Ok(())
    }

    /// Standardize a raw feature vector. The caller guarantees the length
    /// matches; load-time checks tie the scaler to the feature list.
    pub fn transform(&self, raw: &[f64]) -> Vec<f64> {
        let mut scaled = Array1::from_vec(raw.to_vec());
        scaled -= &aview1(&self.mean);
        scaled /= &aview1(&self.scale);
        scaled.to_vec()
    }
}

/// Everything the serving path needs from the training run, loaded once and
/// shared read-only behind the application state.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    pub forest: Forest,
    pub scaler: Scaler,
    pub feature_names: Vec<String>,
    pub encoders: EncoderTables,
}

impl ArtifactStore {
    /// Read and cross-validate the artifact set under `dir`.
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let forest: Forest = read_json(&dir.join(MODEL_FILE))?;
        let scaler: Scaler = read_json(&dir.join(SCALER_FILE))?;
        let feature_names: Vec<String> = read_json(&dir.join(FEATURE_NAMES_FILE))?;
        let encoders: EncoderTables = read_json(&dir.join(ENCODERS_FILE))?;

        if let Err(reason) = forest.validate() {
            bail!("{MODEL_FILE}: {reason}");
        }
        if let Err(reason) = scaler.validate() {
            bail!("{SCALER_FILE}: {reason}");
        }
        if forest.n_features != feature_names.len() {
            bail!(
                "model expects {} features but {FEATURE_NAMES_FILE} lists {}",
                forest.n_features,
                feature_names.len()
            );
        }
        if scaler.len() != feature_names.len() {
            bail!(
                "scaler covers {} features but {FEATURE_NAMES_FILE} lists {}",
                scaler.len(),
                feature_names.len()
            );
        }
        for (field, table) in &encoders {
            if table.is_empty() {
                bail!("{ENCODERS_FILE}: encoder for {field} has no categories");
            }
        }

        Ok(Self {
            forest,
            scaler,
            feature_names,
            encoders,
        })
    }

    pub fn n_features(&self) -> usize {
        self.forest.n_features
    }

    pub fn encoder(&self, field: &str) -> Option<&BTreeMap<String, f64>> {
        self.encoders.get(field)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let bytes =
        fs::read(path).with_context(|| format!("reading model artifact {}", path.display()))?;
    serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing model artifact {}", path.display()))
}

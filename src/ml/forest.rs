//! Random forest evaluation
//!
//! Runs the tree ensemble exported by the offline training run. Inner nodes
//! route `x[feature] <= threshold` to the left child; leaves carry the
//! training-time class distribution. The ensemble probability is the average
//! of per-tree normalized leaf distributions (soft voting), which matches
//! what the training framework reports, so serving stays consistent with the
//! offline evaluation figures.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("feature vector has {got} values, model expects {expected}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("malformed model: {0}")]
    MalformedModel(String),
}

/// One node of a decision tree, as serialized in `model.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class weights `[negative, positive]` observed at this leaf.
        value: [f64; 2],
    },
}

/// A single decision tree stored as a node array rooted at index 0.
#[derive(Debug, Clone, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Walk from the root to a leaf and return its class distribution.
    fn leaf_value(&self, features: &[f64]) -> Result<&[f64; 2], InferenceError> {
        let mut index = 0;
        loop {
            let node = self.nodes.get(index).ok_or_else(|| {
                InferenceError::MalformedModel(format!("node index {index} out of range"))
            })?;
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let value = features.get(*feature).ok_or_else(|| {
                        InferenceError::MalformedModel(format!(
                            "split references feature {feature} beyond vector length"
                        ))
                    })?;
                    index = if *value <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { value } => return Ok(value),
            }
        }
    }
}

/// The deserialized `model.json`: ensemble metadata plus the trees.
#[derive(Debug, Clone, Deserialize)]
pub struct Forest {
    pub model_type: String,
    pub version: String,
    pub n_features: usize,
    pub n_classes: usize,
    pub trees: Vec<Tree>,
}

impl Forest {
    /// Structural checks run once at load time. Split children must point
    /// forward in the node array, which also rules out traversal cycles.
    pub fn validate(&self) -> Result<(), String> {
        if self.n_classes != 2 {
            return Err(format!("expected a binary classifier, got {} classes", self.n_classes));
        }
        if self.trees.is_empty() {
            return Err("ensemble contains no trees".to_string());
        }
        for (t, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(format!("tree {t} has no nodes"));
            }
            for (i, node) in tree.nodes.iter().enumerate() {
                match node {
                    TreeNode::Split {
                        feature,
                        threshold,
                        left,
                        right,
                    } => {
                        if *feature >= self.n_features {
                            return Err(format!(
                                "tree {t} node {i} splits on feature {feature}, model has {}",
                                self.n_features
                            ));
                        }
                        if !threshold.is_finite() {
                            return Err(format!("tree {t} node {i} has a non-finite threshold"));
                        }
                        if *left >= tree.nodes.len() || *right >= tree.nodes.len() {
                            return Err(format!("tree {t} node {i} has a child out of range"));
                        }
                        if *left <= i || *right <= i {
                            return Err(format!("tree {t} node {i} has a backward child link"));
                        }
                    }
                    TreeNode::Leaf { value } => {
                        let total = value[0] + value[1];
                        if !total.is_finite() || total <= 0.0 || value[0] < 0.0 || value[1] < 0.0 {
                            return Err(format!("tree {t} node {i} has an invalid leaf distribution"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Probability of the positive class for one feature vector.
    pub fn predict_proba(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.n_features {
            return Err(InferenceError::DimensionMismatch {
                expected: self.n_features,
                got: features.len(),
            });
        }
        let mut positive = 0.0;
        for tree in &self.trees {
            let value = tree.leaf_value(features)?;
            let total = value[0] + value[1];
            if total <= 0.0 {
                return Err(InferenceError::MalformedModel(
                    "leaf distribution sums to zero".to_string(),
                ));
            }
            positive += value[1] / total;
        }
        Ok(positive / self.trees.len() as f64)
    }

    /// Label and positive-class probability derived from one ensemble pass.
    /// The label is the rounded probability, as the training framework's
    /// `predict` reports it.
    pub fn predict(&self, features: &[f64]) -> Result<(u8, f64), InferenceError> {
        let probability = self.predict_proba(features)?;
        let label = if probability >= 0.5 { 1 } else { 0 };
        Ok((label, probability))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(feature: usize, threshold: f64, left_value: [f64; 2], right_value: [f64; 2]) -> Tree {
        Tree {
            nodes: vec![
                TreeNode::Split {
                    feature,
                    threshold,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: left_value },
                TreeNode::Leaf { value: right_value },
            ],
        }
    }

    fn forest(trees: Vec<Tree>, n_features: usize) -> Forest {
        Forest {
            model_type: "RandomForestClassifier".to_string(),
            version: "1.0".to_string(),
            n_features,
            n_classes: 2,
            trees,
        }
    }

    #[test]
    fn routes_on_threshold() {
        let f = forest(vec![stump(0, 0.5, [8.0, 2.0], [1.0, 9.0])], 1);
        assert!((f.predict_proba(&[0.0]).unwrap() - 0.2).abs() < 1e-12);
        assert!((f.predict_proba(&[1.0]).unwrap() - 0.9).abs() < 1e-12);
        // boundary value goes left
        assert!((f.predict_proba(&[0.5]).unwrap() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn averages_across_trees() {
        let f = forest(
            vec![
                stump(0, 0.5, [10.0, 0.0], [0.0, 10.0]),
                stump(1, 0.5, [5.0, 5.0], [2.0, 8.0]),
            ],
            2,
        );
        // left/left: (0.0 + 0.5) / 2
        assert!((f.predict_proba(&[0.0, 0.0]).unwrap() - 0.25).abs() < 1e-12);
        // right/right: (1.0 + 0.8) / 2
        assert!((f.predict_proba(&[1.0, 1.0]).unwrap() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn label_matches_rounded_probability() {
        let f = forest(vec![stump(0, 0.5, [6.0, 4.0], [4.0, 6.0])], 1);
        let (label, p) = f.predict(&[0.0]).unwrap();
        assert_eq!(label, 0);
        assert!(p < 0.5);
        let (label, p) = f.predict(&[1.0]).unwrap();
        assert_eq!(label, 1);
        assert!(p >= 0.5);
    }

    #[test]
    fn rejects_wrong_dimensionality() {
        let f = forest(vec![stump(0, 0.5, [1.0, 1.0], [1.0, 1.0])], 3);
        let err = f.predict_proba(&[0.0]).unwrap_err();
        assert!(matches!(
            err,
            InferenceError::DimensionMismatch { expected: 3, got: 1 }
        ));
    }

    #[test]
    fn validate_accepts_well_formed_ensemble() {
        let f = forest(vec![stump(0, 0.5, [3.0, 1.0], [1.0, 3.0])], 1);
        assert!(f.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_feature() {
        let f = forest(vec![stump(7, 0.5, [1.0, 1.0], [1.0, 1.0])], 2);
        assert!(f.validate().unwrap_err().contains("feature 7"));
    }

    #[test]
    fn validate_rejects_backward_child_links() {
        let cyclic = Tree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 0.0,
                    left: 0,
                    right: 1,
                },
                TreeNode::Leaf { value: [1.0, 1.0] },
            ],
        };
        let f = forest(vec![cyclic], 1);
        assert!(f.validate().unwrap_err().contains("backward"));
    }

    #[test]
    fn validate_rejects_empty_ensemble() {
        let f = forest(vec![], 1);
        assert!(f.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_sum_leaf() {
        let f = forest(vec![stump(0, 0.5, [0.0, 0.0], [1.0, 1.0])], 1);
        assert!(f.validate().unwrap_err().contains("leaf"));
    }

    #[test]
    fn deserializes_node_shapes() {
        let json = serde_json::json!({
            "model_type": "RandomForestClassifier",
            "version": "1.0",
            "n_features": 2,
            "n_classes": 2,
            "trees": [
                { "nodes": [
                    { "feature": 1, "threshold": 0.25, "left": 1, "right": 2 },
                    { "value": [12.0, 3.0] },
                    { "value": [2.0, 14.0] }
                ]}
            ]
        });
        let f: Forest = serde_json::from_value(json).unwrap();
        assert!(f.validate().is_ok());
        assert!((f.predict_proba(&[0.0, 0.0]).unwrap() - 0.2).abs() < 1e-12);
        assert!((f.predict_proba(&[0.0, 0.3]).unwrap() - 0.875).abs() < 1e-12);
    }
}

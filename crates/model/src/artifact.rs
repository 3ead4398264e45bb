//! Persisted model artifact: preprocessing statistics plus the boosted
//! tree ensemble.
//!
//! The artifact is produced by the offline training pipeline and stored as
//! JSON. It carries everything inference needs: per-feature
//! standardization statistics for the numeric block, the fitted one-hot
//! category list for `location`, and the gradient-boosted regression
//! trees. Loading validates the artifact against the canonical schema so
//! a bad deployment fails at startup, not per request.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::schema::FeatureSchema;

/// Per-feature standardization statistics for the numeric block, in
/// schema order (every field except `location`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerStats {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl ScalerStats {
    /// Standardize one numeric feature. A degenerate (near-zero) standard
    /// deviation maps everything to 0.0, matching the training transform.
    #[inline]
    pub fn transform(&self, index: usize, value: f64) -> f64 {
        if self.std[index] > 1e-12 {
            (value - self.mean[index]) / self.std[index]
        } else {
            0.0
        }
    }
}

/// One node of a regression tree.
///
/// Interior nodes route `x[feature] < threshold` to `left`, else `right`.
/// A node with `left < 0` is a leaf carrying `value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeNode {
    pub feature: i32,
    pub threshold: f64,
    pub left: i32,
    pub right: i32,
    pub value: f64,
}

impl TreeNode {
    #[inline]
    fn is_leaf(&self) -> bool {
        self.left < 0
    }

    /// Leaf constructor, for tests and the trainer export format.
    pub fn leaf(value: f64) -> Self {
        Self {
            feature: -1,
            threshold: 0.0,
            left: -1,
            right: -1,
            value,
        }
    }

    /// Interior-node constructor.
    pub fn split(feature: i32, threshold: f64, left: i32, right: i32) -> Self {
        Self {
            feature,
            threshold,
            left,
            right,
            value: 0.0,
        }
    }
}

/// A single regression tree as a flat node array, root at index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Walk the tree for one dense input row and return the leaf value.
    ///
    /// Indices are trusted here; [`ModelArtifact::validate`] guarantees at
    /// load time that every child pointer stays in bounds and points
    /// forward, so the walk terminates.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            let node = &self.nodes[idx];
            if node.is_leaf() {
                return node.value;
            }
            idx = if x[node.feature as usize] < node.threshold {
                node.left as usize
            } else {
                node.right as usize
            };
        }
    }
}

/// The complete persisted model: scaler, encoder categories, ensemble.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: u32,
    pub scaler: ScalerStats,
    /// Fitted one-hot categories for `location`, lower-cased. An unseen
    /// location encodes as all-zeros (the encoder's ignore-unknown policy).
    pub locations: Vec<String>,
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl ModelArtifact {
    /// Load and validate an artifact from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model artifact {}", path.display()))?;
        let artifact: ModelArtifact = serde_json::from_str(&data)
            .with_context(|| format!("malformed model artifact {}", path.display()))?;
        artifact.validate(FeatureSchema::canonical())?;
        Ok(artifact)
    }

    /// Save the artifact to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)
            .with_context(|| format!("failed to write model artifact {}", path.display()))?;
        Ok(())
    }

    /// Dimension of the dense input vector the trees expect:
    /// the scaled numeric block followed by the one-hot location block.
    pub fn input_dim(&self) -> usize {
        self.scaler.mean.len() + self.locations.len()
    }

    /// Check the artifact against the schema it must serve.
    pub fn validate(&self, schema: &FeatureSchema) -> Result<()> {
        ensure!(
            self.scaler.mean.len() == schema.numeric_len(),
            "scaler mean has {} entries, schema declares {} numeric fields",
            self.scaler.mean.len(),
            schema.numeric_len()
        );
        ensure!(
            self.scaler.std.len() == schema.numeric_len(),
            "scaler std has {} entries, schema declares {} numeric fields",
            self.scaler.std.len(),
            schema.numeric_len()
        );
        ensure!(!self.trees.is_empty(), "artifact contains no trees");

        let input_dim = self.input_dim();
        for (t, tree) in self.trees.iter().enumerate() {
            ensure!(!tree.nodes.is_empty(), "tree {t} has no nodes");
            for (i, node) in tree.nodes.iter().enumerate() {
                if node.is_leaf() {
                    continue;
                }
                ensure!(
                    (0..input_dim as i32).contains(&node.feature),
                    "tree {t} node {i} references feature {} outside input dimension {input_dim}",
                    node.feature
                );
                for child in [node.left, node.right] {
                    ensure!(
                        child > i as i32 && (child as usize) < tree.nodes.len(),
                        "tree {t} node {i} has out-of-order child index {child}"
                    );
                }
            }
        }
        Ok(())
    }

    /// Evaluate the ensemble on a dense input row.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        self.base_score + self.trees.iter().map(|t| t.evaluate(x)).sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal valid artifact: one tree splitting on the first feature.
    fn tiny_artifact() -> ModelArtifact {
        let schema = FeatureSchema::canonical();
        ModelArtifact {
            version: 1,
            scaler: ScalerStats {
                mean: vec![0.0; schema.numeric_len()],
                std: vec![1.0; schema.numeric_len()],
            },
            locations: vec!["bangalore".into(), "hyderabad".into()],
            base_score: 100.0,
            trees: vec![Tree {
                nodes: vec![
                    TreeNode::split(0, 1000.0, 1, 2),
                    TreeNode::leaf(-10.0),
                    TreeNode::leaf(25.0),
                ],
            }],
        }
    }

    #[test]
    fn test_tree_routing() {
        let artifact = tiny_artifact();
        let dim = artifact.input_dim();

        let mut small = vec![0.0; dim];
        small[0] = 500.0;
        assert_eq!(artifact.evaluate(&small), 90.0);

        let mut large = vec![0.0; dim];
        large[0] = 2000.0;
        assert_eq!(artifact.evaluate(&large), 125.0);
    }

    #[test]
    fn test_multiple_trees_sum() {
        let mut artifact = tiny_artifact();
        artifact.trees.push(Tree {
            nodes: vec![TreeNode::leaf(7.5)],
        });
        let x = vec![0.0; artifact.input_dim()];
        assert_eq!(artifact.evaluate(&x), 100.0 - 10.0 + 7.5);
    }

    #[test]
    fn test_scaler_transform() {
        let stats = ScalerStats {
            mean: vec![10.0, 5.0],
            std: vec![2.0, 0.0],
        };
        assert_eq!(stats.transform(0, 14.0), 2.0);
        // Degenerate std maps to 0.0 rather than dividing by zero.
        assert_eq!(stats.transform(1, 999.0), 0.0);
    }

    #[test]
    fn test_validate_accepts_tiny_artifact() {
        tiny_artifact().validate(FeatureSchema::canonical()).unwrap();
    }

    #[test]
    fn test_validate_rejects_wrong_scaler_arity() {
        let mut artifact = tiny_artifact();
        artifact.scaler.mean.pop();
        let err = artifact
            .validate(FeatureSchema::canonical())
            .unwrap_err()
            .to_string();
        assert!(err.contains("scaler mean"), "got: {err}");
    }

    #[test]
    fn test_validate_rejects_feature_out_of_range() {
        let mut artifact = tiny_artifact();
        artifact.trees[0].nodes[0].feature = artifact.input_dim() as i32;
        assert!(artifact.validate(FeatureSchema::canonical()).is_err());
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let mut artifact = tiny_artifact();
        // A child pointing at the root would loop forever.
        artifact.trees[0].nodes[0].left = 0;
        assert!(artifact.validate(FeatureSchema::canonical()).is_err());
    }

    #[test]
    fn test_validate_rejects_empty_ensemble() {
        let mut artifact = tiny_artifact();
        artifact.trees.clear();
        assert!(artifact.validate(FeatureSchema::canonical()).is_err());
    }

    #[test]
    fn test_save_load_round_trip() {
        let artifact = tiny_artifact();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pricing.json");
        artifact.save(&path).unwrap();

        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded.version, artifact.version);
        assert_eq!(loaded.locations, artifact.locations);
        assert_eq!(loaded.trees.len(), artifact.trees.len());

        let x = vec![0.0; artifact.input_dim()];
        assert_eq!(loaded.evaluate(&x), artifact.evaluate(&x));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(ModelArtifact::load(&path).is_err());
    }
}

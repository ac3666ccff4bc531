//! Regression tree ensembles (random forests, gradient boosting)

use crate::error::ModelError;
use crate::models::regressor::{check_feature_count, Regressor};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// A node of a binary regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Rows with `x[feature] <= threshold` go to `left`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// A single tree stored as a flat node array, root at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

fn malformed(tree: usize, reason: String) -> ModelError {
    ModelError::MalformedTree { tree, reason }
}

impl RegressionTree {
    /// Walk from the root to a leaf. `tree` is this tree's position in
    /// its ensemble, used in errors.
    ///
    /// A walk longer than the node count means the tree has a cycle.
    pub fn evaluate(&self, tree: usize, row: &[f64]) -> Result<f64, ModelError> {
        let mut index = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = row.get(*feature).ok_or_else(|| {
                        malformed(tree, format!("feature index {} out of range", feature))
                    })?;
                    index = if *x <= *threshold { *left } else { *right };
                }
                None => return Err(malformed(tree, format!("node index {} out of range", index))),
            }
        }
        Err(malformed(tree, "no leaf reached".to_string()))
    }

    fn validate(&self, tree: usize, n_features: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(malformed(tree, "tree has no nodes".to_string()));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } = node
            {
                let reason = if *feature >= n_features {
                    format!("node {} splits on feature {}", i, feature)
                } else if !threshold.is_finite() {
                    format!("node {} has a non-finite threshold", i)
                } else if *left >= self.nodes.len() || *right >= self.nodes.len() {
                    format!("node {} points outside the tree", i)
                } else if *left <= i || *right <= i {
                    format!("node {} points backwards", i)
                } else {
                    continue;
                };
                return Err(malformed(tree, reason));
            }
        }
        Ok(())
    }
}

/// How tree outputs are combined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Aggregation {
    /// Mean of all trees (random forest)
    Average,
    /// `base_score + learning_rate * Σ tree` (gradient boosting)
    Boosted {
        #[serde(default)]
        base_score: f64,
        #[serde(default = "default_learning_rate")]
        learning_rate: f64,
    },
}

fn default_learning_rate() -> f64 {
    0.1
}

/// Ensemble of regression trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub n_features: usize,
    pub aggregation: Aggregation,
    pub trees: Vec<RegressionTree>,
}

impl TreeEnsemble {
    /// Check tree structure once at load
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            bail!("tree ensemble has no trees");
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.n_features)?;
        }
        Ok(())
    }
}

impl Regressor for TreeEnsemble {
    fn name(&self) -> &str {
        match self.aggregation {
            Aggregation::Average => "RandomForestRegressor",
            Aggregation::Boosted { .. } => "GradientBoostingRegressor",
        }
    }

    fn n_features(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict(&self, row: &[f64]) -> Result<f64, ModelError> {
        check_feature_count(self, row)?;
        if self.trees.is_empty() {
            return Err(ModelError::EmptyOutput);
        }

        let mut sum = 0.0;
        for (i, tree) in self.trees.iter().enumerate() {
            sum += tree.evaluate(i, row)?;
        }

        Ok(match self.aggregation {
            Aggregation::Average => sum / self.trees.len() as f64,
            Aggregation::Boosted {
                base_score,
                learning_rate,
            } => base_score + learning_rate * sum,
        })
    }
}

//! Regression model evaluator
//!
//! The trained model ships as a gradient-boosted decision tree ensemble.
//! Evaluation walks each tree iteratively and sums the leaf values plus
//! a base bias. No randomness and no mutable state: identical features
//! always score identically.

use crate::errors::{PipelineError, Result};
use crate::features::{FeatureVector, FEATURE_COUNT};
use serde::{Deserialize, Serialize};

/// A decision tree node (internal or leaf)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    /// Feature index to compare (for internal nodes)
    pub feature_index: u16,
    /// Threshold value for comparison
    pub threshold: f64,
    /// Index of left child node
    pub left: u32,
    /// Index of right child node
    pub right: u32,
    /// Leaf value (None for internal nodes)
    pub value: Option<f64>,
}

/// A single decision tree
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

/// The trained yield regressor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YieldModel {
    /// Base bias added to all predictions
    pub bias: f64,
    /// Decision trees in the ensemble
    pub trees: Vec<Tree>,
}

impl YieldModel {
    /// Score a feature vector, returning the raw (unclamped) prediction.
    pub fn score(&self, features: &FeatureVector) -> Result<f64> {
        let mut sum = self.bias;
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            sum += eval_tree(tree, tree_idx, features)?;
        }
        Ok(sum)
    }

    /// Structural validation, run once at artifact load.
    pub fn validate(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(PipelineError::InvalidArtifact(
                "model has no trees".to_string(),
            ));
        }

        for (tree_idx, tree) in self.trees.iter().enumerate() {
            if tree.nodes.is_empty() {
                return Err(PipelineError::InvalidArtifact(format!(
                    "tree {tree_idx} has no nodes"
                )));
            }

            for (node_idx, node) in tree.nodes.iter().enumerate() {
                if node.value.is_some() {
                    continue;
                }
                if node.left as usize >= tree.nodes.len()
                    || node.right as usize >= tree.nodes.len()
                {
                    return Err(PipelineError::InvalidArtifact(format!(
                        "node {node_idx} in tree {tree_idx} has a child index out of range"
                    )));
                }
                if usize::from(node.feature_index) >= FEATURE_COUNT {
                    return Err(PipelineError::InvalidArtifact(format!(
                        "node {node_idx} in tree {tree_idx} has invalid feature index {}",
                        node.feature_index
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Walk one tree down to a leaf.
///
/// Index errors are reported as processing failures rather than panics;
/// a validated artifact never hits them, but a request must not be able
/// to take the process down.
fn eval_tree(tree: &Tree, tree_idx: usize, features: &FeatureVector) -> Result<f64> {
    let mut idx = 0usize;
    // A strictly descending walk visits each node at most once.
    for _ in 0..=tree.nodes.len() {
        let node = tree.nodes.get(idx).ok_or_else(|| {
            PipelineError::Processing(format!(
                "tree {tree_idx}: node index {idx} out of range"
            ))
        })?;

        if let Some(value) = node.value {
            return Ok(value);
        }

        let feature = features
            .get(usize::from(node.feature_index))
            .copied()
            .ok_or_else(|| {
                PipelineError::Processing(format!(
                    "tree {tree_idx}: feature index {} out of range",
                    node.feature_index
                ))
            })?;

        idx = if feature <= node.threshold {
            node.left as usize
        } else {
            node.right as usize
        };
    }

    Err(PipelineError::Processing(format!(
        "tree {tree_idx}: walk did not reach a leaf"
    )))
}

//! Random forest of axis-aligned decision trees.
//!
//! Trees are stored as flat node arrays; node 0 is the root and children
//! always come after their parent, so traversal cannot loop.

use crate::error::CuacaError;
use crate::model::{ClassLabel, Classifier, argmax, validate_rows};
use serde::{Deserialize, Serialize};

/// A tree node.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// `x[feature] <= threshold` continues at `left`, otherwise at `right`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Class counts (or weights) of the training samples reaching this leaf.
    Leaf { value: Vec<f64> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(
        &self,
        tree_idx: usize,
        n_features: usize,
        n_classes: usize,
    ) -> Result<(), CuacaError> {
        if self.nodes.is_empty() {
            return Err(CuacaError::model(format!("Tree {tree_idx} has no nodes")));
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(CuacaError::model(format!(
                            "Tree {tree_idx} node {i} splits on feature {feature}, model has {n_features}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(CuacaError::model(format!(
                            "Tree {tree_idx} node {i} has a non-finite threshold"
                        )));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(CuacaError::model(format!(
                                "Tree {tree_idx} node {i} points to invalid child {child}"
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.len() != n_classes {
                        return Err(CuacaError::model(format!(
                            "Tree {tree_idx} leaf {i} has {} values for {n_classes} classes",
                            value.len()
                        )));
                    }
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0)
                        || value.iter().sum::<f64>() <= 0.0
                    {
                        return Err(CuacaError::model(format!(
                            "Tree {tree_idx} leaf {i} has invalid class weights"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf `row` falls into.
    fn leaf_distribution(&self, row: &[f64]) -> Vec<f64> {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                TreeNode::Leaf { value } => {
                    let total: f64 = value.iter().sum();
                    return value.iter().map(|v| v / total).collect();
                }
            }
        }
    }
}

/// Averaged-probability ensemble of decision trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub feature_names: Vec<String>,
    pub classes: Vec<ClassLabel>,
    pub trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn validate(&self) -> Result<(), CuacaError> {
        if self.classes.len() < 2 {
            return Err(CuacaError::model("Random forest needs at least two classes"));
        }
        if self.trees.is_empty() {
            return Err(CuacaError::model("Random forest has no trees"));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(i, self.feature_names.len(), self.classes.len())?;
        }
        Ok(())
    }

    fn row_proba(&self, row: &[f64]) -> Vec<f64> {
        let mut acc = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (a, p) in acc.iter_mut().zip(tree.leaf_distribution(row)) {
                *a += p;
            }
        }
        let n = self.trees.len() as f64;
        acc.iter().map(|a| a / n).collect()
    }
}

impl Classifier for RandomForest {
    fn kind(&self) -> &str {
        "random_forest"
    }

    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<ClassLabel>, CuacaError> {
        let proba = self.predict_proba(rows)?;
        proba
            .iter()
            .map(|p| {
                argmax(p)
                    .map(|i| self.classes[i].clone())
                    .ok_or_else(|| CuacaError::model("Empty probability row"))
            })
            .collect()
    }

    fn supports_proba(&self) -> bool {
        true
    }

    fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, CuacaError> {
        validate_rows(rows, &self.feature_names)?;
        Ok(rows.iter().map(|row| self.row_proba(row)).collect())
    }

    fn classes(&self) -> Option<&[ClassLabel]> {
        Some(&self.classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(feature: usize, threshold: f64, left: usize, right: usize) -> TreeNode {
        TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    fn leaf(value: &[f64]) -> TreeNode {
        TreeNode::Leaf {
            value: value.to_vec(),
        }
    }

    /// Humidity above 75 means rain in the first tree; the second tree splits on temperature.
    fn forest() -> RandomForest {
        RandomForest {
            feature_names: vec!["Temp".into(), "Humidity".into()],
            classes: vec![ClassLabel::Code(0), ClassLabel::Code(1)],
            trees: vec![
                DecisionTree {
                    nodes: vec![split(1, 75.0, 1, 2), leaf(&[1.0, 9.0]), leaf(&[8.0, 2.0])],
                },
                DecisionTree {
                    nodes: vec![split(0, 29.0, 1, 2), leaf(&[6.0, 4.0]), leaf(&[0.0, 10.0])],
                },
            ],
        }
    }

    #[test]
    fn test_predict_proba_averages_trees() {
        let f = forest();
        f.validate().unwrap();
        let proba = f.predict_proba(&[vec![25.0, 90.0]]).unwrap();
        // tree 1: [0.8, 0.2], tree 2: [0.6, 0.4]
        assert!((proba[0][0] - 0.7).abs() < 1e-12);
        assert!((proba[0][1] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_predict_picks_most_probable_class() {
        let f = forest();
        assert_eq!(
            f.predict(&[vec![25.0, 90.0], vec![32.0, 60.0]]).unwrap(),
            vec![ClassLabel::Code(0), ClassLabel::Code(1)]
        );
    }

    #[test]
    fn test_threshold_is_inclusive_left() {
        let f = forest();
        // Humidity exactly 75 goes left (clear) in tree 1.
        let proba = f.predict_proba(&[vec![29.0, 75.0]]).unwrap();
        assert!((proba[0][1] - (0.9 + 0.4) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_nan_input_is_rejected() {
        let err = forest().predict(&[vec![f64::NAN, 80.0]]).unwrap_err();
        assert!(err.to_string().contains("Temp"));
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let mut f = forest();
        f.trees[0].nodes[0] = split(1, 75.0, 0, 2);
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_leaf_width_mismatch() {
        let mut f = forest();
        f.trees[1].nodes[2] = leaf(&[1.0]);
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_feature() {
        let mut f = forest();
        f.trees[1].nodes[0] = split(5, 29.0, 1, 2);
        assert!(f.validate().is_err());
    }
}

//! Opaque regression models and their JSON artifact format.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ModelError;

/// A trained model: a deterministic map from an ordered feature slice to a scalar
pub trait Predictor: Send + Sync {
    /// Number of features the model was trained on
    fn n_features(&self) -> usize;

    /// Column names the model was trained on, when the artifact records them
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// `features` must hold `n_features()` values in training order.
    /// Implementations return NaN rather than panic on a short slice.
    fn predict(&self, features: &[f64]) -> f64;
}

/// `intercept + coefficients · x`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    #[serde(default)]
    pub feature_names: Vec<String>,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

/// One node of a flattened regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Samples with `x[feature] <= threshold` go to `left`
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf(f64),
}

/// Mean of regression trees. Each tree is rooted at node 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    #[serde(default)]
    pub feature_names: Vec<String>,
    /// Used only when `feature_names` is empty
    #[serde(default)]
    pub n_features: usize,
    pub trees: Vec<Vec<TreeNode>>,
}

impl ForestModel {
    fn width(&self) -> usize {
        if self.feature_names.is_empty() {
            self.n_features
        } else {
            self.feature_names.len()
        }
    }

    /// NaN when the slice is too short or the tree is malformed or cyclic
    fn eval_tree(tree: &[TreeNode], features: &[f64]) -> f64 {
        let mut index = 0;
        // a walk visits each node at most once unless the tree has a cycle
        for _ in 0..tree.len() {
            match tree.get(index) {
                None => return f64::NAN,
                Some(TreeNode::Leaf(value)) => return *value,
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let Some(x) = features.get(*feature) else {
                        return f64::NAN;
                    };
                    index = if *x <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
        f64::NAN
    }
}

/// Serialized model as exported by the training pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    Forest(ForestModel),
}

impl ModelArtifact {
    /// Reads and validates an artifact from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ModelError> {
        let artifact: Self = serde_json::from_str(raw)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Checks the structural invariants `predict` relies on
    pub fn validate(&self) -> Result<(), ModelError> {
        match self {
            ModelArtifact::Linear(model) => {
                if model.coefficients.is_empty() {
                    return Err(ModelError::Invalid(
                        "linear model has no coefficients".to_string(),
                    ));
                }
                if !model.feature_names.is_empty()
                    && model.feature_names.len() != model.coefficients.len()
                {
                    return Err(ModelError::Invalid(format!(
                        "{} feature names but {} coefficients",
                        model.feature_names.len(),
                        model.coefficients.len()
                    )));
                }
            }
            ModelArtifact::Forest(model) => {
                let width = model.width();
                if width == 0 {
                    return Err(ModelError::Invalid(
                        "forest declares no features".to_string(),
                    ));
                }
                if model.trees.is_empty() {
                    return Err(ModelError::Invalid("forest has no trees".to_string()));
                }
                for (t, tree) in model.trees.iter().enumerate() {
                    if tree.is_empty() {
                        return Err(ModelError::Invalid(format!("tree {t} is empty")));
                    }
                    for (index, node) in tree.iter().enumerate() {
                        let TreeNode::Split {
                            feature,
                            left,
                            right,
                            ..
                        } = node
                        else {
                            continue;
                        };
                        if *feature >= width {
                            return Err(ModelError::Invalid(format!(
                                "tree {t} node {index} splits on feature {feature} of {width}"
                            )));
                        }
                        // children after parents guarantees every walk ends at a leaf
                        for child in [*left, *right] {
                            if child <= index || child >= tree.len() {
                                return Err(ModelError::Invalid(format!(
                                    "tree {t} node {index} has invalid child {child}"
                                )));
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl Predictor for ModelArtifact {
    fn n_features(&self) -> usize {
        match self {
            ModelArtifact::Linear(model) => model.coefficients.len(),
            ModelArtifact::Forest(model) => model.width(),
        }
    }

    fn feature_names(&self) -> Option<&[String]> {
        let names = match self {
            ModelArtifact::Linear(model) => &model.feature_names,
            ModelArtifact::Forest(model) => &model.feature_names,
        };
        (!names.is_empty()).then_some(names.as_slice())
    }

    fn predict(&self, features: &[f64]) -> f64 {
        match self {
            ModelArtifact::Linear(model) => {
                if features.len() < model.coefficients.len() {
                    return f64::NAN;
                }
                model.intercept
                    + model
                        .coefficients
                        .iter()
                        .zip(features)
                        .map(|(weight, x)| weight * x)
                        .sum::<f64>()
            }
            ModelArtifact::Forest(model) => {
                let total: f64 = model
                    .trees
                    .iter()
                    .map(|tree| ForestModel::eval_tree(tree, features))
                    .sum();
                total / model.trees.len() as f64
            }
        }
    }
}

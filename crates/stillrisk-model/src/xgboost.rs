//! Binding for gradient-boosted tree models saved in XGBoost's JSON format
//! (`Booster.save_model("model.json")`).
//!
//! Only the pieces needed for binary probability output are read:
//! the regression trees, `base_score`, `num_feature`, optional
//! `feature_names`, and the objective, which must be logistic.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::ModelError;
use crate::scorer::RiskModel;

#[derive(Debug, Deserialize)]
struct ModelFile {
    learner: Learner,
}

#[derive(Debug, Deserialize)]
struct Learner {
    #[serde(default)]
    feature_names: Vec<String>,
    learner_model_param: LearnerModelParam,
    gradient_booster: GradientBooster,
    objective: Objective,
}

#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    base_score: String,
    num_feature: String,
}

#[derive(Debug, Deserialize)]
struct GradientBooster {
    name: String,
    model: Option<GbTreeModel>,
}

#[derive(Debug, Deserialize)]
struct GbTreeModel {
    trees: Vec<TreeJson>,
}

#[derive(Debug, Deserialize)]
struct TreeJson {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f64>,
    #[serde(default)]
    default_left: Vec<FlagJson>,
}

/// `default_left` is written as integers by some XGBoost versions and as
/// booleans by others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FlagJson {
    Bool(bool),
    Int(i64),
}

impl FlagJson {
    fn is_set(&self) -> bool {
        match self {
            FlagJson::Bool(b) => *b,
            FlagJson::Int(n) => *n != 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Objective {
    name: String,
}

const LEAF: i64 = -1;

#[derive(Debug, Clone, Copy)]
enum Node {
    Split {
        feature: usize,
        /// Split conditions are single precision in the trained model.
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
    Leaf(f64),
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_json(index: usize, json: TreeJson, num_feature: usize) -> Result<Self, String> {
        let n = json.left_children.len();
        if n == 0
            || json.right_children.len() != n
            || json.split_indices.len() != n
            || json.split_conditions.len() != n
        {
            return Err(format!("tree {index}: node arrays have inconsistent lengths"));
        }

        let node_index = |child: i64| -> Result<usize, String> {
            usize::try_from(child)
                .ok()
                .filter(|c| *c < n)
                .ok_or_else(|| format!("tree {index}: child index {child} out of bounds"))
        };

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            if json.left_children[i] == LEAF {
                nodes.push(Node::Leaf(json.split_conditions[i]));
                continue;
            }

            let feature = usize::try_from(json.split_indices[i])
                .ok()
                .filter(|f| *f < num_feature)
                .ok_or_else(|| {
                    format!(
                        "tree {index}: split feature {} outside 0..{num_feature}",
                        json.split_indices[i]
                    )
                })?;

            nodes.push(Node::Split {
                feature,
                threshold: json.split_conditions[i] as f32,
                left: node_index(json.left_children[i])?,
                right: node_index(json.right_children[i])?,
                default_left: json.default_left.get(i).is_some_and(FlagJson::is_set),
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_value(&self, features: &[f64]) -> f64 {
        let mut current = 0;
        // A well-formed tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..=self.nodes.len() {
            match self.nodes[current] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let x = features[feature];
                    current = if x.is_nan() {
                        if default_left { left } else { right }
                    } else if (x as f32) < threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
        0.0
    }
}

/// A binary-logistic tree ensemble loaded from XGBoost JSON.
#[derive(Debug, Clone)]
pub struct XgbModel {
    trees: Vec<Tree>,
    base_margin: f64,
    num_feature: usize,
    feature_names: Option<Vec<String>>,
}

impl XgbModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ModelError::unavailable(path.display().to_string(), e))?;
        let model = Self::from_json(&bytes).map_err(|e| match e {
            ModelError::Unavailable { reason, .. } => {
                ModelError::unavailable(path.display().to_string(), reason)
            }
            other => other,
        })?;

        info!(
            path = %path.display(),
            trees = model.trees.len(),
            features = model.num_feature,
            "loaded trained model"
        );
        Ok(model)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, ModelError> {
        let file: ModelFile = serde_json::from_slice(bytes)
            .map_err(|e| ModelError::unavailable("<model>", format!("corrupt model: {e}")))?;
        let learner = file.learner;

        match learner.objective.name.as_str() {
            "binary:logistic" | "reg:logistic" => {}
            other => {
                return Err(ModelError::Unsupported(format!(
                    "objective '{other}' does not produce probabilities"
                )));
            }
        }
        if learner.gradient_booster.name != "gbtree" {
            return Err(ModelError::Unsupported(format!(
                "booster '{}'",
                learner.gradient_booster.name
            )));
        }

        let num_feature: usize = learner
            .learner_model_param
            .num_feature
            .trim()
            .parse()
            .map_err(|_| ModelError::unavailable("<model>", "num_feature is not an integer"))?;

        let base_score = parse_base_score(&learner.learner_model_param.base_score)
            .ok_or_else(|| ModelError::unavailable("<model>", "base_score is not a probability"))?;

        let trees = learner
            .gradient_booster
            .model
            .ok_or_else(|| ModelError::unavailable("<model>", "missing tree model"))?
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, t)| Tree::from_json(i, t, num_feature))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| ModelError::unavailable("<model>", reason))?;

        let feature_names = (!learner.feature_names.is_empty()).then_some(learner.feature_names);

        Ok(Self {
            trees,
            base_margin: logit(base_score),
            num_feature,
            feature_names,
        })
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Raw ensemble output before the sigmoid.
    pub fn margin(&self, features: &[f64]) -> f64 {
        self.base_margin + self.trees.iter().map(|t| t.leaf_value(features)).sum::<f64>()
    }
}

impl RiskModel for XgbModel {
    fn feature_count(&self) -> usize {
        self.num_feature
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ModelError> {
        if features.len() != self.num_feature {
            return Err(ModelError::FeatureMismatch(format!(
                "model expects {} features, got {}",
                self.num_feature,
                features.len()
            )));
        }
        let positive = sigmoid(self.margin(features));
        Ok([1.0 - positive, positive])
    }
}

/// `base_score` is stored as `"5E-1"` or, in newer releases, `"[5E-1]"`.
fn parse_base_score(raw: &str) -> Option<f64> {
    let value: f64 = raw
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
        .parse()
        .ok()?;
    (value > 0.0 && value < 1.0).then_some(value)
}

fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

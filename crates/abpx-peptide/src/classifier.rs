//! Pretrained binary classifier.
//!
//! The model ships as JSON: a random forest whose trees are stored as the
//! parallel node arrays tree-ensemble trainers export (`children_left`,
//! `children_right`, `feature`, `threshold`, `value`). A node is a leaf when
//! its left child is `-1`; otherwise samples with `x[feature] <= threshold`
//! go left.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PeptideError, Result};
use crate::features::{FeatureVector, FEATURE_COLUMNS, N_FEATURES};

/// Inference interface the prediction pipeline depends on.
pub trait Classifier: Send + Sync {
    /// Class label (0 or 1) per row.
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<u8>>;

    /// `[P(class 0), P(class 1)]` per row.
    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<Vec<[f64; 2]>>;

    fn info(&self) -> ModelInfo;
}

#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    pub kind: String,
    pub n_estimators: usize,
    pub features: Vec<String>,
}

const LEAF: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    /// Per-node class weights (counts or fractions), `[class 0, class 1]`.
    pub value: Vec<[f64; 2]>,
}

impl DecisionTree {
    fn check(&self, tree_idx: usize) -> Result<()> {
        let n = self.children_left.len();
        let bad = |msg: String| Err(PeptideError::ModelLoad(format!("tree {tree_idx}: {msg}")));

        if n == 0 {
            return bad("no nodes".into());
        }
        if [self.children_right.len(), self.feature.len(), self.threshold.len(), self.value.len()]
            .iter()
            .any(|len| *len != n)
        {
            return bad("node arrays differ in length".into());
        }

        for node in 0..n {
            let (left, right) = (self.children_left[node], self.children_right[node]);
            if left == LEAF {
                let [w0, w1] = self.value[node];
                if !(w0 >= 0.0 && w1 >= 0.0 && w0 + w1 > 0.0) {
                    return bad(format!("leaf {node} has no positive class weight"));
                }
                continue;
            }
            // Children must come after their parent, which also rules out cycles.
            for child in [left, right] {
                if child <= node as i64 || child >= n as i64 {
                    return bad(format!("node {node} has out-of-order child {child}"));
                }
            }
            let feature = self.feature[node];
            if feature < 0 || feature >= N_FEATURES as i64 {
                return bad(format!("node {node} splits on unknown feature {feature}"));
            }
        }
        Ok(())
    }

    /// Normalized class distribution of the leaf `row` falls into.
    fn leaf_proba(&self, row: &FeatureVector) -> [f64; 2] {
        let values = row.values();
        let mut node = 0usize;
        while self.children_left[node] != LEAF {
            let f = self.feature[node] as usize;
            node = if values[f] <= self.threshold[node] {
                self.children_left[node] as usize
            } else {
                self.children_right[node] as usize
            };
        }
        let [w0, w1] = self.value[node];
        let total = w0 + w1;
        [w0 / total, w1 / total]
    }
}

/// Random forest: probability is the mean of the trees' leaf distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestClassifier {
    /// Training column order; must match `FEATURE_COLUMNS` when present.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub trees: Vec<DecisionTree>,
}

impl ForestClassifier {
    /// Build from trees, validating their structure.
    pub fn new(trees: Vec<DecisionTree>) -> Result<Self> {
        let forest = Self { feature_names: None, trees };
        forest.check()?;
        Ok(forest)
    }

    /// Load a model artifact from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PeptideError::ModelLoad(format!("cannot read {}: {}", path.display(), e))
        })?;
        let forest = Self::from_json(&content)?;
        info!("Loaded random forest with {} trees from {}", forest.trees.len(), path.display());
        Ok(forest)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let forest: ForestClassifier = serde_json::from_str(content)
            .map_err(|e| PeptideError::ModelLoad(format!("malformed model JSON: {}", e)))?;
        forest.check()?;
        Ok(forest)
    }

    fn check(&self) -> Result<()> {
        if self.trees.is_empty() {
            return Err(PeptideError::ModelLoad("forest has no trees".into()));
        }
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_COLUMNS.iter().copied()) {
                return Err(PeptideError::ModelLoad(format!(
                    "model trained on columns {:?}, expected {:?}",
                    names, FEATURE_COLUMNS
                )));
            }
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.check(i)?;
        }
        Ok(())
    }
}

impl Classifier for ForestClassifier {
    fn predict(&self, rows: &[FeatureVector]) -> Result<Vec<u8>> {
        Ok(self
            .predict_proba(rows)?
            .into_iter()
            .map(|[p0, p1]| u8::from(p1 > p0))
            .collect())
    }

    fn predict_proba(&self, rows: &[FeatureVector]) -> Result<Vec<[f64; 2]>> {
        let n_trees = self.trees.len() as f64;
        Ok(rows
            .iter()
            .map(|row| {
                let [s0, s1] = self.trees.iter().fold([0.0, 0.0], |[a0, a1], tree| {
                    let [p0, p1] = tree.leaf_proba(row);
                    [a0 + p0, a1 + p1]
                });
                [s0 / n_trees, s1 / n_trees]
            })
            .collect())
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            kind: "random_forest".to_string(),
            n_estimators: self.trees.len(),
            features: FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Stump splitting on BTC_T (index 5) at `threshold`.
    fn stump(threshold: f64, left: [f64; 2], right: [f64; 2]) -> DecisionTree {
        DecisionTree {
            children_left: vec![1, -1, -1],
            children_right: vec![2, -1, -1],
            feature: vec![5, -2, -2],
            threshold: vec![threshold, -2.0, -2.0],
            value: vec![[0.0, 0.0], left, right],
        }
    }

    fn row_with_bonds(total: f64) -> FeatureVector {
        FeatureVector::new([0.0, 0.0, 0.0, 0.0, 0.0, total, 0.0, 0.0, 0.0])
    }

    #[test]
    fn test_single_tree_routes_on_threshold() {
        let forest = ForestClassifier::new(vec![stump(100.0, [8.0, 2.0], [1.0, 3.0])]).unwrap();
        let rows = [row_with_bonds(100.0), row_with_bonds(150.0)];

        let proba = forest.predict_proba(&rows).unwrap();
        assert_eq!(proba[0], [0.8, 0.2]); // equal to threshold goes left
        assert_eq!(proba[1], [0.25, 0.75]);
        assert_eq!(forest.predict(&rows).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = ForestClassifier::new(vec![
            stump(100.0, [1.0, 0.0], [0.0, 1.0]),
            stump(200.0, [1.0, 0.0], [0.0, 1.0]),
        ])
        .unwrap();
        let proba = forest.predict_proba(&[row_with_bonds(150.0)]).unwrap();
        assert_eq!(proba[0], [0.5, 0.5]);
        // Ties resolve to class 0
        assert_eq!(forest.predict(&[row_with_bonds(150.0)]).unwrap(), vec![0]);
    }

    #[test]
    fn test_rejects_malformed_trees() {
        let mut cyclic = stump(1.0, [1.0, 0.0], [0.0, 1.0]);
        cyclic.children_left[0] = 0;
        assert!(ForestClassifier::new(vec![cyclic]).is_err());

        let mut short = stump(1.0, [1.0, 0.0], [0.0, 1.0]);
        short.threshold.pop();
        assert!(ForestClassifier::new(vec![short]).is_err());

        let mut bad_feature = stump(1.0, [1.0, 0.0], [0.0, 1.0]);
        bad_feature.feature[0] = 9;
        assert!(ForestClassifier::new(vec![bad_feature]).is_err());

        assert!(ForestClassifier::new(vec![stump(1.0, [0.0, 0.0], [0.0, 1.0])]).is_err());
        assert!(ForestClassifier::new(vec![]).is_err());
    }

    #[test]
    fn test_feature_names_must_match_schema() {
        let json = r#"{
            "feature_names": ["BTC_T","ATC_C","ATC_H","ATC_N","ATC_O","ATC_S","BTC_H","BTC_S","BTC_D"],
            "trees": [{"children_left":[-1],"children_right":[-1],"feature":[-2],"threshold":[-2.0],"value":[[1.0,1.0]]}]
        }"#;
        assert!(matches!(ForestClassifier::from_json(json), Err(PeptideError::ModelLoad(_))));
    }

    #[test]
    fn test_load_from_file() {
        let forest = ForestClassifier::new(vec![stump(50.0, [3.0, 1.0], [1.0, 3.0])]).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&forest).unwrap()).unwrap();

        let loaded = ForestClassifier::load(file.path()).unwrap();
        assert_eq!(loaded.info().n_estimators, 1);
        assert_eq!(
            loaded.predict_proba(&[row_with_bonds(10.0)]).unwrap(),
            forest.predict_proba(&[row_with_bonds(10.0)]).unwrap()
        );
    }

    #[test]
    fn test_missing_file_is_model_load_error() {
        let err = ForestClassifier::load("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, PeptideError::ModelLoad(_)));
    }
}

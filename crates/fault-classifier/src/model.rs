//! Softmax Classifier Model

use crate::ClassifierError;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Current on-disk model format
const MODEL_VERSION: u32 = 1;

/// Numerically stable softmax in place
pub(crate) fn softmax(logits: &mut [f64]) {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for v in logits.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    if sum > 0.0 {
        for v in logits.iter_mut() {
            *v /= sum;
        }
    }
}

/// Multinomial logistic regression over standardized feature vectors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxClassifier {
    /// On-disk format version
    pub(crate) model_version: u32,
    /// Class names indexed by label
    pub(crate) classes: Vec<String>,
    /// Input dimension
    pub(crate) n_features: usize,
    /// Row-major `classes x n_features` weights
    pub(crate) weights: Vec<f64>,
    /// Per-class bias
    pub(crate) bias: Vec<f64>,
}

impl SoftmaxClassifier {
    /// Zero-initialized model
    pub fn new(classes: Vec<String>, n_features: usize) -> Self {
        let k = classes.len();
        Self {
            model_version: MODEL_VERSION,
            classes,
            n_features,
            weights: vec![0.0; k * n_features],
            bias: vec![0.0; k],
        }
    }

    /// Class names indexed by label
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Check the parameter shapes agree
    pub fn validate(&self) -> Result<(), ClassifierError> {
        if self.model_version != MODEL_VERSION {
            return Err(ClassifierError::Serialization(format!(
                "unsupported model version {}",
                self.model_version
            )));
        }
        if self.classes.is_empty() {
            return Err(ClassifierError::Serialization("model has no classes".into()));
        }
        let expected = self.classes.len() * self.n_features;
        if self.weights.len() != expected {
            return Err(ClassifierError::DimensionMismatch {
                expected,
                actual: self.weights.len(),
            });
        }
        if self.bias.len() != self.classes.len() {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.classes.len(),
                actual: self.bias.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn logits_into(&self, row: &[f64], out: &mut [f64]) {
        for (c, logit) in out.iter_mut().enumerate() {
            let w = &self.weights[c * self.n_features..(c + 1) * self.n_features];
            *logit = self.bias[c] + w.iter().zip(row).map(|(w, x)| w * x).sum::<f64>();
        }
    }

    /// Class probabilities of one feature row
    pub fn predict_proba_row(&self, row: &[f64]) -> Result<Vec<f64>, ClassifierError> {
        if row.len() != self.n_features {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.n_features,
                actual: row.len(),
            });
        }
        let mut probs = vec![0.0; self.classes.len()];
        self.logits_into(row, &mut probs);
        softmax(&mut probs);
        Ok(probs)
    }

    /// `(samples, classes)` probability matrix
    pub fn predict_proba(&self, x: ArrayView2<f64>) -> Result<Array2<f64>, ClassifierError> {
        if x.ncols() != self.n_features {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        let k = self.classes.len();
        let mut out = Array2::zeros((x.nrows(), k));
        let mut buf = vec![0.0; k];
        for (row, mut dst) in x.rows().into_iter().zip(out.rows_mut()) {
            let row = row.to_vec();
            self.logits_into(&row, &mut buf);
            softmax(&mut buf);
            for (d, p) in dst.iter_mut().zip(&buf) {
                *d = *p;
            }
        }
        Ok(out)
    }

    /// Most probable label of each row
    pub fn predict(&self, x: ArrayView2<f64>) -> Result<Vec<usize>, ClassifierError> {
        let probs = self.predict_proba(x)?;
        Ok(probs.rows().into_iter().map(|p| argmax(p.iter())).collect())
    }

    /// Persist as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ClassifierError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ClassifierError::Serialization(e.to_string()))?;
        fs::write(path, json)?;
        info!("Model saved to {}", path.display());
        Ok(())
    }

    /// Load a model written by [`SoftmaxClassifier::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClassifierError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let model: Self = serde_json::from_str(&json)
            .map_err(|e| ClassifierError::Serialization(e.to_string()))?;
        model.validate()?;
        info!(
            "Model loaded from {} ({} classes, {} features)",
            path.display(),
            model.classes.len(),
            model.n_features
        );
        Ok(model)
    }
}

/// Index of the largest value; first one wins ties
pub(crate) fn argmax<'a>(values: impl Iterator<Item = &'a f64>) -> usize {
    let mut best = 0;
    let mut best_value = f64::NEG_INFINITY;
    for (i, &v) in values.enumerate() {
        if v > best_value {
            best = i;
            best_value = v;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_class() -> SoftmaxClassifier {
        let mut model = SoftmaxClassifier::new(vec!["a".into(), "b".into()], 2);
        // class b scores feature 0, class a scores feature 1
        model.weights = vec![0.0, 1.0, 1.0, 0.0];
        model
    }

    #[test]
    fn test_softmax_sums_to_one() {
        let mut logits = vec![1000.0, 1001.0, 999.0];
        softmax(&mut logits);
        assert!((logits.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(logits[1] > logits[0] && logits[0] > logits[2]);
    }

    #[test]
    fn test_predict() {
        let model = two_class();
        let x = array![[5.0, 0.0], [0.0, 5.0]];
        assert_eq!(model.predict(x.view()).unwrap(), vec![1, 0]);

        let probs = model.predict_proba(x.view()).unwrap();
        for row in probs.rows() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }
        let single = model.predict_proba_row(&[5.0, 0.0]).unwrap();
        assert_eq!(single, probs.row(0).to_vec());
    }

    #[test]
    fn test_zero_model_is_uniform() {
        let model = SoftmaxClassifier::new(vec!["a".into(), "b".into(), "c".into(), "d".into()], 3);
        let probs = model.predict_proba_row(&[1.0, -2.0, 3.0]).unwrap();
        assert!(probs.iter().all(|p| (p - 0.25).abs() < 1e-12));
    }

    #[test]
    fn test_dimension_mismatch() {
        let model = two_class();
        assert!(matches!(
            model.predict(array![[1.0, 2.0, 3.0]].view()),
            Err(ClassifierError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fault_classifier.json");
        let model = two_class();
        model.save(&path).unwrap();
        assert_eq!(SoftmaxClassifier::load(&path).unwrap(), model);
    }

    #[test]
    fn test_load_rejects_bad_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        let mut model = two_class();
        model.bias.pop();
        model.save(&path).unwrap();
        assert!(matches!(
            SoftmaxClassifier::load(&path),
            Err(ClassifierError::DimensionMismatch { .. })
        ));
    }
}

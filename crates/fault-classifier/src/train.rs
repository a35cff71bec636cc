//! Mini-batch Training

use crate::model::{argmax, softmax, SoftmaxClassifier};
use crate::ClassifierError;
use ndarray::ArrayView2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Training options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainOptions {
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub l2: f64,
    pub seed: u64,
    /// Fraction of the training rows held out for validation each epoch
    pub validation_split: f64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            epochs: 50,
            batch_size: 32,
            learning_rate: 0.1,
            l2: 1e-4,
            seed: 42,
            validation_split: 0.2,
        }
    }
}

impl TrainOptions {
    fn validate(&self) -> Result<(), ClassifierError> {
        if self.epochs == 0 || self.batch_size == 0 {
            return Err(ClassifierError::InvalidOptions(
                "epochs and batch_size must be positive".into(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ClassifierError::InvalidOptions(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if !(self.l2.is_finite() && self.l2 >= 0.0) {
            return Err(ClassifierError::InvalidOptions(format!(
                "l2 must be non-negative, got {}",
                self.l2
            )));
        }
        if !(0.0..1.0).contains(&self.validation_split) {
            return Err(ClassifierError::InvalidOptions(format!(
                "validation_split must be in [0, 1), got {}",
                self.validation_split
            )));
        }
        Ok(())
    }
}

/// Loss and accuracy after one epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub loss: f64,
    pub accuracy: f64,
    pub val_loss: Option<f64>,
    pub val_accuracy: Option<f64>,
}

/// Per-epoch training curve
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    pub epochs: Vec<EpochMetrics>,
}

impl TrainingHistory {
    /// Metrics of the last epoch
    pub fn last(&self) -> Option<&EpochMetrics> {
        self.epochs.last()
    }
}

/// Mean cross-entropy and accuracy of `model` over `rows`
fn evaluate(
    model: &SoftmaxClassifier,
    x: ArrayView2<f64>,
    y: &[usize],
    rows: &[usize],
) -> (f64, f64) {
    if rows.is_empty() {
        return (0.0, 0.0);
    }
    let mut probs = vec![0.0; model.n_classes()];
    let mut loss = 0.0;
    let mut correct = 0usize;
    for &i in rows {
        let row = x.row(i).to_vec();
        model.logits_into(&row, &mut probs);
        softmax(&mut probs);
        loss -= probs[y[i]].max(f64::MIN_POSITIVE).ln();
        if argmax(probs.iter()) == y[i] {
            correct += 1;
        }
    }
    let n = rows.len() as f64;
    (loss / n, correct as f64 / n)
}

/// Fit a softmax classifier on `x` (rows are samples) with labels `y`.
///
/// Labels index `classes`. The validation rows are drawn once from a seeded
/// permutation and never used for gradient steps.
pub fn train(
    x: ArrayView2<f64>,
    y: &[usize],
    classes: &[String],
    options: &TrainOptions,
) -> Result<(SoftmaxClassifier, TrainingHistory), ClassifierError> {
    options.validate()?;
    let (n, dim) = x.dim();
    if n == 0 || dim == 0 {
        return Err(ClassifierError::EmptyTrainingSet);
    }
    if y.len() != n {
        return Err(ClassifierError::LabelCountMismatch {
            samples: n,
            labels: y.len(),
        });
    }
    let k = classes.len();
    if let Some(&label) = y.iter().find(|&&label| label >= k) {
        return Err(ClassifierError::UnknownLabel { label, classes: k });
    }

    let mut rng = ChaCha8Rng::seed_from_u64(options.seed);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut rng);
    let n_train = ((n as f64) * (1.0 - options.validation_split)) as usize;
    if n_train == 0 {
        return Err(ClassifierError::EmptyTrainingSet);
    }
    let validation = indices.split_off(n_train);
    let mut train_rows = indices;
    train_rows.sort_unstable();

    let mut model = SoftmaxClassifier::new(classes.to_vec(), dim);
    for w in &mut model.weights {
        *w = (rng.gen::<f64>() - 0.5) * 0.01;
    }

    info!(
        "Training softmax classifier: {} train / {} validation rows, {} features, {} classes",
        train_rows.len(),
        validation.len(),
        dim,
        k
    );

    let lr = options.learning_rate;
    let mut history = TrainingHistory::default();
    let mut probs = vec![0.0; k];
    let mut grad_w = vec![0.0; k * dim];
    let mut grad_b = vec![0.0; k];

    for epoch in 0..options.epochs {
        train_rows.shuffle(&mut rng);
        for chunk in train_rows.chunks(options.batch_size) {
            grad_w.fill(0.0);
            grad_b.fill(0.0);
            for &i in chunk {
                let row = x.row(i).to_vec();
                model.logits_into(&row, &mut probs);
                softmax(&mut probs);
                for c in 0..k {
                    let diff = probs[c] - if c == y[i] { 1.0 } else { 0.0 };
                    let base = c * dim;
                    for (g, v) in grad_w[base..base + dim].iter_mut().zip(&row) {
                        *g += diff * v;
                    }
                    grad_b[c] += diff;
                }
            }
            let inv = 1.0 / chunk.len() as f64;
            for (w, g) in model.weights.iter_mut().zip(&grad_w) {
                *w -= lr * (g * inv + options.l2 * *w);
            }
            for (b, g) in model.bias.iter_mut().zip(&grad_b) {
                *b -= lr * g * inv;
            }
        }

        let (loss, accuracy) = evaluate(&model, x, y, &train_rows);
        let (val_loss, val_accuracy) = if validation.is_empty() {
            (None, None)
        } else {
            let (l, a) = evaluate(&model, x, y, &validation);
            (Some(l), Some(a))
        };
        debug!(
            "Epoch {}/{}: loss={:.4} accuracy={:.4}",
            epoch + 1,
            options.epochs,
            loss,
            accuracy
        );
        history.epochs.push(EpochMetrics {
            epoch: epoch + 1,
            loss,
            accuracy,
            val_loss,
            val_accuracy,
        });
    }

    if let Some(last) = history.last() {
        info!(
            "Training finished: loss={:.4} accuracy={:.4}",
            last.loss, last.accuracy
        );
    }
    Ok((model, history))
}

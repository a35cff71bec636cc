//! Evaluation Metrics

use crate::ClassifierError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Confusion counts for a `K`-class classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// Number of classes
    pub n_classes: usize,
    /// Row-major `K x K` counts (`truth * K + predicted`)
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Empty `K x K` matrix
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    /// Tally aligned truth and prediction labels
    pub fn from_predictions(
        truth: &[usize],
        predicted: &[usize],
        n_classes: usize,
    ) -> Result<Self, ClassifierError> {
        if truth.len() != predicted.len() {
            return Err(ClassifierError::LabelCountMismatch {
                samples: predicted.len(),
                labels: truth.len(),
            });
        }
        let mut cm = Self::new(n_classes);
        for (&t, &p) in truth.iter().zip(predicted) {
            cm.add(t, p)?;
        }
        Ok(cm)
    }

    /// Count one prediction
    pub fn add(&mut self, truth: usize, predicted: usize) -> Result<(), ClassifierError> {
        for label in [truth, predicted] {
            if label >= self.n_classes {
                return Err(ClassifierError::UnknownLabel {
                    label,
                    classes: self.n_classes,
                });
            }
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
        Ok(())
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    /// Number of true samples of a class
    pub fn support(&self, class: usize) -> u32 {
        (0..self.n_classes).map(|p| self.get(class, p)).sum()
    }

    /// Total number of counted samples
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// Text table with truth rows and predicted columns
    pub fn render(&self, class_names: &[String]) -> String {
        let name = |i: usize| {
            class_names
                .get(i)
                .cloned()
                .unwrap_or_else(|| i.to_string())
        };
        let width = (0..self.n_classes)
            .map(|i| name(i).len())
            .chain(std::iter::once(6))
            .max()
            .unwrap_or(6);

        let mut out = format!("{:>width$}", "", width = width);
        for p in 0..self.n_classes {
            out.push_str(&format!(" {:>width$}", name(p), width = width));
        }
        out.push('\n');
        for t in 0..self.n_classes {
            out.push_str(&format!("{:>width$}", name(t), width = width));
            for p in 0..self.n_classes {
                out.push_str(&format!(" {:>width$}", self.get(t, p), width = width));
            }
            out.push('\n');
        }
        out
    }
}

/// Precision, recall and F1 of one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassStats {
    /// `TP / (TP + FP)`
    pub precision: f64,
    /// `TP / (TP + FN)`
    pub recall: f64,
    /// Harmonic mean of precision and recall
    pub f1: f64,
    /// Number of true samples of the class
    pub support: u32,
}

/// Per-class precision, recall and F1; zero when undefined
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<ClassStats> {
    let k = cm.n_classes;
    (0..k)
        .map(|c| {
            let tp = cm.get(c, c) as f64;
            let support = cm.support(c);
            let predicted: u32 = (0..k).map(|t| cm.get(t, c)).sum();
            let precision = if predicted == 0 { 0.0 } else { tp / predicted as f64 };
            let recall = if support == 0 { 0.0 } else { tp / support as f64 };
            let f1 = if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            };
            ClassStats {
                precision,
                recall,
                f1,
                support,
            }
        })
        .collect()
}

/// Fraction of samples on the diagonal
pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    let total = cm.total();
    if total == 0 {
        return 0.0;
    }
    let correct: u32 = (0..cm.n_classes).map(|c| cm.get(c, c)).sum();
    correct as f64 / total as f64
}

/// Accuracy restricted to the samples of each true class.
///
/// `None` for classes absent from the truth labels.
pub fn per_class_accuracy(cm: &ConfusionMatrix) -> Vec<Option<f64>> {
    (0..cm.n_classes)
        .map(|c| {
            let support = cm.support(c);
            (support > 0).then(|| cm.get(c, c) as f64 / support as f64)
        })
        .collect()
}

fn weighted_average(stats: &[ClassStats], weights: &[f64], support: u32) -> ClassStats {
    let norm: f64 = weights.iter().sum();
    let mean = |field: fn(&ClassStats) -> f64| {
        if norm == 0.0 {
            return 0.0;
        }
        stats.iter().zip(weights).map(|(s, w)| field(s) * w).sum::<f64>() / norm
    };
    ClassStats {
        precision: mean(|s| s.precision),
        recall: mean(|s| s.recall),
        f1: mean(|s| s.f1),
        support,
    }
}

/// Classification report with per-class and averaged scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub class_names: Vec<String>,
    pub per_class: Vec<ClassStats>,
    pub accuracy: f64,
    pub macro_avg: ClassStats,
    pub weighted_avg: ClassStats,
}

impl ClassificationReport {
    /// Build the report from confusion counts
    pub fn new(cm: &ConfusionMatrix, class_names: &[String]) -> Self {
        let per_class = precision_recall_by_class(cm);
        let total = cm.total();
        let uniform = vec![1.0; per_class.len()];
        let by_support: Vec<f64> = per_class.iter().map(|s| s.support as f64).collect();
        let macro_avg = weighted_average(&per_class, &uniform, total);
        let weighted_avg = weighted_average(&per_class, &by_support, total);

        Self {
            class_names: class_names.to_vec(),
            per_class,
            accuracy: accuracy(cm),
            macro_avg,
            weighted_avg,
        }
    }

    /// Report from aligned truth and predicted labels
    pub fn from_predictions(
        truth: &[usize],
        predicted: &[usize],
        class_names: &[String],
    ) -> Result<Self, ClassifierError> {
        let cm = ConfusionMatrix::from_predictions(truth, predicted, class_names.len())?;
        Ok(Self::new(&cm, class_names))
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .class_names
            .iter()
            .map(String::len)
            .chain(std::iter::once("weighted avg".len()))
            .max()
            .unwrap_or(12);

        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9} {:>9}",
            "", "precision", "recall", "f1-score", "support"
        )?;
        writeln!(f)?;
        for (i, stats) in self.per_class.iter().enumerate() {
            let name = self.class_names.get(i).cloned().unwrap_or_else(|| i.to_string());
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                name, stats.precision, stats.recall, stats.f1, stats.support
            )?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>width$} {:>9} {:>9} {:>9.2} {:>9}",
            "accuracy", "", "", self.accuracy, self.macro_avg.support
        )?;
        let averages = [
            ("macro avg", &self.macro_avg),
            ("weighted avg", &self.weighted_avg),
        ];
        for (label, stats) in averages {
            writeln!(
                f,
                "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}",
                label, stats.precision, stats.recall, stats.f1, stats.support
            )?;
        }
        Ok(())
    }
}

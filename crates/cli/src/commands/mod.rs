//! Subcommand implementations
//!
//! Each command returns a report value; the binary prints it.

pub mod evaluate;
pub mod generate;
pub mod sensors;
pub mod signal;
pub mod train;

use anyhow::Result;
use dataset_loader::FaultCondition;
use fault_classifier::{per_class_accuracy, ClassificationReport, ConfusionMatrix};
use std::fmt;

/// Metrics of a set of predictions against the true labels
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub class_names: Vec<String>,
    pub confusion: ConfusionMatrix,
    pub report: ClassificationReport,
    pub per_class_accuracy: Vec<Option<f64>>,
}

impl Evaluation {
    /// Score predictions over the fault condition classes
    pub fn new(truth: &[usize], predicted: &[usize]) -> Result<Self> {
        let class_names = FaultCondition::class_names();
        let confusion = ConfusionMatrix::from_predictions(truth, predicted, class_names.len())?;
        let report = ClassificationReport::new(&confusion, &class_names);
        let per_class_accuracy = per_class_accuracy(&confusion);
        Ok(Self {
            class_names,
            confusion,
            report,
            per_class_accuracy,
        })
    }

    pub fn accuracy(&self) -> f64 {
        self.report.accuracy
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy: {:.4}", self.accuracy())?;
        writeln!(f)?;
        writeln!(f, "Classification report:")?;
        writeln!(f, "{}", self.report)?;
        writeln!(f, "Confusion matrix (rows: true, columns: predicted):")?;
        writeln!(f, "{}", self.confusion.render(&self.class_names))?;
        writeln!(f, "Per-class accuracy:")?;
        for (name, acc) in self.class_names.iter().zip(&self.per_class_accuracy) {
            match acc {
                Some(acc) => writeln!(f, "  {:<14} {:.4}", name, acc)?,
                None => writeln!(f, "  {:<14} n/a", name)?,
            }
        }
        Ok(())
    }
}

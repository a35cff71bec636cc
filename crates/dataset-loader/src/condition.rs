//! Fault Condition Classes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Machine condition a sample was recorded under.
///
/// Folder names map to labels through this fixed enumeration; labels are
/// stable and independent of directory order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FaultCondition {
    Normal,
    Bearing,
    Misalignment,
    Imbalance,
}

impl FaultCondition {
    /// All conditions in label order
    pub const ALL: [FaultCondition; 4] = [
        FaultCondition::Normal,
        FaultCondition::Bearing,
        FaultCondition::Misalignment,
        FaultCondition::Imbalance,
    ];

    /// Integer class label
    pub fn label(self) -> usize {
        match self {
            FaultCondition::Normal => 0,
            FaultCondition::Bearing => 1,
            FaultCondition::Misalignment => 2,
            FaultCondition::Imbalance => 3,
        }
    }

    /// Condition for a class label
    pub fn from_label(label: usize) -> Option<Self> {
        Self::ALL.get(label).copied()
    }

    /// Directory name of the class
    pub fn as_str(self) -> &'static str {
        match self {
            FaultCondition::Normal => "normal",
            FaultCondition::Bearing => "bearing",
            FaultCondition::Misalignment => "misalignment",
            FaultCondition::Imbalance => "imbalance",
        }
    }

    /// Recognize a class directory name (exact match)
    pub fn from_dir_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Class names indexed by label
    pub fn class_names() -> Vec<String> {
        Self::ALL.iter().map(|c| c.as_str().to_string()).collect()
    }
}

impl fmt::Display for FaultCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_enumeration() {
        let labels: Vec<usize> = FaultCondition::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec![0, 1, 2, 3]);
        assert_eq!(FaultCondition::from_label(2), Some(FaultCondition::Misalignment));
        assert_eq!(FaultCondition::from_label(4), None);
    }

    #[test]
    fn test_dir_names() {
        assert_eq!(
            FaultCondition::from_dir_name("bearing"),
            Some(FaultCondition::Bearing)
        );
        assert_eq!(FaultCondition::from_dir_name("Bearing"), None);
        assert_eq!(FaultCondition::from_dir_name("unknown_condition"), None);
    }

    #[test]
    fn test_class_names_in_label_order() {
        assert_eq!(
            FaultCondition::class_names(),
            vec!["normal", "bearing", "misalignment", "imbalance"]
        );
    }
}

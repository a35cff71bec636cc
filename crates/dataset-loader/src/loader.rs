//! Class-per-folder Dataset Loading

use crate::condition::FaultCondition;
use crate::csv::read_window;
use crate::DatasetError;
use feature_engine::{FeatureExtractor, FeatureVector};
use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Dataset loader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Axis columns to read, in window column order
    pub axis_columns: Vec<String>,
    /// Sample file extension (without the dot)
    pub extension: String,
    /// Required rows per file; the first file's row count when unset
    pub expected_rows: Option<usize>,
    /// Read and extract files on the rayon pool
    pub parallel: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            axis_columns: vec!["ax".to_string(), "ay".to_string(), "az".to_string()],
            extension: "csv".to_string(),
            expected_rows: None,
            parallel: false,
        }
    }
}

/// One sample window reduced to features
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSample {
    /// Extracted feature vector
    pub features: FeatureVector,
    /// Condition taken from the parent folder
    pub condition: FaultCondition,
    /// File the window was read from
    pub source: PathBuf,
}

impl LabeledSample {
    /// Integer class label
    pub fn label(&self) -> usize {
        self.condition.label()
    }
}

/// Samples in canonical order (class folder, then file name)
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    samples: Vec<LabeledSample>,
    feature_names: Vec<String>,
}

impl Dataset {
    /// Wrap samples that share one feature layout
    pub fn new(samples: Vec<LabeledSample>, feature_names: Vec<String>) -> Self {
        Self {
            samples,
            feature_names,
        }
    }

    pub fn samples(&self) -> &[LabeledSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Feature labels in column order
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// `(samples, features)` matrix, rows in sample order
    pub fn feature_matrix(&self) -> Array2<f64> {
        let dim = self.samples.first().map_or(0, |s| s.features.len());
        Array2::from_shape_fn((self.samples.len(), dim), |(i, j)| {
            self.samples[i].features.as_slice()[j]
        })
    }

    /// Labels aligned with [`Dataset::feature_matrix`] rows
    pub fn labels(&self) -> Vec<usize> {
        self.samples.iter().map(LabeledSample::label).collect()
    }

    /// Number of samples per condition
    pub fn class_counts(&self) -> BTreeMap<FaultCondition, usize> {
        let mut counts = BTreeMap::new();
        for sample in &self.samples {
            *counts.entry(sample.condition).or_insert(0) += 1;
        }
        counts
    }
}

/// Loads `root/<condition>/<sample>.<ext>` trees
pub struct DatasetLoader {
    config: LoaderConfig,
    extractor: FeatureExtractor,
}

impl DatasetLoader {
    /// Create a loader
    pub fn new(config: LoaderConfig) -> Self {
        let extractor = FeatureExtractor::new(config.axis_columns.iter().cloned());
        Self { config, extractor }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load every sample under `root`.
    ///
    /// Folders not naming a known condition are skipped with a warning. A
    /// known condition folder without sample files is an error.
    pub fn load(&self, root: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
        let root = root.as_ref();
        let jobs = self.collect_files(root)?;
        info!(
            "Loading {} samples from {} ({})",
            jobs.len(),
            root.display(),
            if self.config.parallel { "parallel" } else { "sequential" }
        );

        // Indexed collection keeps canonical order regardless of completion order
        let results: Vec<Result<(usize, LabeledSample), DatasetError>> = if self.config.parallel {
            jobs.par_iter()
                .map(|(path, condition)| self.load_sample(path, *condition))
                .collect()
        } else {
            jobs.iter()
                .map(|(path, condition)| self.load_sample(path, *condition))
                .collect()
        };
        let loaded = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        let expected = self
            .config
            .expected_rows
            .or_else(|| loaded.first().map(|(rows, _)| *rows));
        let mut samples = Vec::with_capacity(loaded.len());
        for (rows, sample) in loaded {
            if let Some(expected) = expected {
                if rows != expected {
                    return Err(DatasetError::RowCountMismatch {
                        path: sample.source,
                        expected,
                        actual: rows,
                    });
                }
            }
            samples.push(sample);
        }

        let dataset = Dataset::new(samples, self.extractor.feature_names());
        for (condition, count) in dataset.class_counts() {
            debug!("  {}: {} samples", condition, count);
        }
        Ok(dataset)
    }

    fn collect_files(&self, root: &Path) -> Result<Vec<(PathBuf, FaultCondition)>, DatasetError> {
        if !root.is_dir() {
            return Err(DatasetError::MissingDirectory(root.to_path_buf()));
        }

        let mut class_dirs = Vec::new();
        for entry in fs::read_dir(root)? {
            let path = entry?.path();
            // Follows symlinks
            if path.is_dir() {
                class_dirs.push(path);
            }
        }
        if class_dirs.is_empty() {
            return Err(DatasetError::NoClassDirectories(root.to_path_buf()));
        }
        class_dirs.sort();

        let mut jobs = Vec::new();
        let mut recognized = 0;
        for dir in class_dirs {
            let name = dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let Some(condition) = FaultCondition::from_dir_name(&name) else {
                warn!("Unknown condition directory '{}', skipping", name);
                continue;
            };

            let files = self.sample_files(&dir)?;
            if files.is_empty() {
                return Err(DatasetError::NoSamplesFound(dir));
            }
            debug!("{}: {} files (label {})", name, files.len(), condition.label());
            jobs.extend(files.into_iter().map(|f| (f, condition)));
            recognized += 1;
        }
        if recognized == 0 {
            return Err(DatasetError::NoRecognizedClasses(root.to_path_buf()));
        }
        Ok(jobs)
    }

    fn sample_files(&self, dir: &Path) -> Result<Vec<PathBuf>, DatasetError> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e == self.config.extension);
            if matches && path.is_file() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    fn load_sample(
        &self,
        path: &Path,
        condition: FaultCondition,
    ) -> Result<(usize, LabeledSample), DatasetError> {
        let window = read_window(path, &self.config.axis_columns)?;
        let features = self.extractor.extract(window.data.view())?;
        Ok((
            window.rows(),
            LabeledSample {
                features,
                condition,
                source: path.to_path_buf(),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;

    fn write_sample(dir: &Path, name: &str, rows: usize, offset: f64) {
        fs::create_dir_all(dir).unwrap();
        let mut text = String::from("time,ax,ay,az\n");
        for i in 0..rows {
            let t = i as f64 * 0.001;
            writeln!(text, "{},{},{},{}", t, offset + i as f64, offset, -offset).unwrap();
        }
        fs::write(dir.join(name), text).unwrap();
    }

    #[test]
    fn test_known_and_unknown_classes() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        write_sample(&root.join("normal"), "s1.csv", 10, 0.0);
        write_sample(&root.join("normal"), "s0.csv", 10, 1.0);
        write_sample(&root.join("bearing"), "s0.csv", 10, 5.0);
        write_sample(&root.join("unknown_condition"), "s0.csv", 10, 9.0);

        let dataset = DatasetLoader::new(LoaderConfig::default()).load(root).unwrap();

        // Folders sort "bearing" < "normal"; files sort within each folder
        assert_eq!(dataset.labels(), vec![1, 0, 0]);
        let sources: Vec<_> = dataset
            .samples()
            .iter()
            .map(|s| s.source.strip_prefix(root).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            sources,
            vec![
                PathBuf::from("bearing/s0.csv"),
                PathBuf::from("normal/s0.csv"),
                PathBuf::from("normal/s1.csv"),
            ]
        );
        assert_eq!(dataset.feature_matrix().dim(), (3, 18));
        assert_eq!(dataset.feature_names()[0], "ax_mean");
        assert_eq!(dataset.class_counts()[&FaultCondition::Normal], 2);
    }

    #[test]
    fn test_empty_recognized_class() {
        let tmp = tempfile::tempdir().unwrap();
        write_sample(&tmp.path().join("normal"), "s0.csv", 5, 0.0);
        fs::create_dir_all(tmp.path().join("misalignment")).unwrap();
        fs::write(tmp.path().join("misalignment").join("notes.txt"), "x").unwrap();

        let err = DatasetLoader::new(LoaderConfig::default())
            .load(tmp.path())
            .unwrap_err();
        assert!(matches!(err, DatasetError::NoSamplesFound(p) if p.ends_with("misalignment")));
    }

    #[test]
    fn test_missing_root() {
        let tmp = tempfile::tempdir().unwrap();
        let err = DatasetLoader::new(LoaderConfig::default())
            .load(tmp.path().join("absent"))
            .unwrap_err();
        assert!(matches!(err, DatasetError::MissingDirectory(_)));
    }

    #[test]
    fn test_no_class_directories() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("loose.csv"), "ax,ay,az\n1,2,3\n").unwrap();
        let err = DatasetLoader::new(LoaderConfig::default())
            .load(tmp.path())
            .unwrap_err();
        assert!(matches!(err, DatasetError::NoClassDirectories(_)));
    }

    #[test]
    fn test_only_unknown_class_directories() {
        let tmp = tempfile::tempdir().unwrap();
        write_sample(&tmp.path().join("foo"), "a.csv", 5, 0.0);
        let err = DatasetLoader::new(LoaderConfig::default())
            .load(tmp.path())
            .unwrap_err();
        assert!(matches!(err, DatasetError::NoRecognizedClasses(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_class_directory_and_file() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().unwrap();
        let store = tempfile::tempdir().unwrap();
        write_sample(&store.path().join("real"), "a.csv", 8, 0.0);
        write_sample(&store.path().join("loose"), "b.csv", 8, 3.0);

        fs::create_dir_all(tmp.path().join("bearing")).unwrap();
        symlink(store.path().join("real"), tmp.path().join("normal")).unwrap();
        symlink(
            store.path().join("loose").join("b.csv"),
            tmp.path().join("bearing").join("b.csv"),
        )
        .unwrap();

        let dataset = DatasetLoader::new(LoaderConfig::default())
            .load(tmp.path())
            .unwrap();
        assert_eq!(dataset.labels(), vec![1, 0]);
        assert!(dataset.samples()[1].source.ends_with("normal/a.csv"));
    }

    #[test]
    fn test_row_count_mismatch() {
        let tmp = tempfile::tempdir().unwrap();
        write_sample(&tmp.path().join("normal"), "a.csv", 10, 0.0);
        write_sample(&tmp.path().join("normal"), "b.csv", 9, 0.0);

        let err = DatasetLoader::new(LoaderConfig::default())
            .load(tmp.path())
            .unwrap_err();
        assert!(matches!(
            err,
            DatasetError::RowCountMismatch { expected: 10, actual: 9, .. }
        ));

        let config = LoaderConfig {
            expected_rows: Some(9),
            ..LoaderConfig::default()
        };
        let err = DatasetLoader::new(config).load(tmp.path()).unwrap_err();
        assert!(matches!(
            err,
            DatasetError::RowCountMismatch { expected: 9, actual: 10, .. }
        ));
    }

    #[test]
    fn test_header_only_file_is_empty_window() {
        let tmp = tempfile::tempdir().unwrap();
        write_sample(&tmp.path().join("imbalance"), "a.csv", 0, 0.0);
        let err = DatasetLoader::new(LoaderConfig::default())
            .load(tmp.path())
            .unwrap_err();
        assert!(matches!(err, DatasetError::Feature(_)));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let tmp = tempfile::tempdir().unwrap();
        for condition in FaultCondition::ALL {
            for i in 0..6 {
                write_sample(
                    &tmp.path().join(condition.as_str()),
                    &format!("sample_{:04}.csv", i),
                    20,
                    (condition.label() * 10 + i) as f64,
                );
            }
        }

        let sequential = DatasetLoader::new(LoaderConfig::default())
            .load(tmp.path())
            .unwrap();
        let parallel = DatasetLoader::new(LoaderConfig {
            parallel: true,
            ..LoaderConfig::default()
        })
        .load(tmp.path())
        .unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(parallel.len(), 24);
    }
}

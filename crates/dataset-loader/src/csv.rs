//! CSV Sample Reader

use crate::DatasetError;
use ndarray::Array2;
use std::fs;
use std::path::Path;

/// Axis columns read from one sample file
#[derive(Debug, Clone, PartialEq)]
pub struct CsvWindow {
    /// Selected column names, in window column order
    pub columns: Vec<String>,
    /// `(rows, columns)` samples
    pub data: Array2<f64>,
}

impl CsvWindow {
    /// Number of time steps
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }
}

fn clean(field: &str) -> &str {
    field.trim().trim_matches('"')
}

/// Read the named columns of a comma-separated file with a header row.
///
/// Columns are returned in the order requested, whatever their position in
/// the file. Blank lines are ignored.
pub fn read_window<S: AsRef<str>>(path: &Path, columns: &[S]) -> Result<CsvWindow, DatasetError> {
    let text = fs::read_to_string(path)?;
    parse_window(path, &text, columns)
}

pub(crate) fn parse_window<S: AsRef<str>>(
    path: &Path,
    text: &str,
    columns: &[S],
) -> Result<CsvWindow, DatasetError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let header: Vec<&str> = match lines.next() {
        Some((_, line)) => line.split(',').map(clean).collect(),
        None => {
            return Err(DatasetError::Parse {
                path: path.to_path_buf(),
                line: 1,
                message: "empty file".to_string(),
            })
        }
    };

    let indices = columns
        .iter()
        .map(|name| {
            let name = name.as_ref();
            header
                .iter()
                .position(|h| *h == name)
                .ok_or_else(|| DatasetError::MissingColumn {
                    path: path.to_path_buf(),
                    column: name.to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut flat = Vec::new();
    let mut rows = 0;
    for (idx, line) in lines {
        let fields: Vec<&str> = line.split(',').collect();
        for &col in &indices {
            let cell = fields.get(col).map(|f| clean(f)).ok_or_else(|| DatasetError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                message: format!("expected at least {} fields, got {}", col + 1, fields.len()),
            })?;
            let value: f64 = cell.parse().map_err(|e| DatasetError::Parse {
                path: path.to_path_buf(),
                line: idx + 1,
                message: format!("invalid number '{}': {}", cell, e),
            })?;
            flat.push(value);
        }
        rows += 1;
    }

    let data = Array2::from_shape_vec((rows, indices.len()), flat).map_err(|e| {
        DatasetError::Parse {
            path: path.to_path_buf(),
            line: 0,
            message: e.to_string(),
        }
    })?;

    Ok(CsvWindow {
        columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn path() -> PathBuf {
        PathBuf::from("sample.csv")
    }

    #[test]
    fn test_selects_columns_in_requested_order() {
        let text = "time,az,ax,ay\n0,3,1,2\n0.001,6,4,5\n";
        let window = parse_window(&path(), text, &["ax", "ay", "az"]).unwrap();
        assert_eq!(window.rows(), 2);
        assert_eq!(window.data.row(0).to_vec(), vec![1.0, 2.0, 3.0]);
        assert_eq!(window.data.row(1).to_vec(), vec![4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_missing_column() {
        let text = "time,ax,ay\n0,1,2\n";
        let err = parse_window(&path(), text, &["ax", "ay", "az"]).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn { column, .. } if column == "az"));
    }

    #[test]
    fn test_bad_cell_reports_line() {
        let text = "ax\n1.0\n\nnope\n";
        let err = parse_window(&path(), text, &["ax"]).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { line: 4, .. }));
    }

    #[test]
    fn test_short_row() {
        let text = "ax,ay\n1.0\n";
        assert!(matches!(
            parse_window(&path(), text, &["ay"]),
            Err(DatasetError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_quoted_header_and_blank_lines() {
        let text = "\"ax\" , \"ay\"\n\n 1 , 2 \n";
        let window = parse_window(&path(), text, &["ay", "ax"]).unwrap();
        assert_eq!(window.data.row(0).to_vec(), vec![2.0, 1.0]);
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(
            parse_window(&path(), "", &["ax"]),
            Err(DatasetError::Parse { .. })
        ));
    }
}

//! CSV result log.
//!
//! One line per run, appended:
//!
//! ```text
//! distance,problem,algorithm,execution_time,tour,hyperparameters
//! ```
//!
//! `tour` is the encoded tour separated by spaces; `hyperparameters` are
//! joined with `|`. No header is written so that many runs can share a file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::models::OptimizationResult;

/// Formats one result line, newline included.
///
/// # Examples
///
/// ```
/// use evrp_routing::models::OptimizationResult;
/// use evrp_routing::solver::format_record;
///
/// let result = OptimizationResult {
///     algorithm_name: "Random Search".into(),
///     execution_time: 1.5,
///     distance: 120.25,
///     solution_encoded: vec![3, 1, 2],
///     solution_decoded: vec![],
///     hyperparameters: vec!["generations=100".into(), "samples_per_generation=10".into()],
/// };
/// assert_eq!(
///     format_record("E-n22-k4.evrp", &result),
///     "120.25,E-n22-k4.evrp,Random Search,1.5,3 1 2,generations=100|samples_per_generation=10\n"
/// );
/// ```
pub fn format_record(problem: &str, result: &OptimizationResult) -> String {
    let tour = result
        .solution_encoded
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{},{},{},{},{},{}\n",
        result.distance,
        problem,
        result.algorithm_name,
        result.execution_time,
        tour,
        result.hyperparameters.join("|")
    )
}

/// Appends results to a CSV file. Safe to share between threads; each
/// record is written whole.
#[derive(Debug)]
pub struct ResultWriter {
    path: PathBuf,
    file: Mutex<File>,
}

impl ResultWriter {
    /// Opens `path` for appending, creating it and its parent directory if
    /// needed.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, problem: &str, result: &OptimizationResult) -> io::Result<()> {
        let record = format_record(problem, result);
        let mut file = self.file.lock();
        file.write_all(record.as_bytes())?;
        file.flush()
    }
}

use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Element precision the workflow runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Single,
    Double,
}

/// Parameters of one synthetic correlation run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub rows: usize,
    pub cols: usize,
    pub shift_rows: isize,
    pub shift_cols: isize,
    pub noise: f64,
    pub seed: u64,
    pub kernel_size: usize,
    pub precision: Precision,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            rows: 32,
            cols: 48,
            shift_rows: 3,
            shift_cols: -5,
            noise: 0.05,
            seed: 0,
            kernel_size: 3,
            precision: Precision::Double,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_args(rows: usize, cols: usize, shift_rows: isize, shift_cols: isize) -> Self {
        Self {
            rows,
            cols,
            shift_rows,
            shift_cols,
            ..Default::default()
        }
    }

    /// Checks that the grid can host the displacement and the smoothing kernel.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(self.rows > 0 && self.cols > 0, "grid must not be empty");
        ensure!(
            self.shift_rows.unsigned_abs() < self.rows.div_ceil(2)
                && self.shift_cols.unsigned_abs() < self.cols.div_ceil(2),
            "displacement ({}, {}) must stay below half of the {}x{} grid",
            self.shift_rows,
            self.shift_cols,
            self.rows,
            self.cols
        );
        ensure!(
            self.kernel_size > 0 && self.kernel_size <= self.rows.min(self.cols),
            "kernel size {} does not fit a {}x{} grid",
            self.kernel_size,
            self.rows,
            self.cols
        );
        ensure!(
            (0.0..1.0).contains(&self.noise),
            "noise {} must lie in [0, 1)",
            self.noise
        );
        Ok(())
    }
}

use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use speccore::Sample;

/// A synthetic patch and a circularly displaced, noisy copy of it.
pub struct PatchPair<T> {
    pub template: Array2<T>,
    pub displaced: Array2<T>,
}

/// Number of Gaussian blobs that give the patch some structure.
const BLOB_COUNT: usize = 4;

fn build_template(config: &WorkflowConfig, rng: &mut StdRng) -> Array2<f64> {
    let (rows, cols) = (config.rows, config.cols);
    let blobs: Vec<(f64, f64, f64, f64)> = (0..BLOB_COUNT)
        .map(|_| {
            let cy = rng.gen_range(0.0..rows as f64);
            let cx = rng.gen_range(0.0..cols as f64);
            let sigma = rng.gen_range(1.0..(rows.min(cols) as f64 / 4.0).max(1.5));
            let amplitude = rng.gen_range(0.25..1.0);
            (cy, cx, sigma, amplitude)
        })
        .collect();

    Array2::from_shape_fn((rows, cols), |(i, j)| {
        let structure: f64 = blobs
            .iter()
            .map(|&(cy, cx, sigma, amplitude)| {
                let dy = i as f64 - cy;
                let dx = j as f64 - cx;
                amplitude * (-(dy * dy + dx * dx) / (2.0 * sigma * sigma)).exp()
            })
            .sum();
        1.0 + structure
    })
}

fn cast<T: Sample>(value: f64) -> anyhow::Result<T> {
    T::from_f64(value).context("sample not representable in the requested precision")
}

fn cast_grid<T: Sample>(grid: &Array2<f64>) -> anyhow::Result<Array2<T>> {
    let values = grid.iter().map(|&v| cast(v)).collect::<anyhow::Result<Vec<T>>>()?;
    Array2::from_shape_vec(grid.dim(), values).context("reshaping generated grid")
}

/// Builds the template and its copy displaced by `(shift_rows, shift_cols)`
/// with wrap-around, plus uniform jitter of amplitude `noise`.
pub fn build_patch_pair<T: Sample>(config: &WorkflowConfig) -> anyhow::Result<PatchPair<T>> {
    config.validate()?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let template = build_template(config, &mut rng);

    let (rows, cols) = template.dim();
    let mut displaced = Array2::zeros((rows, cols));
    for ((i, j), &value) in template.indexed_iter() {
        let ii = (i as isize + config.shift_rows).rem_euclid(rows as isize) as usize;
        let jj = (j as isize + config.shift_cols).rem_euclid(cols as isize) as usize;
        let jitter = if config.noise > 0.0 {
            rng.gen_range(-config.noise..config.noise)
        } else {
            0.0
        };
        displaced[[ii, jj]] = value + jitter;
    }

    Ok(PatchPair {
        template: cast_grid(&template)?,
        displaced: cast_grid(&displaced)?,
    })
}

/// Normalized `k × k` averaging kernel.
pub fn box_kernel<T: Sample>(size: usize) -> anyhow::Result<Array2<T>> {
    let weight = cast::<T>(1.0 / (size * size) as f64)?;
    Ok(Array2::from_elem((size, size), weight))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_builds_requested_shape() {
        let cfg = WorkflowConfig::from_args(12, 20, 2, -3);
        let pair = build_patch_pair::<f32>(&cfg).unwrap();
        assert_eq!(pair.template.dim(), (12, 20));
        assert_eq!(pair.displaced.dim(), (12, 20));
        assert!(pair.template.iter().all(|&v| v >= 1.0));
    }

    #[test]
    fn noiseless_copy_is_a_pure_roll() {
        let cfg = WorkflowConfig {
            noise: 0.0,
            ..WorkflowConfig::from_args(8, 10, -2, 3)
        };
        let pair = build_patch_pair::<f64>(&cfg).unwrap();
        assert_eq!(pair.displaced[[6, 3]], pair.template[[0, 0]]);
        assert_eq!(pair.displaced[[1, 2]], pair.template[[3, 9]]);
    }

    #[test]
    fn same_seed_is_deterministic() {
        let cfg = WorkflowConfig::from_args(8, 8, 1, 1);
        let first = build_patch_pair::<f64>(&cfg).unwrap();
        let second = build_patch_pair::<f64>(&cfg).unwrap();
        assert_eq!(first.template, second.template);
        assert_eq!(first.displaced, second.displaced);
    }

    #[test]
    fn box_kernel_sums_to_one() {
        let kernel = box_kernel::<f64>(4).unwrap();
        assert!((kernel.sum() - 1.0).abs() < 1e-12);
    }
}

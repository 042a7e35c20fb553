//! Seeded train/test split

use crate::error::{Result, StuntingError};
use ndarray::{Array1, Array2, Axis};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Rows of a shuffled train/test partition
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    pub x_train: Array2<f64>,
    pub x_test: Array2<f64>,
    pub y_train: Array1<f64>,
    pub y_test: Array1<f64>,
    /// Source row of every training sample
    pub train_indices: Vec<usize>,
    /// Source row of every test sample
    pub test_indices: Vec<usize>,
}

/// Shuffle rows with a seeded generator and hold out `ceil(n * test_size)`
/// of them.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    test_size: f64,
    seed: u64,
) -> Result<TrainTestSplit> {
    let n = x.nrows();
    if n != y.len() {
        return Err(StuntingError::ShapeError {
            expected: format!("y length = {}", n),
            actual: format!("y length = {}", y.len()),
        });
    }
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(StuntingError::ConfigError(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }

    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(StuntingError::DataError(format!(
            "Cannot split {} rows with test_size {}: one side would be empty",
            n, test_size
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_indices = indices[..n_test].to_vec();
    let train_indices = indices[n_test..].to_vec();

    Ok(TrainTestSplit {
        x_train: x.select(Axis(0), &train_indices),
        x_test: x.select(Axis(0), &test_indices),
        y_train: y.select(Axis(0), &train_indices),
        y_test: y.select(Axis(0), &test_indices),
        train_indices,
        test_indices,
    })
}

/// Fraction of positive labels
pub fn class_balance(y: &Array1<f64>) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    y.iter().filter(|&&v| v > 0.5).count() as f64 / y.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(n: usize) -> (Array2<f64>, Array1<f64>) {
        let x = Array2::from_shape_fn((n, 2), |(i, j)| (i * 2 + j) as f64);
        let y = Array1::from_shape_fn(n, |i| (i % 2) as f64);
        (x, y)
    }

    #[test]
    fn test_split_sizes() {
        let (x, y) = data(10);
        let split = train_test_split(&x, &y, 0.2, 42).unwrap();
        assert_eq!(split.x_test.nrows(), 2);
        assert_eq!(split.x_train.nrows(), 8);

        let (x, y) = data(11);
        let split = train_test_split(&x, &y, 0.2, 42).unwrap();
        assert_eq!(split.y_test.len(), 3);
        assert_eq!(split.y_train.len(), 8);
    }

    #[test]
    fn test_split_is_reproducible() {
        let (x, y) = data(50);
        let a = train_test_split(&x, &y, 0.2, 42).unwrap();
        let b = train_test_split(&x, &y, 0.2, 42).unwrap();
        assert_eq!(a.test_indices, b.test_indices);
        assert_eq!(a.x_train, b.x_train);
    }

    #[test]
    fn test_split_is_a_partition() {
        let (x, y) = data(30);
        let split = train_test_split(&x, &y, 0.2, 7).unwrap();

        let mut all: Vec<usize> = split
            .train_indices
            .iter()
            .chain(split.test_indices.iter())
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..30).collect::<Vec<_>>());

        for (row, &src) in split.test_indices.iter().enumerate() {
            assert_eq!(split.x_test.row(row), x.row(src));
            assert_eq!(split.y_test[row], y[src]);
        }
    }

    #[test]
    fn test_invalid_sizes() {
        let (x, y) = data(10);
        assert!(train_test_split(&x, &y, 0.0, 42).is_err());
        assert!(train_test_split(&x, &y, 1.0, 42).is_err());

        let (x, y) = data(1);
        assert!(train_test_split(&x, &y, 0.2, 42).is_err());
    }

    #[test]
    fn test_class_balance() {
        let (_, y) = data(10);
        assert_eq!(class_balance(&y), 0.5);
        assert_eq!(class_balance(&Array1::zeros(0)), 0.0);
    }
}

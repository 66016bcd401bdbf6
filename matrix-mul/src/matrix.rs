//! Dense row-major integer matrices.

use rand::Rng;

use crate::Error;

/// Smallest value produced by [`Matrix::random`].
pub const RANDOM_MIN: i64 = 1;
/// Largest value produced by [`Matrix::random`].
pub const RANDOM_MAX: i64 = 10;

/// An immutable matrix of `i64` whose rows all have the same length.
///
/// Matrices are never mutated after construction, so workers share them
/// behind an `Arc` without any locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: Vec<Vec<i64>>,
    cols: usize,
}

impl Matrix {
    /// Builds a matrix from rows, rejecting rows of unequal length.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, Error> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != cols)
        {
            return Err(Error::RaggedMatrix {
                row,
                expected: cols,
                found,
            });
        }
        Ok(Self { rows, cols })
    }

    /// Rows already checked to be `cols` wide.
    pub(crate) fn from_checked_rows(rows: Vec<Vec<i64>>, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Generates a `rows`×`cols` matrix with entries drawn uniformly from
    /// `RANDOM_MIN..=RANDOM_MAX`.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let rows = (0..rows)
            .map(|_| {
                (0..cols)
                    .map(|_| rng.gen_range(RANDOM_MIN..=RANDOM_MAX))
                    .collect()
            })
            .collect();
        Self { rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns row `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.rows()`.
    pub fn row(&self, i: usize) -> &[i64] {
        &self.rows[i]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[i64]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn into_rows(self) -> Vec<Vec<i64>> {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(
            err,
            Error::RaggedMatrix {
                row: 1,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn random_respects_shape_and_value_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let m = Matrix::random(4, 3, &mut rng);

        assert_eq!((m.rows(), m.cols()), (4, 3));
        assert!(
            m.iter_rows()
                .flatten()
                .all(|v| (RANDOM_MIN..=RANDOM_MAX).contains(v))
        );
    }

    #[test]
    fn random_is_reproducible_from_seed() {
        let a = Matrix::random(5, 5, &mut StdRng::seed_from_u64(42));
        let b = Matrix::random(5, 5, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}

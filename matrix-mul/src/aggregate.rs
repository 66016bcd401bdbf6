//! Reassembling partial results into the final matrix.

use crate::Error;
use crate::matrix::Matrix;
use crate::worker::PartialResult;

/// A result matrix under construction; every row starts unset.
#[derive(Debug)]
pub struct ResultMatrix {
    cols: usize,
    rows: Vec<Option<Vec<i64>>>,
}

impl ResultMatrix {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            cols,
            rows: vec![None; rows],
        }
    }

    /// Writes each row of `partial` at its absolute index.
    ///
    /// Fails if a row lands outside the matrix, has the wrong width, or was
    /// already written.
    pub fn apply(&mut self, partial: PartialResult) -> Result<(), Error> {
        let total = self.rows.len();
        for (offset, row) in partial.rows.into_iter().enumerate() {
            let index = partial.start_row + offset;
            let slot = self.rows.get_mut(index).ok_or(Error::RowOutOfBounds {
                row: index,
                rows: total,
            })?;
            if row.len() != self.cols {
                return Err(Error::RaggedMatrix {
                    row: index,
                    expected: self.cols,
                    found: row.len(),
                });
            }
            if slot.is_some() {
                return Err(Error::DuplicateRow(index));
            }
            *slot = Some(row);
        }
        Ok(())
    }

    /// Indices of rows not yet written, ascending.
    pub fn missing_rows(&self) -> Vec<usize> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, row)| row.is_none().then_some(i))
            .collect()
    }

    /// Converts into a [`Matrix`] once every row has been written.
    pub fn finish(self) -> Result<Matrix, Error> {
        let missing = self.missing_rows();
        if !missing.is_empty() {
            return Err(Error::MissingRows(missing));
        }
        let rows = self.rows.into_iter().flatten().collect();
        Ok(Matrix::from_checked_rows(rows, self.cols))
    }
}

/// Builds a `num_rows`×`cols` matrix from partial results in any order.
pub fn assemble<I>(num_rows: usize, cols: usize, partials: I) -> Result<Matrix, Error>
where
    I: IntoIterator<Item = PartialResult>,
{
    let mut result = ResultMatrix::new(num_rows, cols);
    for partial in partials {
        result.apply(partial)?;
    }
    result.finish()
}

//! Per-range multiplication workers.

use std::sync::Arc;

use log_collector::Logger;
use tokio::sync::mpsc::UnboundedSender;

use crate::Error;
use crate::matrix::Matrix;
use crate::partition::RowRange;

/// Rows `start_row..start_row + rows.len()` of the product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialResult {
    pub start_row: usize,
    pub rows: Vec<Vec<i64>>,
}

/// Computes the rows of `a × b` covered by `range` with the plain triple loop.
///
/// Accumulation is checked; an overflowing entry fails the whole range.
/// The caller guarantees `a.cols() == b.rows()` and `range.end <= a.rows()`.
pub fn compute(a: &Matrix, b: &Matrix, range: RowRange) -> Result<PartialResult, Error> {
    let mut rows = Vec::with_capacity(range.len());
    for i in range.rows() {
        let lhs = a.row(i);
        let mut out = Vec::with_capacity(b.cols());
        for j in 0..b.cols() {
            let mut sum: i64 = 0;
            for (k, &x) in lhs.iter().enumerate() {
                sum = x
                    .checked_mul(b.row(k)[j])
                    .and_then(|product| sum.checked_add(product))
                    .ok_or(Error::Overflow { row: i, col: j })?;
            }
            out.push(sum);
        }
        rows.push(out);
    }
    Ok(PartialResult {
        start_row: range.start,
        rows,
    })
}

pub fn worker_name(id: usize) -> String {
    format!("worker-{id}")
}

/// One unit of work: a row range plus everything needed to report on it.
pub struct Worker {
    range: RowRange,
    a: Arc<Matrix>,
    b: Arc<Matrix>,
    results: UnboundedSender<PartialResult>,
    logger: Logger,
}

impl Worker {
    pub fn new(
        id: usize,
        range: RowRange,
        a: Arc<Matrix>,
        b: Arc<Matrix>,
        results: UnboundedSender<PartialResult>,
        logger: &Logger,
    ) -> Self {
        Self {
            range,
            a,
            b,
            results,
            logger: logger.with_origin(worker_name(id)),
        }
    }

    /// Computes the assigned rows and sends them on the result channel.
    ///
    /// Blocking; run it on a blocking thread. A computation error is logged
    /// and returned, and nothing is sent.
    pub fn run(self) -> Result<(), Error> {
        let range = self.range;
        self.logger.info(format!("started processing rows {range}"));

        let partial = match compute(&self.a, &self.b, range) {
            Ok(partial) => partial,
            Err(e) => {
                self.logger.error(format!("failed processing rows {range}: {e}"));
                return Err(e);
            }
        };

        if self.results.send(partial).is_err() {
            self.logger.warn(format!(
                "result for rows {range} discarded, coordinator stopped listening"
            ));
        }
        self.logger.info(format!("finished processing rows {range}"));
        Ok(())
    }
}

//! Command-line flags, with interactive prompts for anything left out.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use clap::builder::RangedU64ValueParser;
use matrix_mul::policy::clamp_workers;
use matrix_mul::{Dimensions, Error, Options, Prompter, WorkerPolicy};

#[derive(Debug, Parser)]
#[command(name = "matrix-mul")]
#[command(about = "Multiply two random integer matrices across parallel workers")]
#[command(version)]
pub struct Cli {
    /// Rows of the first matrix (prompted for when omitted).
    #[arg(long, value_parser = positive())]
    pub rows1: Option<usize>,
    /// Columns of the first matrix (prompted for when omitted).
    #[arg(long, value_parser = positive())]
    pub cols1: Option<usize>,
    /// Rows of the second matrix (prompted for when omitted).
    #[arg(long, value_parser = positive())]
    pub rows2: Option<usize>,
    /// Columns of the second matrix (prompted for when omitted).
    #[arg(long, value_parser = positive())]
    pub cols2: Option<usize>,
    /// Number of workers; capped by the currently idle CPU capacity.
    #[arg(short, long, value_parser = positive())]
    pub workers: Option<usize>,
    /// Seed for generating both matrices.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Directory the result file is written to.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,
    /// Also append log lines to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Stop waiting for workers after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub worker_timeout: Option<u64>,
}

fn positive() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::<usize>::new().range(1..)
}

/// What the operator asked for, after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    pub dims: Dimensions,
    pub requested: usize,
    pub workers: usize,
}

impl Cli {
    pub fn options(&self) -> Options {
        Options {
            worker_timeout: self.worker_timeout.map(Duration::from_secs),
        }
    }

    /// Completes the request from the operator.
    ///
    /// The worker count is only asked for (and the policy only consulted)
    /// once the dimensions are known to be multipliable; otherwise a single
    /// worker is requested and validation rejects the run.
    pub fn resolve<R: BufRead, W: Write>(
        &self,
        prompter: &mut Prompter<R, W>,
        policy: &dyn WorkerPolicy,
    ) -> Result<Request, Error> {
        let dims = Dimensions {
            rows1: value_or_ask(self.rows1, prompter, "Rows of the first matrix")?,
            cols1: value_or_ask(self.cols1, prompter, "Columns of the first matrix")?,
            rows2: value_or_ask(self.rows2, prompter, "Rows of the second matrix")?,
            cols2: value_or_ask(self.cols2, prompter, "Columns of the second matrix")?,
        };
        if !dims.compatible() {
            return Ok(Request {
                dims,
                requested: 1,
                workers: 1,
            });
        }

        let max = policy.max_workers();
        let prompt = format!("Number of workers to use (max {max})");
        let requested = value_or_ask(self.workers, prompter, &prompt)?;
        Ok(Request {
            dims,
            requested,
            workers: clamp_workers(requested, max),
        })
    }
}

fn value_or_ask<R: BufRead, W: Write>(
    value: Option<usize>,
    prompter: &mut Prompter<R, W>,
    prompt: &str,
) -> Result<usize, Error> {
    match value {
        Some(value) => Ok(value),
        None => prompter.ask_positive(prompt),
    }
}

//! Reading matrix dimensions and the worker count from the operator.

use std::io::{BufRead, Write};

use crate::Error;

/// Shapes of both operands: A is `rows1`×`cols1`, B is `rows2`×`cols2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub rows1: usize,
    pub cols1: usize,
    pub rows2: usize,
    pub cols2: usize,
}

impl Dimensions {
    pub fn compatible(&self) -> bool {
        self.cols1 == self.rows2
    }
}

/// Parses a strictly positive integer typed by the operator.
pub fn parse_positive(text: &str) -> Result<usize, Error> {
    let text = text.trim();
    match text.parse::<usize>() {
        Ok(0) => Err(Error::InvalidInput("expected a positive integer, got 0".into())),
        Ok(value) => Ok(value),
        Err(_) => Err(Error::InvalidInput(format!(
            "expected a positive integer, got {text:?}"
        ))),
    }
}

/// Asks questions on `output` and reads the answers from `input`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn ask_positive(&mut self, prompt: &str) -> Result<usize, Error> {
        write!(self.output, "{prompt}: ")
            .and_then(|_| self.output.flush())
            .map_err(|e| Error::InvalidInput(format!("cannot prompt operator: {e}")))?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| Error::InvalidInput(format!("cannot read answer: {e}")))?;
        if read == 0 {
            return Err(Error::InvalidInput(format!("no answer to {prompt:?}")));
        }
        parse_positive(&line)
    }
}

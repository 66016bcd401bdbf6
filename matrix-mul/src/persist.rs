//! Writing the finished matrix to disk.

use std::fmt::Display;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};

use crate::Error;
use crate::matrix::Matrix;

/// Destination for a completed result matrix.
#[async_trait]
pub trait Persist: Send + Sync {
    /// Stores `result` and returns where it went.
    async fn persist(&self, result: &Matrix) -> Result<PathBuf, Error>;
}

/// Writes `result_<YYYYMMDD_HHMMSS>.txt` files into a directory.
///
/// Two results saved within the same second share a name; the later one
/// replaces the earlier.
#[derive(Debug, Clone)]
pub struct TextFile {
    dir: PathBuf,
}

impl TextFile {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl Persist for TextFile {
    async fn persist(&self, result: &Matrix) -> Result<PathBuf, Error> {
        let path = self.dir.join(result_file_name(&Local::now()));
        tokio::fs::write(&path, to_text(result)).await?;
        Ok(path)
    }
}

pub fn result_file_name<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("result_{}.txt", at.format("%Y%m%d_%H%M%S"))
}

/// One line per row, values separated by commas, no header.
pub fn to_text(matrix: &Matrix) -> String {
    let mut content = String::new();
    for row in matrix.iter_rows() {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",");
        content.push_str(&line);
        content.push('\n');
    }
    content
}

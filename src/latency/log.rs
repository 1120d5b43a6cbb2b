//! Append-only diagnostic record of latency samples.

use std::fmt;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::estimator::LatencyState;

/// One latency sample and the smoothed state after it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyRecord {
    /// Offset-corrected latency in seconds.
    pub latency: f64,
    /// Estimator state after the sample.
    pub state: LatencyState,
}

impl fmt::Display for LatencyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.6} {:.6} {:.6} {:.6}",
            self.latency,
            self.state.smoothed_mean,
            self.state.smoothed_deviation,
            self.state.upper_bound
        )
    }
}

/// Writes one line per record, `latency mean deviation upper`.
#[derive(Debug)]
pub struct LatencyLog {
    path: PathBuf,
    file: File,
}

impl LatencyLog {
    /// Open `path` for appending, creating it if needed.
    ///
    /// # Errors
    /// Returns `std::io::Error` if the file cannot be opened.
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self { path, file })
    }

    /// Location of the log.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record.
    ///
    /// # Errors
    /// Returns `std::io::Error` if the write fails.
    pub async fn append(&mut self, record: &LatencyRecord) -> std::io::Result<()> {
        let line = format!("{record}\n");
        self.file.write_all(line.as_bytes()).await?;
        self.file.flush().await
    }
}

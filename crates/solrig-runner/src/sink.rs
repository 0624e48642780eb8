//! Persistence sink for the two output artifacts

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::{RunOutput, RunnerError};

/// Writes the trace and status artifacts to disk.
///
/// Traces keep their nested per-step shape as JSON; statuses are one
/// record per line. Write failures are reported without retry.
#[derive(Debug, Clone)]
pub struct OutputSink {
    traces_path: PathBuf,
    statuses_path: PathBuf,
}

impl OutputSink {
    /// Create a sink writing to the given paths
    pub fn new(traces_path: impl Into<PathBuf>, statuses_path: impl Into<PathBuf>) -> Self {
        Self {
            traces_path: traces_path.into(),
            statuses_path: statuses_path.into(),
        }
    }

    /// Serialize both output sequences
    pub fn flush(&self, output: &RunOutput) -> Result<(), RunnerError> {
        let traces = File::create(&self.traces_path)?;
        let mut writer = BufWriter::new(traces);
        serde_json::to_writer(&mut writer, &output.traces)
            .map_err(|e| RunnerError::Sink(e.into()))?;
        writer.flush()?;

        let statuses = File::create(&self.statuses_path)?;
        let mut writer = BufWriter::new(statuses);
        for status in &output.statuses {
            writeln!(writer, "{}", status)?;
        }
        writer.flush()?;

        Ok(())
    }
}

//! Presentation sinks for completed mosaic rows

use crate::io::error::{MosaicError, Result};
use crate::pipeline::RunSummary;
use crate::resolve::RowResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Receives completed rows in ascending row order
pub trait RowSink {
    /// Render one completed row
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be rendered
    fn render_row(&mut self, row: &RowResult) -> Result<()>;

    /// Called once after the last row of a successful run
    ///
    /// # Errors
    ///
    /// Returns an error if pending output cannot be flushed
    fn finish(&mut self, _summary: &RunSummary) -> Result<()> {
        Ok(())
    }
}

impl RowSink for Vec<RowResult> {
    fn render_row(&mut self, row: &RowResult) -> Result<()> {
        self.push(row.clone());
        Ok(())
    }
}

/// Appends each row's payloads, concatenated in column order, as one line
pub struct MarkupWriter<W: Write> {
    writer: W,
    rows_written: usize,
}

impl<W: Write> MarkupWriter<W> {
    /// Write rows to `writer`
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            rows_written: 0,
        }
    }

    /// Number of rows written so far
    pub const fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl MarkupWriter<BufWriter<File>> {
    /// Create (or truncate) a markup document at `path`
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory or the file cannot be created
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| MosaicError::FileSystem {
                path: parent.to_path_buf(),
                operation: "create directory",
                source: e,
            })?;
        }
        let file = File::create(path).map_err(|e| MosaicError::FileSystem {
            path: path.to_path_buf(),
            operation: "create output",
            source: e,
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RowSink for MarkupWriter<W> {
    fn render_row(&mut self, row: &RowResult) -> Result<()> {
        let line: String = row.payloads().map(|payload| payload.as_str()).collect();
        writeln!(self.writer, "{line}")?;
        self.rows_written += 1;
        Ok(())
    }

    fn finish(&mut self, _summary: &RunSummary) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

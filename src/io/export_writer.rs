//! Export writer - writes finished export buffers to disk
//!
//! The CSV and PDF generators produce in-memory buffers; this writer
//! owns the output directory and file naming.

use crate::domain::SessionId;
use crate::services::governor::ExportFormat;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Writes export buffers under a configured output directory
pub struct ExportWriter {
    output_dir: PathBuf,
}

impl ExportWriter {
    pub fn new(output_dir: &str) -> Self {
        info!(output_dir = %output_dir, "export_writer_initialized");
        Self { output_dir: PathBuf::from(output_dir) }
    }

    /// Write one export buffer, creating the output directory if needed
    ///
    /// File name is `<session-id>-visitors.<ext>`.
    pub fn write(
        &self,
        session_id: &SessionId,
        format: ExportFormat,
        bytes: &[u8],
    ) -> anyhow::Result<PathBuf> {
        let path = self
            .output_dir
            .join(format!("{}-visitors.{}", session_id, format.as_str()));

        match self.write_file(&path, bytes) {
            Ok(()) => {
                info!(
                    session_id = %session_id,
                    path = %path.display(),
                    bytes = %bytes.len(),
                    "export_written"
                );
                Ok(path)
            }
            Err(e) => {
                error!(
                    session_id = %session_id,
                    path = %path.display(),
                    error = %e,
                    "export_write_failed"
                );
                Err(e.into())
            }
        }
    }

    fn write_file(&self, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("exports");
        let writer = ExportWriter::new(out.to_str().unwrap());

        let path = writer
            .write(&SessionId("s-1".to_string()), ExportFormat::Csv, b"Name\nJane\n")
            .unwrap();

        assert!(path.ends_with("s-1-visitors.csv"));
        assert_eq!(fs::read(&path).unwrap(), b"Name\nJane\n");
    }

    #[test]
    fn test_write_pdf_extension() {
        let dir = tempdir().unwrap();
        let writer = ExportWriter::new(dir.path().to_str().unwrap());

        let path = writer
            .write(&SessionId("s-2".to_string()), ExportFormat::Pdf, b"%PDF-1.4")
            .unwrap();
        assert!(path.to_string_lossy().ends_with("s-2-visitors.pdf"));
    }
}

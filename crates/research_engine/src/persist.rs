use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use research_logging::research_info;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::filename::report_filename;
use crate::ReportResponse;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("download directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure the download directory exists; create it if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Writes files via a sibling temp file that is renamed into place.
///
/// The temp file is owned by a `NamedTempFile` guard, so any early return
/// removes it and no partial report is ever visible.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Saves a fetched report as `research_report_<topic>.txt` under `dir`.
pub fn save_report(dir: &Path, report: &ReportResponse) -> Result<PathBuf, PersistError> {
    let filename = report_filename(&report.topic);
    let writer = AtomicFileWriter::new(dir.to_path_buf());
    let path = writer.write(&filename, report.report.as_bytes())?;
    research_info!(
        "Saved report for topic {:?} to {:?} ({} bytes)",
        report.topic,
        path,
        report.report.len()
    );
    Ok(path)
}

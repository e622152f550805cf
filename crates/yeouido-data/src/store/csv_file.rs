//! Delimited-file store.
//!
//! The file is UTF-8 so company names in any script survive a round trip.
//! Files in legacy encodings such as CP949 are rejected, not transcoded.
//! The header row is emitted once, by the first write; later writes append
//! data rows only.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{DataError, Result};
use crate::record::FinancialRecord;
use crate::store::RecordStore;

/// Byte order mark some spreadsheet tools prepend to UTF-8 files.
const UTF8_BOM: char = '\u{feff}';

/// Append-only CSV file of [`FinancialRecord`] rows.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    /// Open a store at `path`. The file is created by the first append.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordStore for CsvStore {
    fn scan(&self) -> Result<Vec<FinancialRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = String::from_utf8(fs::read(&self.path)?).map_err(|e| {
            DataError::Parse(format!(
                "Store {} is not valid UTF-8 (re-save it as UTF-8): {}",
                self.path.display(),
                e.utf8_error()
            ))
        })?;
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(&content);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(content.as_bytes());

        let records = reader
            .deserialize()
            .collect::<std::result::Result<Vec<FinancialRecord>, csv::Error>>()?;
        debug!(path = %self.path.display(), rows = records.len(), "scanned store");
        Ok(records)
    }

    fn push(&mut self, record: &FinancialRecord) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        let needs_header = file.metadata()?.len() == 0;

        // A row cut short by an interrupted run or an editor must not swallow the next one
        if !needs_header && !ends_with_newline(&mut file)? {
            warn!(
                path = %self.path.display(),
                "store does not end with a newline, terminating last row"
            );
            file.write_all(b"\n")?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}

/// Whether the last byte of a non-empty file is a line feed.
fn ends_with_newline(file: &mut File) -> Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

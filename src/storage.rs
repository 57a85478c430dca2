use crate::error::Result;
use crate::types::{to_cell, Table};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// What a write produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSummary {
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: usize,
    /// Hex SHA-256 of the file contents.
    pub sha256: String,
}

/// Delimited-text file holding one table: header line first, no index column.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
    delimiter: u8,
}

impl CsvStorage {
    pub fn new(path: impl Into<PathBuf>, delimiter: u8) -> Self {
        Self {
            path: path.into(),
            delimiter,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes `table` to bytes. Missing cells become empty fields; lines
    /// end in `\n` and fields are quoted only when needed.
    pub fn encode(&self, table: &Table) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(table.columns())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        writer.into_inner().map_err(|e| e.into_error().into())
    }

    /// Writes `table`, replacing whatever is at the path.
    #[instrument(skip(self, table), fields(path = %self.path.display()))]
    pub fn write(&self, table: &Table) -> Result<WriteSummary> {
        let bytes = self.encode(table)?;
        fs::write(&self.path, &bytes)?;

        let summary = WriteSummary {
            path: self.path.clone(),
            rows: table.len(),
            bytes: bytes.len(),
            sha256: hex::encode(Sha256::digest(&bytes)),
        };
        info!(
            rows = summary.rows,
            bytes = summary.bytes,
            sha256 = %summary.sha256,
            "wrote table"
        );
        Ok(summary)
    }

    /// Loads a file written by [`CsvStorage::write`]; empty fields are missing.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_path(&self.path)?;

        let columns = reader.headers()?.iter().map(str::to_string).collect();
        let mut table = Table::new(columns);
        for record in reader.records() {
            let record = record?;
            table.push_row(record.iter().map(|f| to_cell(f.to_string())).collect())?;
        }
        debug!(rows = table.len(), "read table");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Table {
        Table::from_rows(
            ["Chemical formula", "Synonyms", "CAS number"],
            vec![
                vec!["H2O", "water", "7732-18-5"],
                vec!["C2H4O2", "acetic acid, vinegar", ""],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_encode_layout() {
        let storage = CsvStorage::new("unused.csv", b',');
        let text = String::from_utf8(storage.encode(&sample()).unwrap()).unwrap();
        assert_eq!(
            text,
            "Chemical formula,Synonyms,CAS number\n\
             H2O,water,7732-18-5\n\
             C2H4O2,\"acetic acid, vinegar\",\n"
        );
    }

    #[test]
    fn test_write_overwrites_and_reads_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "stale contents that are longer than the new file\n".repeat(50)).unwrap();

        let storage = CsvStorage::new(&path, b',');
        let summary = storage.write(&sample()).unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.bytes, fs::metadata(&path).unwrap().len() as usize);
        assert_eq!(summary.sha256.len(), 64);

        let back = storage.read().unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_identical_tables_hash_identically() {
        let dir = tempdir().unwrap();
        let storage = CsvStorage::new(dir.path().join("data.csv"), b',');
        let first = storage.write(&sample()).unwrap();
        let second = storage.write(&sample()).unwrap();
        assert_eq!(first.sha256, second.sha256);
    }

    #[test]
    fn test_custom_delimiter() {
        let storage = CsvStorage::new("unused.tsv", b'\t');
        let text = String::from_utf8(storage.encode(&sample()).unwrap()).unwrap();
        assert!(text.starts_with("Chemical formula\tSynonyms\tCAS number\n"));
        assert!(text.contains("C2H4O2\tacetic acid, vinegar\t\n"));
    }

    #[test]
    fn test_read_missing_file_fails() {
        let dir = tempdir().unwrap();
        let storage = CsvStorage::new(dir.path().join("absent.csv"), b',');
        assert!(storage.read().is_err());
    }
}

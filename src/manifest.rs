//! Delimited manifest ingestion.
//!
//! A manifest is a header row followed by one data row per example. Rows
//! shorter than the loader's minimum arity are dropped with a diagnostic
//! instead of failing the read.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::constants::manifest::{DEFAULT_DELIMITER, QUOTE};
use crate::errors::DatasetError;

/// One retained data row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestRow {
    /// 0-based position among data rows (header excluded), counting dropped rows.
    pub position: usize,
    /// Raw field values in column order.
    pub fields: Vec<String>,
}

impl ManifestRow {
    /// Field at `column`; callers only index below the reader's minimum arity.
    pub fn field(&self, column: usize) -> &str {
        self.fields.get(column).map(String::as_str).unwrap_or("")
    }
}

/// Record of a dropped row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestDiagnostic {
    /// Data-row position of the dropped row.
    pub position: usize,
    /// Number of columns found.
    pub columns: usize,
    /// Minimum number of columns required.
    pub required: usize,
}

/// Parsed manifest in source order.
#[derive(Clone, Debug, Default)]
pub struct Manifest {
    /// Retained rows in manifest order.
    pub rows: Vec<ManifestRow>,
    /// One entry per dropped row.
    pub diagnostics: Vec<ManifestDiagnostic>,
}

/// Reader for header-prefixed delimited manifests.
#[derive(Clone, Debug)]
pub struct ManifestReader {
    delimiter: u8,
    min_columns: usize,
}

impl ManifestReader {
    /// Create a comma-delimited reader that keeps rows with at least `min_columns` fields.
    pub fn new(min_columns: usize) -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            min_columns,
        }
    }

    /// Override the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read a manifest file from disk.
    pub fn read_path(&self, path: &Path) -> Result<Manifest, DatasetError> {
        let file = File::open(path).map_err(|err| DatasetError::Manifest {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        let manifest = self.read_from(BufReader::new(file), path)?;
        debug!(
            "[sign_datasets:manifest] {}: kept {} rows, dropped {}",
            path.display(),
            manifest.rows.len(),
            manifest.diagnostics.len()
        );
        Ok(manifest)
    }

    /// Read a manifest from any byte source.
    pub fn read<R: Read>(&self, reader: R) -> Result<Manifest, DatasetError> {
        self.read_from(reader, Path::new("<stream>"))
    }

    fn read_from<R: Read>(&self, mut reader: R, origin: &Path) -> Result<Manifest, DatasetError> {
        let mut raw = Vec::new();
        reader.read_to_end(&mut raw)?;
        let mut blank_rows = blank_row_flags(&raw).into_iter().peekable();

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(raw.as_slice());

        let mut manifest = Manifest::default();
        let mut position = 0usize;
        for record in csv_reader.records() {
            let record = record.map_err(|err| manifest_error(origin, err))?;
            while blank_rows.next_if(|blank| *blank).is_some() {
                self.drop_row(&mut manifest, origin, position, 0);
                position += 1;
            }
            blank_rows.next();

            if record.len() < self.min_columns {
                self.drop_row(&mut manifest, origin, position, record.len());
            } else {
                manifest.rows.push(ManifestRow {
                    position,
                    fields: record.iter().map(str::to_string).collect(),
                });
            }
            position += 1;
        }
        Ok(manifest)
    }

    fn drop_row(&self, manifest: &mut Manifest, origin: &Path, position: usize, columns: usize) {
        warn!(
            "[sign_datasets:manifest] {}: skipping row {} with {} columns (need {})",
            origin.display(),
            position,
            columns,
            self.min_columns
        );
        manifest.diagnostics.push(ManifestDiagnostic {
            position,
            columns,
            required: self.min_columns,
        });
    }
}

/// Blank flag for every data row after the header, in source order.
///
/// The csv reader skips empty lines without reporting them; these flags let
/// the caller keep their positions. Quoted line breaks stay inside their row,
/// `\r\n` is one terminator, and trailing blank lines are not reported.
fn blank_row_flags(raw: &[u8]) -> Vec<bool> {
    let mut flags = Vec::new();
    let mut in_quotes = false;
    let mut row_len = 0usize;
    let mut bytes = raw.iter().copied().peekable();
    while let Some(byte) = bytes.next() {
        if byte == QUOTE {
            in_quotes = !in_quotes;
        }
        if !in_quotes && matches!(byte, b'\n' | b'\r') {
            if byte == b'\r' {
                bytes.next_if_eq(&b'\n');
            }
            flags.push(row_len == 0);
            row_len = 0;
        } else {
            row_len += 1;
        }
    }
    if row_len > 0 {
        flags.push(false);
    }

    let mut data_rows = match flags.iter().position(|blank| !blank) {
        Some(header) => flags.split_off(header + 1),
        None => Vec::new(),
    };
    while data_rows.last() == Some(&true) {
        data_rows.pop();
    }
    data_rows
}

fn manifest_error(origin: &Path, err: csv::Error) -> DatasetError {
    if err.is_io_error() {
        if let csv::ErrorKind::Io(io_err) = err.into_kind() {
            return DatasetError::Io(io_err);
        }
        return DatasetError::Manifest {
            path: PathBuf::from(origin),
            reason: "unknown io failure".to_string(),
        };
    }
    DatasetError::Manifest {
        path: PathBuf::from(origin),
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MANIFEST: &str = "\
Participant ID,Video file,Gloss,ASL-LEX Code
P1,111-HELLO.mp4,HELLO,A_01_001
P2,222-BYE.mp4
P3,333-THANKS.mp4,THANKS,B_02_044
";

    #[test]
    fn drops_header_and_short_rows_preserving_order() {
        let manifest = ManifestReader::new(4).read(MANIFEST.as_bytes()).unwrap();
        let positions: Vec<usize> = manifest.rows.iter().map(|row| row.position).collect();
        assert_eq!(positions, vec![0, 2]);
        assert_eq!(manifest.rows[0].field(0), "P1");
        assert_eq!(manifest.rows[1].field(2), "THANKS");
        assert_eq!(
            manifest.diagnostics,
            vec![ManifestDiagnostic {
                position: 1,
                columns: 2,
                required: 4,
            }]
        );
    }

    #[test]
    fn honours_quoted_fields_and_custom_delimiters() {
        let raw = "a;b;c;d\nP1;\"x;y\";GLOSS;CODE\n";
        let manifest = ManifestReader::new(4)
            .with_delimiter(b';')
            .read(raw.as_bytes())
            .unwrap();
        assert_eq!(manifest.rows.len(), 1);
        assert_eq!(manifest.rows[0].field(1), "x;y");
    }

    #[test]
    fn blank_lines_count_as_dropped_rows() {
        let raw = "h1,h2,h3,h4\nP1,a.mp4,A,X\n\nP3,c.mp4,C,Z\n";
        let manifest = ManifestReader::new(4).read(raw.as_bytes()).unwrap();
        let positions: Vec<usize> = manifest.rows.iter().map(|row| row.position).collect();
        assert_eq!(positions, vec![0, 2]);
        assert_eq!(manifest.rows[1].field(0), "P3");
        assert_eq!(
            manifest.diagnostics,
            vec![ManifestDiagnostic {
                position: 1,
                columns: 0,
                required: 4,
            }]
        );
    }

    #[test]
    fn multiline_quoted_fields_do_not_shift_positions() {
        let raw = "h1,h2,h3,h4\nP1,a.mp4,\"two\nlines\",X\nP2,b.mp4,B,Y\n\n\nP5,e.mp4,E,Z\n";
        let manifest = ManifestReader::new(4).read(raw.as_bytes()).unwrap();
        let positions: Vec<usize> = manifest.rows.iter().map(|row| row.position).collect();
        assert_eq!(positions, vec![0, 1, 4]);
        assert_eq!(manifest.rows[0].field(2), "two\nlines");
        let dropped: Vec<usize> = manifest
            .diagnostics
            .iter()
            .map(|diagnostic| diagnostic.position)
            .collect();
        assert_eq!(dropped, vec![2, 3]);
    }

    #[test]
    fn crlf_blank_lines_and_trailing_blanks() {
        let raw = "h1,h2,h3,h4\r\nP1,a.mp4,A,X\r\n\r\nP3,c.mp4,C,Z\r\n\r\n\r\n";
        let manifest = ManifestReader::new(4).read(raw.as_bytes()).unwrap();
        let positions: Vec<usize> = manifest.rows.iter().map(|row| row.position).collect();
        assert_eq!(positions, vec![0, 2]);
        assert_eq!(manifest.diagnostics.len(), 1);
        assert_eq!(manifest.diagnostics[0].position, 1);
    }

    #[test]
    fn header_only_manifest_is_empty() {
        let manifest = ManifestReader::new(4)
            .read("a,b,c,d\n".as_bytes())
            .unwrap();
        assert!(manifest.rows.is_empty());
        assert!(manifest.diagnostics.is_empty());
    }

    #[test]
    fn missing_file_is_a_manifest_error() {
        let temp = tempdir().unwrap();
        let err = ManifestReader::new(4)
            .read_path(&temp.path().join("absent.csv"))
            .unwrap_err();
        assert!(matches!(err, DatasetError::Manifest { .. }));
    }

    #[test]
    fn reads_from_disk() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("train.csv");
        std::fs::write(&path, MANIFEST).unwrap();
        let manifest = ManifestReader::new(4).read_path(&path).unwrap();
        assert_eq!(manifest.rows.len(), 2);
    }
}

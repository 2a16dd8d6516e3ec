//! CSV file loading for seed data.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use crate::models::{EMAIL_COLUMN, ID_COLUMN, SeedBatch, UserRecord, is_identifier};

#[derive(Debug, Error)]
pub enum CsvError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),
    #[error("Required column `{0}` missing from CSV header")]
    MissingColumn(&'static str),
    #[error("Column `{0}` appears more than once in CSV header")]
    DuplicateColumn(String),
    #[error("Column name `{0}` is not a valid identifier")]
    InvalidColumn(String),
}

/// Loads user records from CSV files with a header row.
pub struct CsvLoader;

impl CsvLoader {
    /// Loads every row of the file at `path`.
    ///
    /// The header is checked before any row is read: it must name an
    /// `email` column, may name an `id` column, and every name must be a
    /// plain identifier that maps onto a table column.
    pub fn load_file(path: impl AsRef<Path>) -> Result<SeedBatch, CsvError> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);

        Self::load_reader(reader)
    }

    /// Loads CSV data held in memory.
    pub fn load_bytes(data: &[u8]) -> Result<SeedBatch, CsvError> {
        Self::load_reader(std::io::Cursor::new(data))
    }

    fn load_reader(reader: impl Read) -> Result<SeedBatch, CsvError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::Headers)
            .from_reader(reader);

        let header = Header::parse(rdr.headers()?)?;

        let mut records = Vec::new();
        for row in rdr.records() {
            records.push(header.to_record(&row?));
        }

        Ok(SeedBatch::new(records))
    }
}

/// Column positions resolved from the header row.
struct Header {
    id: Option<usize>,
    email: usize,
    attributes: Vec<(usize, String)>,
}

impl Header {
    fn parse(names: &StringRecord) -> Result<Self, CsvError> {
        let mut seen = HashSet::new();
        let mut id = None;
        let mut email = None;
        let mut attributes = Vec::new();

        for (idx, name) in names.iter().enumerate() {
            if !is_identifier(name) {
                return Err(CsvError::InvalidColumn(name.to_string()));
            }
            if !seen.insert(name) {
                return Err(CsvError::DuplicateColumn(name.to_string()));
            }

            match name {
                ID_COLUMN => id = Some(idx),
                EMAIL_COLUMN => email = Some(idx),
                _ => attributes.push((idx, name.to_string())),
            }
        }

        let email = email.ok_or(CsvError::MissingColumn(EMAIL_COLUMN))?;

        Ok(Self {
            id,
            email,
            attributes,
        })
    }

    // Rows are guaranteed to be as wide as the header: the reader rejects
    // ragged rows before they reach here.
    fn to_record(&self, row: &StringRecord) -> UserRecord {
        let field = |idx: usize| row.get(idx).unwrap_or_default().to_string();

        UserRecord {
            id: self.id.map(field),
            email: field(self.email),
            attributes: self
                .attributes
                .iter()
                .map(|(idx, name)| (name.clone(), field(*idx)))
                .collect(),
        }
    }
}

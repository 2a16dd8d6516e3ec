//! Seed data sources.
//!
//! - [`CsvLoader`]: Load user records from a CSV file with a header row

mod csv_file;

pub use csv_file::{CsvError, CsvLoader};

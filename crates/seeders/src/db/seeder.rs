//! The mock user seed: insert the CSV's users, or remove them again.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::config::DEFAULT_TABLE;
use crate::models::SeedBatch;
use crate::sources::{CsvError, CsvLoader};
use crate::store::{StoreError, UserStore};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Seed data error: {0}")]
    Csv(#[from] CsvError),
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

/// Applies and reverts the users listed in a seed CSV.
///
/// The CSV is reread on every call, so `revert` always removes the users
/// the file lists now, matched by email.
#[derive(Debug)]
pub struct Seeder<S> {
    store: S,
    csv_path: PathBuf,
    table: String,
}

impl<S: UserStore> Seeder<S> {
    /// Creates a seeder that reads `csv_path` and writes to the default table.
    pub fn new(store: S, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            store,
            csv_path: csv_path.into(),
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Sets the target table.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns a reference to the store for advanced usage.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Seeds forward: bulk inserts every CSV user without its recorded id.
    ///
    /// Returns the number of rows inserted.
    pub async fn apply(&self) -> Result<u64, SeedError> {
        let batch = self.load()?;
        if batch.is_empty() {
            info!("No users in {}, nothing to seed", self.csv_path.display());
            return Ok(0);
        }

        info!("Seeding {} users into {}...", batch.len(), self.table);

        let rows = batch.without_ids();
        let inserted = self.store.bulk_insert(&self.table, &rows).await?;

        info!("Seeded {} users", inserted);
        Ok(inserted)
    }

    /// Rolls back: deletes every row whose email appears in the CSV.
    ///
    /// Returns the number of rows deleted. Nothing matching is not an error.
    pub async fn revert(&self) -> Result<u64, SeedError> {
        let batch = self.load()?;
        let emails = batch.emails();
        if emails.is_empty() {
            info!("No users in {}, nothing to remove", self.csv_path.display());
            return Ok(0);
        }

        info!("Removing {} seeded users from {}...", emails.len(), self.table);

        let deleted = self.store.destroy_by_email(&self.table, &emails).await?;

        info!("Removed {} users", deleted);
        Ok(deleted)
    }

    fn load(&self) -> Result<SeedBatch, SeedError> {
        debug!(path = %self.csv_path.display(), "loading seed users");
        Ok(CsvLoader::load_file(&self.csv_path)?)
    }
}

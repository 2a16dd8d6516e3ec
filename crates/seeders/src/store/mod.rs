//! Storage for seeded users.
//!
//! The seeder talks to the database only through [`UserStore`], so the
//! connection is always handed in by the caller. [`PgUserStore`] is the
//! PostgreSQL implementation.

mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::NewUser;

pub use postgres::PgUserStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Table name `{0}` is not a valid identifier")]
    InvalidTable(String),
    #[error("Column name `{0}` is not a valid identifier")]
    InvalidColumn(String),
    #[error("Rows in a bulk insert must share the same columns")]
    InconsistentColumns,
}

/// The two bulk operations a user seed needs from storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts all rows in one request. Either every row is stored or none is.
    /// Returns the number of rows inserted.
    async fn bulk_insert(&self, table: &str, rows: &[NewUser]) -> Result<u64, StoreError>;

    /// Deletes every row whose email is in `emails`. Returns the number of
    /// rows deleted; zero is not an error.
    async fn destroy_by_email(&self, table: &str, emails: &[String]) -> Result<u64, StoreError>;
}

#[async_trait]
impl<T: UserStore + ?Sized> UserStore for &T {
    async fn bulk_insert(&self, table: &str, rows: &[NewUser]) -> Result<u64, StoreError> {
        (**self).bulk_insert(table, rows).await
    }

    async fn destroy_by_email(&self, table: &str, emails: &[String]) -> Result<u64, StoreError> {
        (**self).destroy_by_email(table, emails).await
    }
}

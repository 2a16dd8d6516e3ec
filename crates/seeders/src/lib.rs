//! Mock user seeding.
//!
//! Loads the users listed in a CSV file and bulk inserts them into the
//! `Users` table, or removes them again by email. The database is reached
//! only through a [`UserStore`](store::UserStore) passed in by the caller.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seeders::prelude::*;
//!
//! let config = SeedConfig::from_env()?;
//! let store = PgUserStore::new(config.connect().await?);
//! let seeder = Seeder::new(store, &config.csv_path).with_table(&config.table);
//!
//! seeder.apply().await?;   // up
//! seeder.revert().await?;  // down
//! ```

pub mod config;
pub mod db;
pub mod models;
pub mod sources;
pub mod store;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::{ConfigError, SeedConfig};
    pub use crate::db::{SeedError, Seeder};
    pub use crate::models::{NewUser, SeedBatch, UserRecord};
    pub use crate::sources::{CsvError, CsvLoader};
    pub use crate::store::{PgUserStore, StoreError, UserStore};
}

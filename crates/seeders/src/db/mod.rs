//! Database seeding for mock users.
//!
//! The [`Seeder`] reads the seed CSV and applies or reverts it through a
//! [`UserStore`](crate::store::UserStore) handed in by the caller.

mod seeder;

pub use seeder::{SeedError, Seeder};

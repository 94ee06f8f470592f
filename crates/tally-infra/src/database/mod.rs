//! Vote stores and database connection management.

mod connections;
mod memory;

#[cfg(feature = "postgres")]
pub mod entity;
#[cfg(feature = "postgres")]
mod postgres_repo;

pub use connections::{DatabaseConfig, DatabaseConnections};
pub use memory::InMemoryVoteRepository;

#[cfg(feature = "postgres")]
pub use postgres_repo::PostgresVoteRepository;

//! Error types for rusqlite-conn-pool

use std::time::Duration;

use thiserror::Error;

/// Errors that may occur when building or using a connection pool
#[derive(Error, Debug)]
pub enum Error {
   /// Error from the rusqlite library. Standard rusqlite errors are converted to this variant
   #[error("Sqlite error: {0}")]
   Sqlite(#[from] rusqlite::Error),

   /// Opening one of the pool's connections failed during construction
   #[error("failed to open pooled connection #{index}: {source}")]
   Connect {
      index: usize,
      #[source]
      source: Box<dyn std::error::Error + Send + Sync>,
   },

   /// A pool must hold at least one connection
   #[error("pool size must be greater than zero")]
   InvalidPoolSize,

   /// The configured driver identifier does not name a supported driver
   #[error("unsupported driver: {0}")]
   UnsupportedDriver(String),

   /// Configuration value is missing or malformed
   #[error("invalid pool configuration: {0}")]
   InvalidConfig(String),

   /// No connection became available before the deadline
   #[error("timed out after {0:?} waiting for a pooled connection")]
   AcquireTimeout(Duration),
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

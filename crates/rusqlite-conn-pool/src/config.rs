//! Configuration for the SQLite connection pool

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Database drivers this crate knows how to open connections for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
   /// SQLite through rusqlite
   Sqlite,
}

impl FromStr for Driver {
   type Err = Error;

   fn from_str(value: &str) -> Result<Self> {
      match value.trim().to_ascii_lowercase().as_str() {
         "sqlite" | "sqlite3" => Ok(Driver::Sqlite),
         _ => Err(Error::UnsupportedDriver(value.to_string())),
      }
   }
}

impl fmt::Display for Driver {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         Driver::Sqlite => f.write_str("sqlite"),
      }
   }
}

/// Configuration for a connection pool
///
/// Deserializable from any flat key-value source, so it can sit directly
/// under a section of an application's settings file.
///
/// # Examples
///
/// ```
/// use rusqlite_conn_pool::PoolConfig;
///
/// // Customize specific fields
/// let config = PoolConfig {
///     url: "app.db".into(),
///     pool_size: 4,
///     ..Default::default()
/// };
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
   /// Driver identifier, resolved with [`Driver::from_str`]
   ///
   /// Default: `"sqlite"`
   pub driver: String,

   /// Number of connections opened when the pool is built
   ///
   /// The pool never grows or shrinks after construction.
   ///
   /// Default: 10
   pub pool_size: u32,

   /// Connection URL: a file path, a `file:` URI, or either of those prefixed
   /// with `sqlite:` / `sqlite://`
   pub url: String,

   /// Username, for drivers that authenticate. SQLite ignores it.
   pub user: Option<String>,

   /// Password, for drivers that authenticate. SQLite ignores it.
   pub password: Option<String>,

   /// How long a connection waits on a locked database before failing
   ///
   /// Default: 5000
   pub busy_timeout_ms: u64,
}

impl Default for PoolConfig {
   fn default() -> Self {
      Self {
         driver: Driver::Sqlite.to_string(),
         pool_size: 10,
         url: String::new(),
         user: None,
         password: None,
         busy_timeout_ms: 5_000,
      }
   }
}

impl PoolConfig {
   /// Check that every value is usable, returning the resolved driver
   pub fn validate(&self) -> Result<Driver> {
      let driver = self.driver.parse::<Driver>()?;

      if self.pool_size == 0 {
         return Err(Error::InvalidPoolSize);
      }

      if self.url.trim().is_empty() {
         return Err(Error::InvalidConfig("url must not be empty".into()));
      }

      Ok(driver)
   }

   /// Busy timeout as a [`Duration`]
   pub fn busy_timeout(&self) -> Duration {
      Duration::from_millis(self.busy_timeout_ms)
   }
}

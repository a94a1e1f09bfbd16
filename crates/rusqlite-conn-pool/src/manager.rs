//! Opening the connections a pool hands out

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use tracing::{debug, warn};

use crate::config::{Driver, PoolConfig};
use crate::error::Result;

/// Opens new connections on behalf of a [`Pool`](crate::Pool).
///
/// The pool calls [`connect`](ManageConnection::connect) exactly `size` times
/// while it is being built and never again.
pub trait ManageConnection: Send + Sync + 'static {
   /// The connection type this manager produces
   type Connection: Send + 'static;

   /// The error type returned when a connection cannot be opened
   type Error: std::error::Error + Send + Sync + 'static;

   /// Open a new connection
   fn connect(&self) -> std::result::Result<Self::Connection, Self::Error>;
}

/// Opens rusqlite connections to a single database file
#[derive(Debug, Clone)]
pub struct SqliteConnectionManager {
   path: PathBuf,
   flags: OpenFlags,
   busy_timeout: Duration,
}

impl SqliteConnectionManager {
   /// Manager for the database at `path`, using the default read-write-create flags
   pub fn file(path: impl AsRef<Path>) -> Self {
      Self {
         path: path.as_ref().to_path_buf(),
         flags: OpenFlags::default(),
         busy_timeout: Duration::from_secs(5),
      }
   }

   /// Build a manager from pool configuration, resolving the driver first
   pub fn from_config(config: &PoolConfig) -> Result<Self> {
      let driver = config.validate()?;
      debug!(%driver, url = %config.url, "Resolved connection manager");

      if config.user.is_some() || config.password.is_some() {
         warn!("sqlite does not authenticate; ignoring configured user and password");
      }

      Ok(Self::file(strip_scheme(&config.url)).with_busy_timeout(config.busy_timeout()))
   }

   /// Override the flags used to open each connection
   pub fn with_flags(mut self, flags: OpenFlags) -> Self {
      self.flags = flags;
      self
   }

   /// Override how long each connection waits on a locked database
   pub fn with_busy_timeout(mut self, timeout: Duration) -> Self {
      self.busy_timeout = timeout;
      self
   }

   /// Path (or `file:` URI) of the database
   pub fn path(&self) -> &Path {
      &self.path
   }

   /// Always [`Driver::Sqlite`]
   pub fn driver(&self) -> Driver {
      Driver::Sqlite
   }
}

impl ManageConnection for SqliteConnectionManager {
   type Connection = Connection;
   type Error = rusqlite::Error;

   fn connect(&self) -> std::result::Result<Connection, rusqlite::Error> {
      let conn = Connection::open_with_flags(&self.path, self.flags)?;
      conn.busy_timeout(self.busy_timeout)?;
      Ok(conn)
   }
}

/// Drop a leading `sqlite://` or `sqlite:` so the remainder opens as a path or URI
fn strip_scheme(url: &str) -> &str {
   url.strip_prefix("sqlite://")
      .or_else(|| url.strip_prefix("sqlite:"))
      .unwrap_or(url)
}

//! One-time pool initialization

use once_cell::sync::OnceCell;

use crate::manager::ManageConnection;
use crate::pool::Pool;

/// Holds at most one [`Pool`], built on first use.
///
/// Concurrent first callers block while a single initializer runs, so only
/// one set of connections is ever opened. A failed initialization leaves the
/// cell empty and the next caller tries again.
///
/// ```no_run
/// use rusqlite_conn_pool::{PoolCell, PoolConfig, Pool, SqliteConnectionManager};
///
/// static POOL: PoolCell<SqliteConnectionManager> = PoolCell::new();
///
/// let config = PoolConfig { url: "app.db".into(), ..Default::default() };
/// let pool = POOL.get_or_try_init(|| Pool::from_config(&config))?;
/// # Ok::<(), rusqlite_conn_pool::Error>(())
/// ```
pub struct PoolCell<M: ManageConnection> {
   cell: OnceCell<Pool<M>>,
}

impl<M: ManageConnection> PoolCell<M> {
   pub const fn new() -> Self {
      Self {
         cell: OnceCell::new(),
      }
   }

   /// Return the pool, building it with `init` if this is the first call.
   ///
   /// `init` may fail with any error type, so callers can fold settings
   /// loading into the same step.
   pub fn get_or_try_init<F, E>(&self, init: F) -> Result<&Pool<M>, E>
   where
      F: FnOnce() -> Result<Pool<M>, E>,
   {
      self.cell.get_or_try_init(init)
   }

   /// The pool, if it has been built
   pub fn get(&self) -> Option<&Pool<M>> {
      self.cell.get()
   }
}

impl<M: ManageConnection> Default for PoolCell<M> {
   fn default() -> Self {
      Self::new()
   }
}

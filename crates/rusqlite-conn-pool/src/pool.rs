//! Fixed-size connection pool with blocking acquisition

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, trace};

use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::manager::{ManageConnection, SqliteConnectionManager};

/// A fixed set of open connections shared between threads.
///
/// ## Architecture
///
/// - **`idle`**: connections not currently checked out, behind one mutex
/// - **`available`**: condition variable signalled every time a connection
///   is returned, so blocked callers wake promptly
/// - **`size`**: number of connections opened at construction
///
/// Every connection the pool opened is either in `idle` or owned by exactly
/// one [`PooledConnection`]. Cloning a `Pool` clones the handle, not the
/// connections.
///
/// ## Usage Pattern
///
/// ```text
/// 1. Build once at startup (opens `size` connections)
/// 2. acquire() blocks until a connection is free
/// 3. Use the guard like a connection
/// 4. Drop the guard (or call release) to hand it back
/// ```
pub struct Pool<M: ManageConnection> {
   inner: Arc<PoolInner<M>>,
}

struct PoolInner<M: ManageConnection> {
   manager: M,
   idle: Mutex<Vec<M::Connection>>,
   available: Condvar,
   size: usize,
}

/// Point-in-time view of a pool's occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
   /// Connections opened at construction
   pub size: usize,
   /// Connections waiting in the pool
   pub idle: usize,
}

impl PoolState {
   /// Connections currently checked out
   pub fn in_use(&self) -> usize {
      self.size - self.idle
   }
}

impl Pool<SqliteConnectionManager> {
   /// Build a SQLite pool from configuration
   pub fn from_config(config: &PoolConfig) -> Result<Self> {
      let manager = SqliteConnectionManager::from_config(config)?;
      Self::new(manager, config.pool_size as usize)
   }
}

impl<M: ManageConnection> Pool<M> {
   /// Open `size` connections through `manager` and pool them.
   ///
   /// Fails if `size` is zero or if any connection cannot be opened; the
   /// connections opened so far are closed when the error is returned.
   pub fn new(manager: M, size: usize) -> Result<Self> {
      if size == 0 {
         return Err(Error::InvalidPoolSize);
      }

      let mut connections = Vec::with_capacity(size);
      for index in 0..size {
         let conn = manager.connect().map_err(|e| Error::Connect {
            index,
            source: Box::new(e),
         })?;
         connections.push(conn);
      }

      debug!(size, "Connection pool established");

      Ok(Self {
         inner: Arc::new(PoolInner {
            manager,
            idle: Mutex::new(connections),
            available: Condvar::new(),
            size,
         }),
      })
   }

   /// Take a connection, blocking the calling thread until one is free.
   ///
   /// There is no ordering among waiters and no timeout; see
   /// [`acquire_timeout`](Self::acquire_timeout) for a bounded wait.
   pub fn acquire(&self) -> PooledConnection<M> {
      let mut idle = self.inner.idle.lock();
      loop {
         if let Some(conn) = idle.pop() {
            trace!(idle = idle.len(), "Connection acquired");
            return PooledConnection::new(Arc::clone(&self.inner), conn);
         }
         trace!("Pool exhausted, waiting for a connection");
         self.inner.available.wait(&mut idle);
      }
   }

   /// Take a connection if one is free right now
   pub fn try_acquire(&self) -> Option<PooledConnection<M>> {
      let conn = self.inner.idle.lock().pop()?;
      Some(PooledConnection::new(Arc::clone(&self.inner), conn))
   }

   /// Take a connection, giving up after `timeout`.
   ///
   /// A timeout too large to express as a deadline waits like [`acquire`](Self::acquire).
   pub fn acquire_timeout(&self, timeout: Duration) -> Result<PooledConnection<M>> {
      let Some(deadline) = Instant::now().checked_add(timeout) else {
         return Ok(self.acquire());
      };
      let mut idle = self.inner.idle.lock();
      loop {
         if let Some(conn) = idle.pop() {
            return Ok(PooledConnection::new(Arc::clone(&self.inner), conn));
         }
         if self.inner.available.wait_until(&mut idle, deadline).timed_out() && idle.is_empty() {
            return Err(Error::AcquireTimeout(timeout));
         }
      }
   }

   /// Hand a connection back to the pool.
   ///
   /// Equivalent to dropping the guard.
   pub fn release(&self, conn: PooledConnection<M>) {
      drop(conn);
   }

   /// Current occupancy
   pub fn state(&self) -> PoolState {
      PoolState {
         size: self.inner.size,
         idle: self.inner.idle.lock().len(),
      }
   }

   /// Number of connections the pool was built with
   pub fn size(&self) -> usize {
      self.inner.size
   }

   /// The manager that opened this pool's connections
   pub fn manager(&self) -> &M {
      &self.inner.manager
   }

   /// True when both handles refer to the same pool
   pub fn same_pool(&self, other: &Self) -> bool {
      Arc::ptr_eq(&self.inner, &other.inner)
   }
}

impl<M: ManageConnection> Clone for Pool<M> {
   fn clone(&self) -> Self {
      Self {
         inner: Arc::clone(&self.inner),
      }
   }
}

impl<M: ManageConnection> fmt::Debug for Pool<M> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("Pool").field("state", &self.state()).finish()
   }
}

impl<M: ManageConnection> PoolInner<M> {
   fn put_back(&self, conn: M::Connection) {
      let mut idle = self.idle.lock();
      idle.push(conn);
      trace!(idle = idle.len(), "Connection released");
      drop(idle);
      self.available.notify_one();
   }
}

/// RAII guard for a checked-out connection.
///
/// Derefs to the underlying connection. The connection goes back to the pool
/// when the guard is dropped, so it is released exactly once.
#[must_use = "if unused, the connection is immediately returned to the pool"]
pub struct PooledConnection<M: ManageConnection> {
   pool: Arc<PoolInner<M>>,
   conn: Option<M::Connection>,
}

impl<M: ManageConnection> PooledConnection<M> {
   fn new(pool: Arc<PoolInner<M>>, conn: M::Connection) -> Self {
      Self {
         pool,
         conn: Some(conn),
      }
   }
}

impl<M: ManageConnection> Deref for PooledConnection<M> {
   type Target = M::Connection;

   fn deref(&self) -> &Self::Target {
      // Only taken in Drop
      self.conn.as_ref().expect("connection already released")
   }
}

impl<M: ManageConnection> DerefMut for PooledConnection<M> {
   fn deref_mut(&mut self) -> &mut Self::Target {
      self.conn.as_mut().expect("connection already released")
   }
}

impl<M: ManageConnection> Drop for PooledConnection<M> {
   fn drop(&mut self) {
      if let Some(conn) = self.conn.take() {
         self.pool.put_back(conn);
      }
   }
}

impl<M: ManageConnection> fmt::Debug for PooledConnection<M> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("PooledConnection").finish_non_exhaustive()
   }
}

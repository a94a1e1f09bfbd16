//! # task-store
//!
//! Task records kept in SQLite, read through a fixed-size blocking
//! connection pool.
//!
//! The pool and executor live in their own crates
//! ([`rusqlite_conn_pool`], [`rusqlite_toolkit`]); this crate loads their
//! settings, owns the process-wide pool, and provides the [`TaskDao`].
//!
//! # Example
//!
//! ```no_run
//! use task_store::{SqliteTaskDao, TaskDao};
//!
//! // Reads task-store.toml and TASK_STORE__* variables on first use
//! let dao = SqliteTaskDao::new(task_store::shared()?);
//! let task = dao.find_by_id(1)?;
//! println!("{:?}", task.task_name);
//! # Ok::<(), task_store::Error>(())
//! ```

use rusqlite_conn_pool::{Pool, PoolCell, PoolConfig, SqliteConnectionManager};
use rusqlite_toolkit::SqlExecutor;
use tracing::debug;

mod error;
mod settings;
mod task;

pub use error::{Error, Result};
pub use settings::{DEFAULT_SETTINGS_FILE, ENV_PREFIX, Settings};
pub use task::{SqliteTaskDao, Task, TaskDao};

static SHARED_POOL: PoolCell<SqliteConnectionManager> = PoolCell::new();

/// Build an executor with its own pool.
///
/// Use this from a startup sequence that hands the executor to its
/// consumers; each call opens a new set of connections.
pub fn connect(config: &PoolConfig) -> Result<SqlExecutor> {
   Ok(SqlExecutor::new(Pool::from_config(config)?))
}

/// Executor over the process-wide pool.
///
/// The pool is built from [`Settings::load`] on the first call; later calls
/// (from any thread) reuse it. If building fails, the error is returned and
/// the next call tries again.
pub fn shared() -> Result<SqlExecutor> {
   let pool = SHARED_POOL.get_or_try_init(|| {
      let settings = Settings::load()?;
      debug!(url = %settings.database.url, "Initializing shared pool");
      Ok::<_, Error>(Pool::from_config(&settings.database)?)
   })?;

   Ok(SqlExecutor::new(pool.clone()))
}

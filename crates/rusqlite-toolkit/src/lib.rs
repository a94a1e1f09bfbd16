//! # rusqlite-toolkit
//!
//! Parameterized SQL execution on top of [`rusqlite_conn_pool`].
//!
//! [`SqlExecutor`] offers three execution modes, each acquiring a pooled
//! connection and releasing it on every exit path:
//!
//! - **[`execute_update`](SqlExecutor::execute_update)**: one mutating statement
//! - **[`execute_query`](SqlExecutor::execute_query)**: one query whose cursor is
//!   handed to a caller-supplied callback
//! - **[`execute_batch`](SqlExecutor::execute_batch)**: one statement over many
//!   parameter rows inside a single transaction
//!
//! Parameters are JSON values bound positionally. [`SqlExecutor::lenient`]
//! wraps the executor for callers that prefer logged failures over errors.
//!
//! ```no_run
//! use rusqlite_conn_pool::PoolConfig;
//! use rusqlite_toolkit::SqlExecutor;
//! use serde_json::json;
//!
//! let config = PoolConfig { url: "app.db".into(), pool_size: 4, ..Default::default() };
//! let db = SqlExecutor::from_config(&config)?;
//!
//! db.execute_update("INSERT INTO users (id, name) VALUES (?, ?)", &[json!(1), json!("Alice")])?;
//!
//! let name: Option<String> = db.execute_query(
//!    "SELECT name FROM users WHERE id = ?",
//!    &[json!(1)],
//!    |rows| Ok(match rows.next()? {
//!       Some(row) => Some(row.get(0)?),
//!       None => None,
//!    }),
//! )?;
//! # Ok::<(), rusqlite_toolkit::Error>(())
//! ```

mod error;
mod executor;
mod lenient;
mod value;

pub use error::{Error, Result};
pub use executor::{SqlExecutor, WriteQueryResult};
pub use lenient::LenientExecutor;
pub use value::to_json;

pub use rusqlite;
pub use rusqlite_conn_pool;

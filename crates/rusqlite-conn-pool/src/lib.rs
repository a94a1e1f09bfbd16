//! # rusqlite-conn-pool
//!
//! A small, blocking connection pool for rusqlite with a fixed number of
//! connections opened once at startup.
//!
//! ## Core Types
//!
//! - **[`Pool`]**: Fixed-size pool; `acquire` blocks until a connection is free
//! - **[`PooledConnection`]**: RAII guard returning its connection on drop
//! - **[`PoolCell`]**: Builds a pool exactly once, even under concurrent first use
//! - **[`PoolConfig`]**: Driver, size, URL and credentials
//! - **[`ManageConnection`]**: Opens connections; [`SqliteConnectionManager`] for SQLite
//! - **[`Error`]**: Error type for pool operations
//!
//! ## Architecture
//!
//! - **Eager**: every connection is opened when the pool is built
//! - **Fixed**: no growth, shrinking, health checks or eviction
//! - **Exclusive**: a connection belongs to the idle list or to exactly one guard
//! - **Blocking**: waiters park on a condition variable and wake on release

mod cell;
mod config;
mod error;
mod manager;
mod pool;

// Re-export public types
pub use cell::PoolCell;
pub use config::{Driver, PoolConfig};
pub use error::{Error, Result};
pub use manager::{ManageConnection, SqliteConnectionManager};
pub use pool::{Pool, PoolState, PooledConnection};

pub use rusqlite;

use indexmap::IndexMap;
use rusqlite::{Connection, Row, Rows, Statement, TransactionBehavior};
use rusqlite_conn_pool::{Pool, PoolConfig, SqliteConnectionManager};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::lenient::LenientExecutor;
use crate::value::{to_json, to_sql_value};
use crate::{Error, Result};

/// Result returned from write operations (e.g. INSERT, UPDATE, DELETE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteQueryResult {
   /// The number of rows affected by the write operation.
   pub rows_affected: u64,
   /// The last inserted row ID (SQLite ROWID).
   ///
   /// Only meaningful after an INSERT into a table with a ROWID; otherwise it
   /// carries whatever the connection last inserted (0 on a fresh connection).
   pub last_insert_id: i64,
}

/// Runs parameterized SQL on connections borrowed from a pool.
///
/// Every operation follows the same protocol: acquire a connection, prepare
/// the statement, bind parameters positionally, execute, then release. The
/// statement is finalized and the connection handed back on every exit
/// path, including errors raised by row callbacks.
///
/// Cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct SqlExecutor {
   pool: Pool<SqliteConnectionManager>,
}

impl SqlExecutor {
   pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
      Self { pool }
   }

   /// Build the pool described by `config` and wrap it
   pub fn from_config(config: &PoolConfig) -> Result<Self> {
      Ok(Self::new(Pool::from_config(config)?))
   }

   /// The pool this executor draws connections from
   pub fn pool(&self) -> &Pool<SqliteConnectionManager> {
      &self.pool
   }

   /// Adapter that logs failures and returns defaults instead of errors
   pub fn lenient(&self) -> LenientExecutor<'_> {
      LenientExecutor::new(self)
   }

   /// Execute a single write statement (INSERT/UPDATE/DELETE/DDL)
   pub fn execute_update(&self, sql: &str, params: &[JsonValue]) -> Result<WriteQueryResult> {
      debug!(sql, params = params.len(), "Executing update");
      let conn = self.pool.acquire();

      let mut stmt = conn.prepare(sql)?;
      let result = bind_params(&mut stmt, params).and_then(|()| Ok(stmt.raw_execute()?));
      finalize(stmt);

      Ok(WriteQueryResult {
         rows_affected: result? as u64,
         last_insert_id: conn.last_insert_rowid(),
      })
   }

   /// Execute a query and hand the live cursor to `callback`.
   ///
   /// The callback is invoked exactly once and decides how many rows to
   /// read; nothing is buffered here. Its return value (or error) becomes the
   /// result of the call.
   pub fn execute_query<T, F>(&self, sql: &str, params: &[JsonValue], callback: F) -> Result<T>
   where
      F: FnOnce(&mut Rows<'_>) -> Result<T>,
   {
      debug!(sql, params = params.len(), "Executing query");
      let conn = self.pool.acquire();

      let mut stmt = conn.prepare(sql)?;
      let result = bind_params(&mut stmt, params).and_then(|()| {
         let mut rows = stmt.raw_query();
         callback(&mut rows)
      });
      finalize(stmt);

      result
   }

   /// Execute one statement once per parameter row inside a single transaction.
   ///
   /// Rows run in order and the returned vector holds one affected-row count
   /// per input row. The transaction commits once after the last row; any
   /// failure rolls the whole batch back.
   pub fn execute_batch(&self, sql: &str, params_list: &[Vec<JsonValue>]) -> Result<Vec<usize>> {
      if params_list.is_empty() {
         return Ok(Vec::new());
      }

      debug!(sql, rows = params_list.len(), "Executing batch");
      let mut conn = self.pool.acquire();

      let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

      // Execute all rows, collecting results and rolling back on error
      match run_batch(&tx, sql, params_list) {
         Ok(counts) => {
            tx.commit()?;
            debug!(rows = counts.len(), "Batch committed");
            Ok(counts)
         }
         Err(e) => {
            warn!(error = %e, "Batch failed, rolling back");
            match tx.rollback() {
               // Rollback succeeded, return original error
               Ok(()) => Err(e),

               // Rollback also failed, return the rollback error and the original error
               Err(rollback_err) => Err(Error::TransactionRollbackFailed {
                  transaction_error: e.to_string(),
                  rollback_error: rollback_err.to_string(),
               }),
            }
         }
      }
   }

   /// Execute a SELECT query, decoding every row to an ordered column map
   pub fn fetch_all(
      &self,
      sql: &str,
      params: &[JsonValue],
   ) -> Result<Vec<IndexMap<String, JsonValue>>> {
      self.execute_query(sql, params, |rows| {
         let mut values = Vec::new();
         while let Some(row) = rows.next()? {
            values.push(decode_row(row)?);
         }
         Ok(values)
      })
   }

   /// Execute a SELECT query expecting zero or one result.
   ///
   /// Reads at most two rows; a second row fails with
   /// [`Error::MultipleRowsReturned`]`(2)` without scanning the rest.
   pub fn fetch_one(
      &self,
      sql: &str,
      params: &[JsonValue],
   ) -> Result<Option<IndexMap<String, JsonValue>>> {
      self.execute_query(sql, params, |rows| {
         let Some(row) = rows.next()? else {
            return Ok(None);
         };
         let first = decode_row(row)?;

         match rows.next()? {
            None => Ok(Some(first)),
            Some(_) => Err(Error::MultipleRowsReturned(2)),
         }
      })
   }
}

fn run_batch(conn: &Connection, sql: &str, params_list: &[Vec<JsonValue>]) -> Result<Vec<usize>> {
   let mut stmt = conn.prepare(sql)?;

   let result = params_list
      .iter()
      .map(|params| {
         bind_params(&mut stmt, params)?;
         Ok(stmt.raw_execute()?)
      })
      .collect::<Result<Vec<usize>>>();

   finalize(stmt);
   result
}

/// Bind `params` positionally, refusing a count that differs from the placeholders
fn bind_params(stmt: &mut Statement<'_>, params: &[JsonValue]) -> Result<()> {
   let expected = stmt.parameter_count();
   if expected != params.len() {
      return Err(Error::ParameterCountMismatch {
         expected,
         actual: params.len(),
      });
   }

   for (i, value) in params.iter().enumerate() {
      stmt.raw_bind_parameter(i + 1, to_sql_value(value))?;
   }
   Ok(())
}

/// Finalize a statement, logging rather than returning a failure so it never
/// masks the error of the operation that used it
fn finalize(stmt: Statement<'_>) {
   if let Err(e) = stmt.finalize() {
      warn!(error = %e, "Failed to finalize statement");
   }
}

fn decode_row(row: &Row<'_>) -> Result<IndexMap<String, JsonValue>> {
   let stmt: &Statement<'_> = row.as_ref();
   let names = stmt.column_names();
   let mut value = IndexMap::with_capacity(names.len());
   for (i, name) in names.into_iter().enumerate() {
      value.insert(name.to_string(), to_json(row.get_ref(i)?));
   }
   Ok(value)
}

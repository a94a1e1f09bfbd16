//! Log-only adapter over [`SqlExecutor`]
//!
//! For call sites that treat a failed statement like one that did nothing:
//! every failure is logged at `error` level and replaced with a default. The
//! connection is still returned to the pool on every path.

use rusqlite::Rows;
use serde_json::Value as JsonValue;
use tracing::error;

use crate::Result;
use crate::executor::SqlExecutor;

/// Borrowed view of an executor that swallows errors.
///
/// Obtained with [`SqlExecutor::lenient`].
#[derive(Debug, Clone, Copy)]
pub struct LenientExecutor<'a> {
   inner: &'a SqlExecutor,
}

impl<'a> LenientExecutor<'a> {
   pub(crate) fn new(inner: &'a SqlExecutor) -> Self {
      Self { inner }
   }

   /// Affected-row count, or 0 if the statement failed
   pub fn execute_update(&self, sql: &str, params: &[JsonValue]) -> u64 {
      match self.inner.execute_update(sql, params) {
         Ok(result) => result.rows_affected,
         Err(e) => {
            error!(sql, error = %e, code = %e.error_code(), "Update failed");
            0
         }
      }
   }

   /// Run `callback` over the cursor; failures (including the callback's) are logged
   pub fn execute_query<F>(&self, sql: &str, params: &[JsonValue], callback: F)
   where
      F: FnOnce(&mut Rows<'_>) -> Result<()>,
   {
      if let Err(e) = self.inner.execute_query(sql, params, callback) {
         error!(sql, error = %e, code = %e.error_code(), "Query failed");
      }
   }

   /// Per-row counts, or an empty vector if the batch was rolled back
   pub fn execute_batch(&self, sql: &str, params_list: &[Vec<JsonValue>]) -> Vec<usize> {
      self.inner
         .execute_batch(sql, params_list)
         .unwrap_or_else(|e| {
            error!(sql, error = %e, code = %e.error_code(), "Batch failed");
            Vec::new()
         })
   }
}

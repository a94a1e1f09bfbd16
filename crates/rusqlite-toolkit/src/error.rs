/// Result type alias for toolkit operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for SQL execution.
///
/// Row callbacks return this type too, so a callback failure travels the
/// same path as a driver failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Error from rusqlite operations.
   #[error(transparent)]
   Sqlite(#[from] rusqlite::Error),

   /// Error from the connection pool.
   #[error(transparent)]
   Pool(#[from] rusqlite_conn_pool::Error),

   /// Number of bound values differs from the statement's placeholders.
   #[error("statement has {expected} placeholders but {actual} values were supplied")]
   ParameterCountMismatch { expected: usize, actual: usize },

   /// Multiple rows returned from fetch_one query.
   #[error("fetch_one() query returned {0} rows, expected 0 or 1")]
   MultipleRowsReturned(usize),

   /// Batch failed and rollback also failed.
   #[error("transaction failed: {transaction_error}; rollback also failed: {rollback_error}")]
   TransactionRollbackFailed {
      transaction_error: String,
      rollback_error: String,
   },

   /// Generic error for operations that don't fit other categories.
   #[error("{0}")]
   Other(String),
}

impl Error {
   /// Extract a structured error code from the error type.
   ///
   /// This provides machine-readable error codes for error handling.
   pub fn error_code(&self) -> String {
      match self {
         Error::Sqlite(e) => match e.sqlite_error() {
            Some(code) => format!("SQLITE_{}", code.extended_code),
            None => "RUSQLITE_ERROR".to_string(),
         },
         Error::Pool(rusqlite_conn_pool::Error::AcquireTimeout(_)) => {
            "ACQUIRE_TIMEOUT".to_string()
         }
         Error::Pool(_) => "CONNECTION_ERROR".to_string(),
         Error::ParameterCountMismatch { .. } => "PARAMETER_COUNT_MISMATCH".to_string(),
         Error::MultipleRowsReturned(_) => "MULTIPLE_ROWS_RETURNED".to_string(),
         Error::TransactionRollbackFailed { .. } => "TRANSACTION_ROLLBACK_FAILED".to_string(),
         Error::Other(_) => "ERROR".to_string(),
      }
   }
}

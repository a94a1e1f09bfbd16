/// Errors surfaced by the task store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
   /// Settings file or environment could not be read or deserialized.
   #[error("failed to load settings: {0}")]
   Config(#[from] config::ConfigError),

   /// Pool could not be built from the settings.
   #[error(transparent)]
   Pool(#[from] rusqlite_conn_pool::Error),

   /// Statement execution failed.
   #[error(transparent)]
   Toolkit(#[from] rusqlite_toolkit::Error),
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;

//! Application settings loaded from `task-store.toml` and the environment

use std::path::Path;

use config::{Environment, File, FileFormat};
use rusqlite_conn_pool::PoolConfig;
use serde::Deserialize;

use crate::Result;

/// Basename of the settings file looked up in the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "task-store";

/// Prefix of environment overrides, e.g. `TASK_STORE__DATABASE__POOL_SIZE=4`.
pub const ENV_PREFIX: &str = "TASK_STORE";

/// Top-level settings.
///
/// ```toml
/// [database]
/// driver = "sqlite"
/// pool_size = 10
/// url = "data/tasks.db"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
   #[serde(default)]
   pub database: PoolConfig,
}

impl Settings {
   /// Load `task-store.toml` (if present) layered with `TASK_STORE__*` variables
   pub fn load() -> Result<Self> {
      Self::build(
         File::with_name(DEFAULT_SETTINGS_FILE).required(false),
         env_source(),
      )
   }

   /// Load a specific TOML file layered with `TASK_STORE__*` variables
   pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
      let path = path.as_ref().to_string_lossy();
      Self::build(File::new(&path, FileFormat::Toml), env_source())
   }

   fn build(
      file: File<config::FileSourceFile, FileFormat>,
      env: Environment,
   ) -> Result<Self> {
      let settings = config::Config::builder()
         .add_source(file)
         .add_source(env)
         .build()?
         .try_deserialize::<Settings>()?;

      settings.database.validate()?;
      Ok(settings)
   }
}

fn env_source() -> Environment {
   Environment::with_prefix(ENV_PREFIX)
      .separator("__")
      .try_parsing(true)
}

//! Task records and their data-access object

use rusqlite_toolkit::SqlExecutor;
use rusqlite_toolkit::rusqlite::Row;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::Result;

const FIND_BY_ID: &str = "SELECT task_id, task_name, create_time, start_time, finish_time, \
   task_type, task_status, task_param FROM task WHERE task_id = ?";

/// One row of the `task` table.
///
/// Every column but the id is stored as text. A default `Task` (id 0, every
/// field unset) is what a lookup of a missing id produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
   pub task_id: i64,
   pub task_name: Option<String>,
   pub create_time: Option<String>,
   pub start_time: Option<String>,
   pub finish_time: Option<String>,
   pub task_type: Option<String>,
   pub task_status: Option<String>,
   /// Serialized task parameters, usually JSON
   pub task_param: Option<String>,
}

impl Task {
   fn from_row(row: &Row<'_>) -> rusqlite_toolkit::rusqlite::Result<Self> {
      Ok(Self {
         task_id: row.get(0)?,
         task_name: row.get(1)?,
         create_time: row.get(2)?,
         start_time: row.get(3)?,
         finish_time: row.get(4)?,
         task_type: row.get(5)?,
         task_status: row.get(6)?,
         task_param: row.get(7)?,
      })
   }
}

/// Data access for tasks
pub trait TaskDao {
   /// Look up a task by primary key.
   ///
   /// A missing row is not an error: it yields [`Task::default()`].
   fn find_by_id(&self, task_id: i64) -> Result<Task>;
}

/// [`TaskDao`] over a pooled SQLite executor
#[derive(Debug, Clone)]
pub struct SqliteTaskDao {
   executor: SqlExecutor,
}

impl SqliteTaskDao {
   pub fn new(executor: SqlExecutor) -> Self {
      Self { executor }
   }
}

impl TaskDao for SqliteTaskDao {
   fn find_by_id(&self, task_id: i64) -> Result<Task> {
      let task = self
         .executor
         .execute_query(FIND_BY_ID, &[json!(task_id)], |rows| match rows.next()? {
            Some(row) => Ok(Some(Task::from_row(row)?)),
            None => Ok(None),
         })?;

      Ok(task.unwrap_or_else(|| {
         debug!(task_id, "No task found");
         Task::default()
      }))
   }
}

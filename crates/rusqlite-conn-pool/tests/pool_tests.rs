//! Integration tests for pool exclusivity and one-time initialization.

use std::convert::Infallible;
use std::sync::Barrier;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use rusqlite_conn_pool::{
   Error, ManageConnection, Pool, PoolCell, PoolConfig, SqliteConnectionManager,
};
use tempfile::TempDir;

/// Hands out connection ids 0..n and counts how many were opened.
#[derive(Default)]
struct CountingManager {
   opened: AtomicUsize,
}

impl ManageConnection for CountingManager {
   type Connection = usize;
   type Error = Infallible;

   fn connect(&self) -> Result<usize, Infallible> {
      Ok(self.opened.fetch_add(1, Ordering::SeqCst))
   }
}

fn init_tracing() {
   let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Fails on the second connection.
struct FlakyManager;

impl ManageConnection for FlakyManager {
   type Connection = ();
   type Error = std::io::Error;

   fn connect(&self) -> Result<(), std::io::Error> {
      static CALLS: AtomicUsize = AtomicUsize::new(0);
      if CALLS.fetch_add(1, Ordering::SeqCst) == 1 {
         return Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused"));
      }
      Ok(())
   }
}

// ============================================================================
// Exclusivity
// ============================================================================

#[test]
fn test_no_connection_is_held_twice_under_contention() {
   const SIZE: usize = 4;
   const THREADS: usize = 16;
   const ROUNDS: usize = 200;

   init_tracing();
   let pool = Pool::new(CountingManager::default(), SIZE).unwrap();
   let held: Vec<AtomicBool> = (0..SIZE).map(|_| AtomicBool::new(false)).collect();
   // Guards currently held by the workers; raised after acquire, lowered before release
   let in_hand = AtomicUsize::new(0);
   let max_in_hand = AtomicUsize::new(0);

   thread::scope(|s| {
      for _ in 0..THREADS {
         s.spawn(|| {
            for _ in 0..ROUNDS {
               let conn = pool.acquire();
               let id = *conn;

               let was_held = held[id].swap(true, Ordering::SeqCst);
               assert!(!was_held, "connection {id} handed to two callers");

               let now = in_hand.fetch_add(1, Ordering::SeqCst) + 1;
               assert!(now <= SIZE, "{now} connections held from a pool of {SIZE}");
               max_in_hand.fetch_max(now, Ordering::SeqCst);

               thread::yield_now();
               in_hand.fetch_sub(1, Ordering::SeqCst);
               held[id].store(false, Ordering::SeqCst);
               pool.release(conn);
            }
         });
      }
   });

   assert_eq!(in_hand.load(Ordering::SeqCst), 0);
   assert_eq!(pool.state().idle, SIZE);
   assert!(max_in_hand.load(Ordering::SeqCst) <= SIZE);
   assert_eq!(pool.manager().opened.load(Ordering::SeqCst), SIZE);
}

#[test]
fn test_held_and_idle_connections_add_up_to_size() {
   const SIZE: usize = 3;

   init_tracing();
   let pool = Pool::new(CountingManager::default(), SIZE).unwrap();
   let mut guards = Vec::new();

   for held in 1..=SIZE {
      guards.push(pool.acquire());
      assert_eq!(guards.len() + pool.state().idle, SIZE);
      assert_eq!(pool.state().idle, SIZE - held);
   }
   assert!(pool.try_acquire().is_none());

   let mut ids: Vec<usize> = guards.iter().map(|g| **g).collect();
   ids.sort_unstable();
   assert_eq!(ids, (0..SIZE).collect::<Vec<_>>());

   while let Some(guard) = guards.pop() {
      pool.release(guard);
      assert_eq!(guards.len() + pool.state().idle, SIZE);
   }
   assert_eq!(pool.state().idle, SIZE);
}

#[test]
fn test_blocked_acquire_wakes_on_release() {
   init_tracing();
   let pool = Pool::new(CountingManager::default(), 1).unwrap();
   let held = pool.acquire();

   thread::scope(|s| {
      let waiter = s.spawn(|| {
         let conn = pool.acquire();
         *conn
      });

      thread::sleep(Duration::from_millis(50));
      assert!(!waiter.is_finished(), "acquire should block while exhausted");

      drop(held);
      assert_eq!(waiter.join().unwrap(), 0);
   });

   assert_eq!(pool.state().idle, 1);
}

#[test]
fn test_failed_connection_aborts_construction() {
   init_tracing();
   let err = Pool::new(FlakyManager, 3).unwrap_err();
   assert!(matches!(err, Error::Connect { index: 1, .. }));
   assert!(err.to_string().contains("refused"));
}

// ============================================================================
// One-time initialization
// ============================================================================

#[test]
fn test_pool_cell_initializes_once_under_concurrent_first_use() {
   const SIZE: usize = 3;
   const THREADS: usize = 8;

   let cell: PoolCell<CountingManager> = PoolCell::new();
   let inits = AtomicUsize::new(0);
   let barrier = Barrier::new(THREADS);

   let pools: Vec<Pool<CountingManager>> = thread::scope(|s| {
      let handles: Vec<_> = (0..THREADS)
         .map(|_| {
            s.spawn(|| {
               barrier.wait();
               cell
                  .get_or_try_init(|| {
                     inits.fetch_add(1, Ordering::SeqCst);
                     Pool::new(CountingManager::default(), SIZE)
                  })
                  .unwrap()
                  .clone()
            })
         })
         .collect();
      handles.into_iter().map(|h| h.join().unwrap()).collect()
   });

   assert_eq!(inits.load(Ordering::SeqCst), 1);
   assert!(pools.iter().all(|p| p.same_pool(&pools[0])));
   assert_eq!(pools[0].manager().opened.load(Ordering::SeqCst), SIZE);
}

#[test]
fn test_pool_cell_retries_after_failed_init() {
   let cell: PoolCell<CountingManager> = PoolCell::new();

   let err = cell.get_or_try_init(|| Err(Error::InvalidPoolSize));
   assert!(err.is_err());
   assert!(cell.get().is_none());

   let pool = cell
      .get_or_try_init(|| Pool::new(CountingManager::default(), 2))
      .unwrap();
   assert_eq!(pool.size(), 2);
   assert!(cell.get().unwrap().same_pool(pool));
}

// ============================================================================
// SQLite
// ============================================================================

#[test]
fn test_sqlite_pool_connections_share_one_file() {
   init_tracing();
   let temp_dir = TempDir::new().unwrap();
   let config = PoolConfig {
      url: temp_dir.path().join("shared.db").to_string_lossy().into_owned(),
      pool_size: 2,
      ..Default::default()
   };

   let pool = Pool::from_config(&config).unwrap();
   assert_eq!(pool.size(), 2);

   let writer = pool.acquire();
   let reader = pool.acquire();

   writer
      .execute_batch("CREATE TABLE t (id INTEGER); INSERT INTO t VALUES (7);")
      .unwrap();
   let id: i64 = reader.query_row("SELECT id FROM t", [], |r| r.get(0)).unwrap();
   assert_eq!(id, 7);
}

#[test]
fn test_sqlite_pool_rejects_unknown_driver() {
   let config = PoolConfig {
      driver: "mysql".into(),
      url: "unused.db".into(),
      ..Default::default()
   };

   let err = Pool::<SqliteConnectionManager>::from_config(&config).unwrap_err();
   assert!(matches!(err, Error::UnsupportedDriver(_)));
}

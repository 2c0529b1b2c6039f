//! Data access object for sleep nights.
//!
//! View-states only see the [`SleepDatabaseDao`] trait. The SQLite
//! implementation runs every statement on tokio's blocking pool, which is the
//! storage worker, and republishes the full night list after each write.

use crate::db::initialize::init_db;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::night::SleepNight;
use async_trait::async_trait;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::debug;

/// Storage contract consumed by the view-states.
#[async_trait]
pub trait SleepDatabaseDao: Send + Sync {
    /// Insert a night, returning its generated id.
    async fn insert(&self, night: &SleepNight) -> AppResult<i64>;

    /// Update an existing night (matched by id).
    async fn update(&self, night: &SleepNight) -> AppResult<()>;

    /// Load a night by id.
    async fn get(&self, key: i64) -> AppResult<Option<SleepNight>>;

    /// Delete every night.
    async fn clear(&self) -> AppResult<()>;

    /// Most recently created night, or `None` on an empty store.
    async fn get_tonight(&self) -> AppResult<Option<SleepNight>>;

    /// Live, newest-first view of all nights.
    fn get_all_nights(&self) -> watch::Receiver<Vec<SleepNight>>;
}

pub struct SqliteSleepDao {
    pool: Arc<Mutex<DbPool>>,
    nights_tx: watch::Sender<Vec<SleepNight>>,
}

impl SqliteSleepDao {
    /// Open (and migrate) the database at `path`.
    pub fn open(path: &str) -> AppResult<Self> {
        let pool = if path == ":memory:" {
            DbPool::in_memory()?
        } else {
            DbPool::new(path)?
        };
        Self::from_pool(pool)
    }

    pub fn in_memory() -> AppResult<Self> {
        Self::from_pool(DbPool::in_memory()?)
    }

    fn from_pool(pool: DbPool) -> AppResult<Self> {
        init_db(&pool.conn)?;
        let nights = queries::load_all_nights(&pool.conn)?;
        let (nights_tx, _) = watch::channel(nights);

        Ok(Self {
            pool: Arc::new(Mutex::new(pool)),
            nights_tx,
        })
    }

    /// Run `f` on the storage worker with exclusive access to the connection.
    async fn run_blocking<F, T>(&self, op: &'static str, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        debug!(op, "storage call");
        let pool = Arc::clone(&self.pool);
        tokio::task::spawn_blocking(move || {
            let guard = pool
                .lock()
                .map_err(|_| AppError::Other("storage connection lock poisoned".into()))?;
            f(&guard.conn)
        })
        .await?
    }

    /// Run a write and republish the night list it produced.
    async fn write<F, T>(&self, op: &'static str, f: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let (out, nights) = self
            .run_blocking(op, move |conn| {
                let out = f(conn)?;
                let nights = queries::load_all_nights(conn)?;
                Ok((out, nights))
            })
            .await?;

        self.nights_tx.send_replace(nights);
        Ok(out)
    }
}

#[async_trait]
impl SleepDatabaseDao for SqliteSleepDao {
    async fn insert(&self, night: &SleepNight) -> AppResult<i64> {
        let night = night.clone();
        self.write("insert", move |conn| {
            let id = queries::insert_night(conn, &night)?;
            ttlog(conn, "insert", &id.to_string(), "Sleep night started")?;
            Ok(id)
        })
        .await
    }

    async fn update(&self, night: &SleepNight) -> AppResult<()> {
        let night = night.clone();
        self.write("update", move |conn| {
            if queries::update_night(conn, &night)? == 0 {
                return Err(AppError::NightNotFound(night.night_id));
            }
            ttlog(
                conn,
                "update",
                &night.night_id.to_string(),
                &format!(
                    "end={} quality={}",
                    night.end_time_milli, night.sleep_quality
                ),
            )?;
            Ok(())
        })
        .await
    }

    async fn get(&self, key: i64) -> AppResult<Option<SleepNight>> {
        self.run_blocking("get", move |conn| queries::get_night(conn, key))
            .await
    }

    async fn clear(&self) -> AppResult<()> {
        self.write("clear", |conn| {
            let n = queries::clear_nights(conn)?;
            ttlog(conn, "clear", "", &format!("Deleted {n} nights"))?;
            Ok(())
        })
        .await
    }

    async fn get_tonight(&self) -> AppResult<Option<SleepNight>> {
        self.run_blocking("get_tonight", queries::get_tonight).await
    }

    fn get_all_nights(&self) -> watch::Receiver<Vec<SleepNight>> {
        self.nights_tx.subscribe()
    }
}

use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::{error, info};
use rusqlite::{params, Connection};
use tokio::sync::oneshot;

mod migrations;

use migrations::run_migrations;

use crate::models::{BookmarkedItem, InsightTag, NewsItem};

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct DatabaseInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                error!("Failed to send shutdown to DB thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join DB thread: {join_err:?}");
            }
        }
    }
}

fn parse_datetime(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| anyhow!("invalid datetime '{value}': {err}"))
}

fn tag_from_str(value: &str) -> Result<InsightTag> {
    match value {
        "Risk" => Ok(InsightTag::Risk),
        "Opportunity" => Ok(InsightTag::Opportunity),
        "Neutral" => Ok(InsightTag::Neutral),
        _ => Err(anyhow!("unknown insight tag '{value}'")),
    }
}

/// Handle to the SQLite store. All access funnels through a single dedicated
/// worker thread, so callers never touch the connection concurrently.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
    db_path: Arc<PathBuf>,
}

impl Database {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = db_path.clone();

        let worker = thread::Builder::new()
            .name("marketbrief-db".into())
            .spawn(move || {
                let mut conn = match Connection::open(&path_for_thread) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow::Error::new(err)
                            .context("failed to open SQLite database")));
                        return;
                    }
                };

                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("Failed to enable WAL mode: {err}");
                }
                if let Err(err) = conn.pragma_update(None, "foreign_keys", "ON") {
                    error!("Failed to enable foreign keys: {err}");
                }

                let init_result =
                    run_migrations(&mut conn).context("failed to run database migrations");
                if ready_tx.send(init_result).is_err() {
                    error!("DB initialization receiver dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => {
                            task(&mut conn);
                        }
                        DbCommand::Shutdown => break,
                    }
                }

                info!("Database thread shutting down");
            })
            .with_context(|| "failed to spawn database worker thread")?;

        ready_rx
            .recv()
            .context("database worker exited before signaling readiness")??;

        info!("Database initialized at {}", db_path.as_path().display());

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            db_path: Arc::new(db_path),
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.inner.sender.clone();
        let (reply_tx, reply_rx) = oneshot::channel();

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("DB caller dropped before receiving result");
            }
        }));

        sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to DB thread: {err}"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("database thread terminated unexpectedly"))?
    }

    /// Insert a bookmark row. The UNIQUE constraint on the identity key makes
    /// re-inserting an existing bookmark a no-op.
    pub async fn insert_bookmark(&self, bookmark: &BookmarkedItem) -> Result<()> {
        let record = bookmark.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO bookmarks
                    (title, summary, stock, sector, tag, source, time, note, saved_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.item.title,
                    record.item.summary,
                    record.item.stock,
                    record.item.sector,
                    record.item.tag.as_str(),
                    record.item.source,
                    record.item.time,
                    record.note,
                    record.saved_at.to_rfc3339(),
                ],
            )
            .with_context(|| "failed to insert bookmark")?;
            Ok(())
        })
        .await
    }

    pub async fn delete_bookmark(&self, item: &NewsItem) -> Result<()> {
        let (title, stock, source) = identity(item);
        self.execute(move |conn| {
            conn.execute(
                "DELETE FROM bookmarks WHERE title = ?1 AND stock = ?2 AND source = ?3",
                params![title, stock, source],
            )
            .with_context(|| "failed to delete bookmark")?;
            Ok(())
        })
        .await
    }

    /// Returns the number of rows updated (0 when the bookmark is absent).
    pub async fn update_bookmark_tag(&self, item: &NewsItem, tag: InsightTag) -> Result<usize> {
        let (title, stock, source) = identity(item);
        self.execute(move |conn| {
            let updated = conn
                .execute(
                    "UPDATE bookmarks SET tag = ?1
                     WHERE title = ?2 AND stock = ?3 AND source = ?4",
                    params![tag.as_str(), title, stock, source],
                )
                .with_context(|| "failed to update bookmark tag")?;
            Ok(updated)
        })
        .await
    }

    pub async fn update_bookmark_note(&self, item: &NewsItem, note: String) -> Result<usize> {
        let (title, stock, source) = identity(item);
        self.execute(move |conn| {
            let updated = conn
                .execute(
                    "UPDATE bookmarks SET note = ?1
                     WHERE title = ?2 AND stock = ?3 AND source = ?4",
                    params![note, title, stock, source],
                )
                .with_context(|| "failed to update bookmark note")?;
            Ok(updated)
        })
        .await
    }

    /// All saved bookmarks in insertion order.
    pub async fn list_bookmarks(&self) -> Result<Vec<BookmarkedItem>> {
        self.execute(|conn| {
            let mut stmt = conn.prepare(
                "SELECT title, summary, stock, sector, tag, source, time, note, saved_at
                 FROM bookmarks
                 ORDER BY id ASC",
            )?;

            let mut rows = stmt.query([])?;
            let mut bookmarks = Vec::new();
            while let Some(row) = rows.next()? {
                bookmarks.push(BookmarkedItem {
                    item: NewsItem {
                        title: row.get(0)?,
                        summary: row.get(1)?,
                        stock: row.get(2)?,
                        sector: row.get(3)?,
                        tag: tag_from_str(&row.get::<_, String>(4)?)?,
                        source: row.get(5)?,
                        time: row.get(6)?,
                    },
                    note: row.get(7)?,
                    saved_at: parse_datetime(&row.get::<_, String>(8)?)?,
                });
            }

            Ok(bookmarks)
        })
        .await
    }
}

fn identity(item: &NewsItem) -> (String, String, String) {
    (
        item.title.clone(),
        item.stock.clone(),
        item.source.clone(),
    )
}

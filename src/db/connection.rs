use std::{
    path::{Path, PathBuf},
    sync::mpsc,
    thread,
};

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use rusqlite::Connection;
use tokio::sync::oneshot;

use super::migrations::run_migrations;

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

/// Handle to the log store.
///
/// One SQLite connection lives on a dedicated worker thread and runs queued
/// tasks in submission order. Clones share the queue; the worker closes the
/// connection once the last handle is dropped.
#[derive(Clone)]
pub struct Database {
    tasks: mpsc::Sender<DbTask>,
}

impl Database {
    /// Opens (or creates) the database at `db_path` and brings its schema up to
    /// date before returning.
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
        }

        let (tasks, queue) = mpsc::channel::<DbTask>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();
        let worker_path = db_path.clone();

        thread::Builder::new()
            .name("dashboard-db".into())
            .spawn(move || {
                let mut conn = match open_connection(&worker_path) {
                    Ok(conn) => conn,
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                if ready_tx.send(Ok(())).is_err() {
                    return;
                }

                for task in queue {
                    task(&mut conn);
                }
                debug!("Closing log store at {}", worker_path.display());
            })
            .context("failed to spawn database worker thread")?;

        ready_rx
            .recv()
            .context("database worker exited before signaling readiness")??;

        info!("Log store opened at {}", db_path.display());
        Ok(Self { tasks })
    }

    /// Runs `task` on the worker's connection and waits for its result.
    pub async fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tasks
            .send(Box::new(move |conn| {
                let _ = reply_tx.send(task(conn));
            }))
            .map_err(|_| anyhow!("database worker is no longer running"))?;

        reply_rx
            .await
            .map_err(|_| anyhow!("database worker dropped the query"))?
    }
}

fn open_connection(path: &Path) -> Result<Connection> {
    let mut conn = Connection::open(path)
        .with_context(|| format!("failed to open SQLite database {}", path.display()))?;

    if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
        warn!("Failed to enable WAL mode: {err}");
    }

    run_migrations(&mut conn).context("failed to run database migrations")?;
    Ok(conn)
}

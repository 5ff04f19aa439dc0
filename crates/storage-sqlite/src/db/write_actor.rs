//! Single-writer actor for serialized database writes.
//!
//! SQLite allows one writer at a time; instead of letting pooled connections
//! contend for the write lock, all mutations are funneled through one actor
//! task that owns a dedicated connection and runs each job inside an
//! immediate transaction.

use std::any::Any;

use diesel::SqliteConnection;
use tokio::sync::{mpsc, oneshot};
use techfolio_core::errors::{DatabaseError, Error, Result};

use super::DbPool;
use crate::errors::StorageError;

// A write job: runs against the actor's connection, result type erased so
// one channel carries every job shape.
type Job = Box<dyn FnOnce(&mut SqliteConnection) -> Result<Box<dyn Any + Send + 'static>> + Send + 'static>;
type Reply = oneshot::Sender<Result<Box<dyn Any + Send + 'static>>>;

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<(Job, Reply)>,
}

impl WriteHandle {
    /// Executes a database job on the writer actor's dedicated connection.
    ///
    /// The job runs inside an immediate transaction; the calling task is
    /// suspended, not blocked, until the actor replies.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |conn| job(conn).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                reply_tx,
            ))
            .await
            .map_err(|_| {
                Error::Database(DatabaseError::Internal(
                    "writer actor is no longer running".to_string(),
                ))
            })?;

        let boxed = reply_rx.await.map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "writer actor dropped the reply".to_string(),
            ))
        })??;

        boxed.downcast::<T>().map(|v| *v).map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "writer actor returned an unexpected type".to_string(),
            ))
        })
    }
}

/// Spawns the writer actor and returns a handle for submitting jobs.
///
/// The actor checks out one connection from the pool and holds it for its
/// lifetime; jobs are processed strictly in submission order.
pub fn spawn_writer(pool: DbPool) -> Result<WriteHandle> {
    let (tx, mut rx) = mpsc::channel::<(Job, Reply)>(1024);

    let mut conn = super::get_connection(&pool)?;
    tokio::spawn(async move {
        while let Some((job, reply_tx)) = rx.recv().await {
            let result = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(|e: StorageError| e.into());

            // A receiver that went away simply misses its reply.
            let _ = reply_tx.send(result);
        }
        log::debug!("Writer actor channel closed, shutting down");
    });

    Ok(WriteHandle { tx })
}

//! Single-writer actor.
//!
//! SQLite allows one writer at a time, so every mutation is funnelled through a
//! Tokio task that owns one pooled connection and runs each job inside an
//! `IMMEDIATE` transaction. A job's changes are therefore applied as a whole or
//! not at all.

use std::any::Any;

use diesel::SqliteConnection;
use log::error;
use tokio::sync::{mpsc, oneshot};

use commissions_core::errors::{DatabaseError, Error, Result};

use super::DbPool;
use crate::errors::StorageError;

// Job results cross the channel with their concrete type erased; `exec`
// downcasts them back for the caller.
type Erased = Box<dyn Any + Send + 'static>;
// A unit of work run on the writer's connection. Jobs return core results,
// which is what repositories hand back to services.
type Job = Box<dyn FnOnce(&mut SqliteConnection) -> Result<Erased> + Send + 'static>;
// A job paired with the channel its result is sent back on.
type Envelope = (Job, oneshot::Sender<Result<Erased>>);

/// Jobs that may queue up before `exec` callers start waiting for a slot.
const QUEUE_DEPTH: usize = 1024;

/// Cloneable handle used by repositories to submit write jobs.
#[derive(Clone)]
pub struct WriteHandle {
    // Bounded sender feeding the actor loop in `spawn_writer`.
    tx: mpsc::Sender<Envelope>,
}

/// Error returned when the actor task is no longer receiving or replying.
fn actor_gone() -> Error {
    Error::Database(DatabaseError::Internal(
        "database writer is not running".to_string(),
    ))
}

impl WriteHandle {
    /// Runs `job` on the writer connection and waits for its result.
    ///
    /// # Arguments
    /// * `job`: closure performing the writes on the actor's connection.
    ///
    /// # Returns
    /// The job's own result, or a database error if the actor has stopped.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        // One-shot reply channel for this job only.
        let (reply_tx, reply_rx) = oneshot::channel();

        // Box the result so every job fits the same channel type.
        let erased: Job = Box::new(move |conn: &mut SqliteConnection| {
            job(conn).map(|value| Box::new(value) as Erased)
        });

        // A closed channel means the actor loop has exited.
        self.tx
            .send((erased, reply_tx))
            .await
            .map_err(|_| actor_gone())?;

        // The outer `?` covers a dropped reply sender, the inner one the job's
        // own error.
        let boxed = reply_rx.await.map_err(|_| actor_gone())??;

        // Recover the concrete type the job produced.
        boxed.downcast::<T>().map(|value| *value).map_err(|_| {
            Error::Database(DatabaseError::Internal(
                "writer returned an unexpected result type".to_string(),
            ))
        })
    }
}

/// Spawns the writer task on the current Tokio runtime.
///
/// The task holds one connection from `pool` for its whole life and runs jobs
/// strictly one after another. If no connection can be taken from the pool
/// the task exits, and every later `exec` call fails instead of hanging.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(QUEUE_DEPTH);

    tokio::spawn(async move {
        // The writer's dedicated connection. Dropping out here closes `rx`,
        // which callers observe as `actor_gone`.
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Writer could not acquire a database connection: {}", e);
                return;
            }
        };

        // Ends once every `WriteHandle` has been dropped.
        while let Some((job, reply_tx)) = rx.recv().await {
            // Run the job in an IMMEDIATE transaction. Core errors travel
            // through `StorageError::Core` so a failed job rolls back and the
            // caller still sees the original error kind.
            let result: Result<Erased> = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);

            // The caller may have gone away (request cancelled); nothing to do then.
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, get_connection, init, run_migrations};
    use crate::schema::proposals;
    use commissions_core::proposals::ProposalError;
    use diesel::prelude::*;

    fn count_rows(pool: &DbPool) -> i64 {
        let mut conn = get_connection(pool).unwrap();
        proposals::table.count().get_result(&mut conn).unwrap()
    }

    fn insert_row(conn: &mut SqliteConnection) -> Result<usize> {
        Ok(diesel::insert_into(proposals::table)
            .values((
                proposals::label.eq("264.24 – Orlando"),
                proposals::total_value.eq("24500"),
                proposals::paid_value.eq("12250"),
                proposals::commission_percent.eq("10"),
                proposals::commission_paid_value.eq("1225"),
            ))
            .execute(conn)
            .map_err(StorageError::from)?)
    }

    #[tokio::test]
    async fn test_failed_job_rolls_back_and_keeps_error_kind() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = init(dir.path().join("writer.db").to_str().unwrap()).unwrap();
        let pool = create_pool(&db_path).unwrap();
        run_migrations(&pool).unwrap();
        let writer = spawn_writer(pool.as_ref().clone());

        let inserted = writer.exec(insert_row).await.unwrap();
        assert_eq!(inserted, 1);

        let failed = writer
            .exec(|conn: &mut SqliteConnection| -> Result<()> {
                insert_row(conn)?;
                Err(ProposalError::NotFound(7).into())
            })
            .await
            .unwrap_err();

        assert!(matches!(failed, Error::Proposal(ProposalError::NotFound(7))));
        assert_eq!(count_rows(&pool), 1);
    }
}

//! Service layer running workflow rules against stored state.
//!
//! `FlowService` wraps `FlowDb` (raw database access), the configured
//! transition table and a notification sink. All repo methods are implemented
//! as `impl FlowService` blocks under `repos/`.

use std::sync::Arc;

use flow_config::FlowConfig;
use flow_core::enums::TransitionMode;
use flow_core::events::{NoopSink, NotificationSink, WorkflowEvent};
use tokio::sync::{Mutex, MutexGuard};

use crate::FlowDb;
use crate::error::DatabaseError;

/// Orchestrates database mutations with audit trail and notifications.
///
/// Every mutation method follows this protocol:
/// 1. Take the write lock
/// 2. Load current state and run the `flow-core` rule for the mutation
/// 3. Begin transaction
/// 4. Execute SQL and append the audit entry
/// 5. Commit, or roll back on any error
/// 6. Emit the workflow event, if the mutation has one
///
/// All statements share one connection, so a read issued while a mutation's
/// transaction is open sees its uncommitted rows. The composed reads
/// (`task_view`, `permissions`, `comment_tree`) take the write lock and only
/// ever see committed state. Single-table reads such as `get_task` or
/// `list_for_task` do not, because mutations call them while holding it.
pub struct FlowService {
    db: FlowDb,
    sink: Arc<dyn NotificationSink>,
    transitions: TransitionMode,
    writes: Mutex<()>,
}

impl FlowService {
    /// Open a local database and wrap it with default settings.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        Ok(Self::from_db(FlowDb::open_local(db_path).await?))
    }

    /// Open the database named by `config` and apply its workflow settings.
    ///
    /// Creates the database's parent directory when missing.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory or database cannot be created.
    pub async fn from_config(config: &FlowConfig) -> Result<Self, DatabaseError> {
        if let Some(dir) = config.database.parent_dir() {
            std::fs::create_dir_all(&dir).map_err(|e| {
                DatabaseError::Other(anyhow::anyhow!("cannot create {}: {e}", dir.display()))
            })?;
        }
        let service = Self::new_local(&config.database.path).await?;
        Ok(service.with_transitions(config.workflow.transitions))
    }

    /// Wrap an existing `FlowDb` with the open transition table and no sink.
    #[must_use]
    pub fn from_db(db: FlowDb) -> Self {
        Self {
            db,
            sink: Arc::new(NoopSink),
            transitions: TransitionMode::default(),
            writes: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn with_transitions(mut self, transitions: TransitionMode) -> Self {
        self.transitions = transitions;
        self
    }

    #[must_use]
    pub const fn db(&self) -> &FlowDb {
        &self.db
    }

    #[must_use]
    pub const fn transitions(&self) -> TransitionMode {
        self.transitions
    }

    /// Hand an event to the sink. Called only after a successful commit.
    pub(crate) fn emit(&self, event: &WorkflowEvent) {
        tracing::debug!(task_id = %event.task_id, kind = %event.kind, "emitting workflow event");
        self.sink.notify(event);
    }

    /// Serialize mutations on the shared connection. Held from the first read
    /// of a mutation until its commit, so rule checks see the state they write
    /// over.
    pub(crate) async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.writes.lock().await
    }

    /// Open a transaction on the service connection.
    ///
    /// Statements issued through `self.db().conn()` while it is open belong to
    /// it. Close it with [`finish_tx`].
    pub(crate) async fn begin(&self) -> Result<libsql::Transaction, DatabaseError> {
        Ok(self.db.conn().transaction().await?)
    }
}

/// Commit `tx` if `result` is `Ok`, otherwise roll it back and return the
/// original error.
pub(crate) async fn finish_tx<T>(
    tx: libsql::Transaction,
    result: Result<T, DatabaseError>,
) -> Result<T, DatabaseError> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::helpers::{ids, new_task, service_with_events, test_service};
    use flow_core::enums::{EventKind, WorkStatus};

    async fn user_count(svc: &FlowService) -> i64 {
        let mut rows = svc
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM users", ())
            .await
            .unwrap();
        rows.next().await.unwrap().unwrap().get::<i64>(0).unwrap()
    }

    #[tokio::test]
    async fn failed_transaction_leaves_no_trace() {
        let svc = test_service().await;
        let tx = svc.begin().await.unwrap();
        let write = svc
            .db()
            .conn()
            .execute("INSERT INTO users (id, name) VALUES ('usr-x', 'X')", ())
            .await
            .map(|_| ())
            .map_err(DatabaseError::from);
        assert!(write.is_ok());

        let result: Result<(), _> = finish_tx(tx, Err(DatabaseError::NoResult)).await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
        assert_eq!(user_count(&svc).await, 0);
    }

    #[tokio::test]
    async fn successful_transaction_commits() {
        let svc = test_service().await;
        let tx = svc.begin().await.unwrap();
        svc.db()
            .conn()
            .execute("INSERT INTO users (id, name) VALUES ('usr-x', 'X')", ())
            .await
            .unwrap();
        finish_tx(tx, Ok(())).await.unwrap();
        assert_eq!(user_count(&svc).await, 1);
    }

    #[tokio::test]
    async fn config_sets_transitions_and_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = FlowConfig::default();
        config.database.path = dir
            .path()
            .join("nested/flow.db")
            .to_string_lossy()
            .into_owned();
        config.workflow.transitions = TransitionMode::Progressive;

        let svc = FlowService::from_config(&config).await.unwrap();
        assert_eq!(svc.transitions(), TransitionMode::Progressive);
        assert!(dir.path().join("nested").is_dir());
    }

    #[tokio::test]
    async fn events_follow_successful_mutations_only() {
        let (svc, mut rx) = service_with_events().await;
        let task = svc
            .create_task("usr-a", new_task("Events"), &ids(&["usr-b"]))
            .await
            .unwrap();

        svc.set_status(&task.id, "usr-b", WorkStatus::Acknowledge)
            .await
            .unwrap();
        svc.add_comment(&task.id, "usr-c", "ping", None).await.unwrap();
        svc.replace_assignees(&task.id, &ids(&["usr-b", "usr-c"]), "usr-a")
            .await
            .unwrap();

        assert!(svc.set_status(&task.id, "usr-d", WorkStatus::Completed).await.is_err());
        assert!(svc.add_comment(&task.id, "usr-c", " ", None).await.is_err());

        let mut received = Vec::new();
        while let Ok(event) = rx.try_recv() {
            received.push((event.kind, event.actor_id));
        }
        assert_eq!(
            received,
            vec![
                (EventKind::StatusChanged, "usr-b".to_string()),
                (EventKind::CommentAdded, "usr-c".to_string()),
                (EventKind::AssigneesChanged, "usr-a".to_string()),
            ]
        );
    }
}

//! Read views composed for display: permissions and the full task view.

use flow_core::permissions::{Permissions, resolve_permissions};
use flow_core::responses::TaskView;

use crate::error::DatabaseError;
use crate::service::FlowService;

impl FlowService {
    /// Capability set of `actor_id` on `task_id`, resolved from current state.
    pub async fn permissions(&self, task_id: &str, actor_id: &str) -> Result<Permissions, DatabaseError> {
        let _writer = self.lock_writes().await;
        let task = self.get_task(task_id).await?;
        let assignments = self.list_for_task(task_id).await?;
        Ok(resolve_permissions(&task, &assignments, actor_id))
    }

    /// Everything needed to render a task for `actor_id`.
    ///
    /// Permissions are recomputed on every call. Waits for any in-flight
    /// mutation so the three reads come from the same committed state.
    pub async fn task_view(&self, task_id: &str, actor_id: &str) -> Result<TaskView, DatabaseError> {
        let _writer = self.lock_writes().await;
        let task = self.get_task(task_id).await?;
        let assignments = self.list_for_task(task_id).await?;
        let comments = self.list_by_task(task_id).await?;
        Ok(TaskView::compose(task, assignments, &comments, actor_id))
    }
}

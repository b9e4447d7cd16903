//! Shared test utilities for flow-db unit tests.

pub(crate) mod helpers {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use chrono::{Days, NaiveDate, Utc};
    use flow_core::enums::Priority;
    use flow_core::events::WorkflowEvent;
    use flow_core::validation::NewTask;
    use tokio::sync::mpsc::UnboundedReceiver;

    use crate::FlowDb;
    use crate::notify::ChannelSink;
    use crate::service::FlowService;

    /// In-memory service with no users.
    pub async fn test_service() -> FlowService {
        let db = FlowDb::open_local(":memory:").await.unwrap();
        FlowService::from_db(db)
    }

    /// In-memory service with Alice, Bob, Carol and Dave (`usr-a`..`usr-d`).
    pub async fn seeded_service() -> FlowService {
        let svc = test_service().await;
        for (id, name) in [
            ("usr-a", "Alice"),
            ("usr-b", "Bob"),
            ("usr-c", "Carol"),
            ("usr-d", "Dave"),
        ] {
            svc.upsert_user(id, name).await.unwrap();
        }
        svc
    }

    /// Seeded service whose events land in the returned receiver.
    pub async fn service_with_events() -> (FlowService, UnboundedReceiver<WorkflowEvent>) {
        let (sink, rx) = ChannelSink::channel();
        (seeded_service().await.with_sink(Arc::new(sink)), rx)
    }

    pub fn future_deadline() -> NaiveDate {
        Utc::now().date_naive() + Days::new(14)
    }

    pub fn new_task(name: &str) -> NewTask {
        NewTask {
            name: name.to_string(),
            project_id: None,
            deadline: future_deadline(),
            priority: Priority::Medium,
            remarks: None,
        }
    }

    pub fn ids(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }
}

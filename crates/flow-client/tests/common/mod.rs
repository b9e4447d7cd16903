//! Shared fixtures for backend client tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use flow_client::BackendClient;
use flow_config::BackendConfig;
use flow_core::events::{NotificationSink, WorkflowEvent};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TASK: &str = "t1";

pub fn client_for(server: &MockServer) -> BackendClient {
    BackendClient::new(&BackendConfig {
        base_url: server.uri(),
        ..BackendConfig::default()
    })
}

/// Sink that keeps every event it receives.
#[derive(Default)]
pub struct RecordingSink(Mutex<Vec<WorkflowEvent>>);

impl RecordingSink {
    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.0.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, event: &WorkflowEvent) {
        self.0.lock().unwrap().push(event.clone());
    }
}

pub fn recording_client(server: &MockServer) -> (BackendClient, Arc<RecordingSink>) {
    let sink = Arc::new(RecordingSink::default());
    let client = client_for(server).with_sink(sink.clone());
    (client, sink)
}

pub fn task_json(task_status: &str) -> Value {
    json!({
        "id": TASK,
        "name": "Quarterly report",
        "creatorId": "ua",
        "deadline": "2026-12-01",
        "priority": "High",
        "remarks": "",
        "task_status": task_status,
        "created_date": "2026-10-01"
    })
}

pub fn assignment_json(user_id: &str, name: &str, status: &str) -> Value {
    json!({"user_id": user_id, "name": name, "status": status, "is_poc": 0})
}

pub fn comment_json(id: &str, parent_id: &str, user_id: &str, body: &str, time: &str) -> Value {
    json!({
        "id": id,
        "parent_id": parent_id,
        "user_id": user_id,
        "name": user_id.to_uppercase(),
        "comment": body,
        "created_date": "2026-10-02",
        "created_time": time
    })
}

/// Serve the three read endpoints for [`TASK`].
pub async fn mount_task(server: &MockServer, task: Value, assignments: Value, comments: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/tasks/{TASK}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(task))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/tasks/{TASK}/assignments")))
        .respond_with(ResponseTemplate::new(200).set_body_json(assignments))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/tasks/{TASK}/comments")))
        .respond_with(ResponseTemplate::new(200).set_body_json(comments))
        .mount(server)
        .await;
}

/// Task created by `ua`, assigned to `ub` (in progress) and `uc` (not started).
pub async fn mount_started_task(server: &MockServer, comments: Value) {
    mount_task(
        server,
        task_json("not-acknowledge"),
        json!([
            assignment_json("ub", "Bob", "in-progress"),
            assignment_json("uc", "Carol", "not-acknowledge"),
        ]),
        comments,
    )
    .await;
}

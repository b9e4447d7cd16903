//! The assignment and comment scenario played against a stateful fake backend.

mod common;

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use common::{TASK, assignment_json, comment_json, recording_client, task_json};
use flow_client::ClientError;
use flow_core::enums::{EventKind, WorkStatus};
use flow_core::errors::WorkflowError;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

#[derive(Default)]
struct Backend {
    task_status: String,
    assignments: Vec<(String, String)>,
    comments: Vec<Value>,
}

#[derive(Clone)]
struct FakeBackend(Arc<Mutex<Backend>>);

impl Respond for FakeBackend {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.0.lock().unwrap();
        let route = request.url.path().to_string();
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        match (request.method.as_str(), route.as_str()) {
            ("GET", "/tasks/t1") => ResponseTemplate::new(200).set_body_json(task_json(&state.task_status)),
            ("GET", "/tasks/t1/assignments") => {
                let list: Vec<Value> = state
                    .assignments
                    .iter()
                    .map(|(user, status)| assignment_json(user, &user.to_uppercase(), status))
                    .collect();
                ResponseTemplate::new(200).set_body_json(list)
            }
            ("GET", "/tasks/t1/comments") => ResponseTemplate::new(200).set_body_json(state.comments.clone()),
            ("PUT", "/tasks/t1/status") => {
                let actor = body["actor_id"].as_str().unwrap_or_default().to_string();
                let status = body["status"].as_str().unwrap_or_default().to_string();
                if actor == "ua" {
                    state.task_status = status;
                } else if let Some(entry) = state.assignments.iter_mut().find(|(u, _)| *u == actor) {
                    entry.1 = status;
                }
                ResponseTemplate::new(204)
            }
            ("POST", "/tasks/t1/comments") => {
                let id = body["id"]
                    .as_str()
                    .map_or_else(|| format!("c{}", state.comments.len() + 1), String::from);
                // A repeated id is the same comment.
                if !state.comments.iter().any(|c| c["id"] == id.as_str()) {
                    let time = format!("09:0{}:00", state.comments.len());
                    state.comments.push(comment_json(
                        &id,
                        body["parent_id"].as_str().unwrap_or_default(),
                        body["actor_id"].as_str().unwrap_or_default(),
                        body["comment"].as_str().unwrap_or_default(),
                        &time,
                    ));
                }
                ResponseTemplate::new(201).set_body_json(json!({"id": id}))
            }
            _ => ResponseTemplate::new(404),
        }
    }
}

#[tokio::test]
async fn assignment_and_comment_scenario() {
    let server = MockServer::start().await;
    let backend = FakeBackend(Arc::new(Mutex::new(Backend {
        task_status: "not-acknowledge".into(),
        assignments: vec![
            ("ub".into(), "not-acknowledge".into()),
            ("uc".into(), "not-acknowledge".into()),
        ],
        comments: Vec::new(),
    })));
    Mock::given(method("GET")).respond_with(backend.clone()).mount(&server).await;
    Mock::given(method("POST")).respond_with(backend.clone()).mount(&server).await;
    Mock::given(method("PUT"))
        .and(path(format!("/tasks/{TASK}/status")))
        .respond_with(backend.clone())
        .mount(&server)
        .await;

    let (client, sink) = recording_client(&server);

    client.set_status(TASK, "ub", WorkStatus::InProgress).await.unwrap();

    let keep_only_c: BTreeSet<String> = BTreeSet::from(["uc".to_string()]);
    let err = client.replace_assignees(TASK, "ua", &keep_only_c).await.unwrap_err();
    assert!(matches!(err, ClientError::Workflow(WorkflowError::Conflict { .. })));
    let snapshot = client.fetch_snapshot(TASK).await.unwrap();
    let assigned: Vec<&str> = snapshot.assignments.iter().map(|a| a.user_id.as_str()).collect();
    assert_eq!(assigned, vec!["ub", "uc"]);

    let first = client.add_comment(TASK, "uc", "ok", None).await.unwrap();
    let reply = client
        .add_comment(TASK, "ub", "on it", Some(first.change.as_str()))
        .await
        .unwrap();
    let tree = reply.refreshed().unwrap().tree();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].comment.id, first.change);
    assert_eq!(tree[0].replies.len(), 1);
    assert_eq!(tree[0].replies[0].comment.id, reply.change);

    let applied = client.set_status(TASK, "ua", WorkStatus::Completed).await.unwrap();
    let after = applied.refreshed().unwrap();
    assert_eq!(after.task.task_status, WorkStatus::Completed);
    let bob = after
        .assignments
        .iter()
        .find(|a| a.user_id == "ub")
        .map(|a| a.status);
    assert_eq!(bob, Some(WorkStatus::InProgress));

    let kinds: Vec<EventKind> = sink.events().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::StatusChanged,
            EventKind::CommentAdded,
            EventKind::CommentAdded,
            EventKind::StatusChanged,
        ]
    );
}

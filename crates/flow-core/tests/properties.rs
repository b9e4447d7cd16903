//! Property tests for the pure workflow rules.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{NaiveDate, TimeZone, Utc};
use flow_core::assignments::{is_removable, plan_replacement};
use flow_core::comments::{build_tree, count_nodes, excluded};
use flow_core::entities::{Assignment, Comment, CommentNode, Task};
use flow_core::enums::{Priority, WorkStatus};
use flow_core::errors::WorkflowError;
use flow_core::permissions::resolve_permissions;
use proptest::prelude::*;

fn any_status() -> impl Strategy<Value = WorkStatus> {
    prop_oneof![
        Just(WorkStatus::NotAcknowledge),
        Just(WorkStatus::Acknowledge),
        Just(WorkStatus::InProgress),
        Just(WorkStatus::Completed),
        Just(WorkStatus::Other),
    ]
}

/// Flat comment lists with ids `c0..cN` whose parents point at any id in
/// `c0..c(N+3)`, so some parents never resolve.
fn any_comments() -> impl Strategy<Value = Vec<Comment>> {
    (0usize..24).prop_flat_map(|n| {
        prop::collection::vec(prop::option::of(0..n + 3), n).prop_map(|parents| {
            parents
                .into_iter()
                .enumerate()
                .map(|(i, parent)| Comment {
                    id: format!("c{i}"),
                    task_id: "tsk-1".into(),
                    author_id: "usr-a".into(),
                    author_name: "Alice".into(),
                    body: "text".into(),
                    parent_id: parent.map(|p| format!("c{p}")),
                    created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
                })
                .collect()
        })
    })
}

fn any_assignments() -> impl Strategy<Value = Vec<Assignment>> {
    prop::collection::btree_map(0u8..8, any_status(), 0..6).prop_map(|m| {
        m.into_iter()
            .map(|(user, status)| Assignment {
                status,
                ..Assignment::new("tsk-1", format!("usr-{user}"), format!("User {user}"))
            })
            .collect()
    })
}

fn task() -> Task {
    Task {
        id: "tsk-1".into(),
        name: "Task".into(),
        project_id: None,
        creator_id: "usr-0".into(),
        deadline: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        priority: Priority::Medium,
        remarks: None,
        task_status: WorkStatus::NotAcknowledge,
        created_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
    }
}

/// Whether the parent chain of `id` ends at a top-level comment.
fn reaches_root(id: &str, by_id: &HashMap<&str, &Comment>) -> bool {
    let mut seen = HashSet::new();
    let mut current = id;
    loop {
        if !seen.insert(current) {
            return false;
        }
        match by_id.get(current).and_then(|c| c.parent_id.as_deref()) {
            None => return by_id.contains_key(current),
            Some(parent) if by_id.contains_key(parent) => current = parent,
            Some(_) => return false,
        }
    }
}

fn check_parents(nodes: &[CommentNode], parent: Option<&str>) {
    for node in nodes {
        assert_eq!(node.comment.parent_id.as_deref(), parent);
        check_parents(&node.replies, Some(&node.comment.id));
    }
}

proptest! {
    #[test]
    fn tree_contains_each_reachable_comment_once(comments in any_comments()) {
        let tree = build_tree(&comments);
        let shown: Vec<&str> = tree.iter().flat_map(CommentNode::iter).map(|c| c.id.as_str()).collect();
        let unique: HashSet<&str> = shown.iter().copied().collect();

        prop_assert_eq!(shown.len(), unique.len());
        prop_assert!(count_nodes(&tree) <= comments.len());

        let by_id: HashMap<&str, &Comment> = comments.iter().map(|c| (c.id.as_str(), c)).collect();
        for c in &comments {
            prop_assert_eq!(unique.contains(c.id.as_str()), reaches_root(&c.id, &by_id));
        }
        for hidden in excluded(&comments, &tree) {
            prop_assert!(hidden.parent_id.is_some());
        }
        check_parents(&tree, None);
    }

    #[test]
    fn removable_iff_not_started(status in any_status()) {
        let a = Assignment { status, ..Assignment::new("tsk-1", "usr-1", "One") };
        let started = matches!(status, WorkStatus::InProgress | WorkStatus::Completed);
        prop_assert_eq!(is_removable(&a), !started);
    }

    #[test]
    fn replacement_is_all_or_nothing(
        current in any_assignments(),
        requested in prop::collection::btree_set(0u8..8, 0..6),
    ) {
        let requested: BTreeSet<String> = requested.into_iter().map(|u| format!("usr-{u}")).collect();
        let blocked: Vec<&str> = current
            .iter()
            .filter(|a| !requested.contains(&a.user_id) && !a.is_removable())
            .map(|a| a.user_id.as_str())
            .collect();

        match plan_replacement(&current, &requested) {
            Ok(diff) => {
                prop_assert!(blocked.is_empty());
                let mut after: BTreeSet<String> = current.iter().map(|a| a.user_id.clone()).collect();
                for id in &diff.removed { after.remove(id); }
                after.extend(diff.added.iter().cloned());
                prop_assert_eq!(after, requested);
            }
            Err(WorkflowError::Conflict { user_ids }) => {
                prop_assert_eq!(user_ids.iter().map(String::as_str).collect::<Vec<_>>(), blocked);
            }
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    #[test]
    fn permissions_are_a_pure_function(assignments in any_assignments(), actor in 0u8..8) {
        let actor = format!("usr-{actor}");
        let first = resolve_permissions(&task(), &assignments, &actor);
        let second = resolve_permissions(&task(), &assignments, &actor);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.is_creator, actor == "usr-0");
    }
}

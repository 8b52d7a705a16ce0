//! HTTP-level integration tests for the tasks resource: claiming,
//! delegation, selective updates, candidate filters and sorting.

mod common;

use common::{active_task_id, admin, alice, bob, carol, spawn_app, start_review};
use flowgate_client::ListParams;
use flowgate_core::task::{TaskState, UpdateTask};

// ---------------------------------------------------------------------------
// Claiming
// ---------------------------------------------------------------------------

#[tokio::test]
async fn claim_assigns_the_caller() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    let task = app
        .client
        .tasks()
        .claim(&bob(), &task_id)
        .await
        .expect("claim");
    assert_eq!(task.state, TaskState::Claimed);
    assert_eq!(task.assignee.as_deref(), Some("bob"));
}

#[tokio::test]
async fn claiming_a_taken_task_conflicts_even_for_candidates() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    app.client
        .tasks()
        .claim(&bob(), &task_id)
        .await
        .expect("bob claims");

    // Carol is in the sales candidate group, but the task is taken.
    let err = app
        .client
        .tasks()
        .claim(&carol(), &task_id)
        .await
        .expect_err("carol claims");
    assert!(err.is_conflict());
    assert_eq!(
        err.brief_summary(),
        Some("The task is already claimed by another user.")
    );
}

#[tokio::test]
async fn unclaim_and_reclaim() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    app.client
        .tasks()
        .claim(&bob(), &task_id)
        .await
        .expect("claim");
    let task = app
        .client
        .tasks()
        .unclaim(&bob(), &task_id)
        .await
        .expect("unclaim");
    assert_eq!(task.state, TaskState::Unclaimed);
    assert!(task.assignee.is_none());

    app.client
        .tasks()
        .claim(&carol(), &task_id)
        .await
        .expect("carol claims the returned task");
}

#[tokio::test]
async fn delegate_and_resolve() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    app.client
        .tasks()
        .claim(&bob(), &task_id)
        .await
        .expect("claim");
    let task = app
        .client
        .tasks()
        .delegate(&bob(), &task_id, "carol")
        .await
        .expect("delegate");
    assert_eq!(task.state, TaskState::Delegated);
    assert_eq!(task.assignee.as_deref(), Some("carol"));
    assert_eq!(task.owner.as_deref(), Some("bob"));

    let task = app
        .client
        .tasks()
        .resolve(&carol(), &task_id)
        .await
        .expect("resolve");
    assert_eq!(task.state, TaskState::Resolved);
    assert_eq!(task.assignee.as_deref(), Some("bob"));
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn completing_the_flow_completes_the_process() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let first = active_task_id(&app, &process.id).await;
    app.client
        .tasks()
        .complete(&bob(), &first)
        .await
        .expect("complete review");

    let second = active_task_id(&app, &process.id).await;
    assert_ne!(first, second);
    app.client
        .tasks()
        .complete(&alice(), &second)
        .await
        .expect("complete approval");

    let process = app
        .client
        .processes()
        .get(&bob(), &process.id)
        .await
        .expect("get process");
    assert!(process.completed);
    assert_eq!(process.end_activity_id.as_deref(), Some("end"));
    assert!(process.duration_in_ms.is_some());
}

#[tokio::test]
async fn a_completed_task_leaves_the_runtime() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    app.client
        .tasks()
        .complete(&bob(), &task_id)
        .await
        .expect("complete");

    // Further transitions answer 404: the runtime task is gone.
    let err = app
        .client
        .tasks()
        .claim(&bob(), &task_id)
        .await
        .expect_err("claim completed");
    assert!(err.is_not_found());
}

// ---------------------------------------------------------------------------
// Selective updates
// ---------------------------------------------------------------------------

#[tokio::test]
async fn select_list_gates_which_fields_apply() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    let task = app
        .client
        .tasks()
        .update(
            &bob(),
            &task_id,
            &UpdateTask {
                priority: Some(10),
                name: Some("Renamed".into()),
                ..UpdateTask::default()
            },
            &["priority"],
        )
        .await
        .expect("update priority");
    assert_eq!(task.priority, 10);
    assert_eq!(task.name, "Review document");
}

#[tokio::test]
async fn selecting_a_read_only_property_is_rejected() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    let err = app
        .client
        .tasks()
        .update(&bob(), &task_id, &UpdateTask::default(), &["processId"])
        .await
        .expect_err("read-only select");
    assert!(err.is_bad_request());
}

#[tokio::test]
async fn uninvolved_users_cannot_update() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    let err = app
        .client
        .tasks()
        .update(
            &alice(),
            &task_id,
            &UpdateTask {
                priority: Some(1),
                ..UpdateTask::default()
            },
            &["priority"],
        )
        .await
        .expect_err("uninvolved update");
    assert!(err.is_forbidden());
}

// ---------------------------------------------------------------------------
// Collection filters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn candidate_filters_reject_non_active_status() {
    let app = spawn_app().await;
    start_review(&app).await;

    let err = app
        .client
        .tasks()
        .list(
            &admin(),
            &ListParams::new().where_clause("(status = 'completed' AND candidateUser = 'bob')"),
        )
        .await
        .expect_err("candidateUser with completed");
    assert!(err.is_bad_request());
    assert_eq!(
        err.brief_summary(),
        Some("Filtering on candidateUser is only allowed in combination with status-parameter 'active'")
    );

    let err = app
        .client
        .tasks()
        .list(
            &admin(),
            &ListParams::new().where_clause("(status = 'any' AND candidateGroup = 'sales')"),
        )
        .await
        .expect_err("candidateGroup with any");
    assert!(err.is_bad_request());
    assert_eq!(
        err.brief_summary(),
        Some("Filtering on candidateGroup is only allowed in combination with status-parameter 'active'")
    );
}

#[tokio::test]
async fn candidate_group_filter_finds_unassigned_tasks() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let page = app
        .client
        .tasks()
        .list(
            &admin(),
            &ListParams::new().where_clause(format!(
                "(status = 'active' AND candidateGroup = 'sales' AND processId = '{}')",
                process.id
            )),
        )
        .await
        .expect("list");
    assert_eq!(page.items.len(), 1);

    // Once claimed, the task stops being a candidate task.
    app.client
        .tasks()
        .claim(&bob(), &page.items[0].id)
        .await
        .expect("claim");
    let page = app
        .client
        .tasks()
        .list(
            &admin(),
            &ListParams::new().where_clause(format!(
                "(status = 'active' AND candidateGroup = 'sales' AND processId = '{}')",
                process.id
            )),
        )
        .await
        .expect("list after claim");
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn assignee_and_name_filters() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;
    app.client
        .tasks()
        .claim(&bob(), &task_id)
        .await
        .expect("claim");

    let page = app
        .client
        .tasks()
        .list(
            &bob(),
            &ListParams::new().where_clause("(status = 'active' AND assignee = 'bob')"),
        )
        .await
        .expect("assignee filter");
    assert_eq!(page.items.len(), 1);

    let page = app
        .client
        .tasks()
        .list(
            &bob(),
            &ListParams::new().where_clause("(name MATCHES('Review%'))"),
        )
        .await
        .expect("name pattern");
    assert_eq!(page.items.len(), 1);

    let page = app
        .client
        .tasks()
        .list(
            &bob(),
            &ListParams::new().where_clause("(name = 'Something else')"),
        )
        .await
        .expect("no match");
    assert!(page.items.is_empty());
}

#[tokio::test]
async fn include_task_variables_expands_the_listing() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    app.client
        .tasks()
        .create_variable(
            &bob(),
            &task_id,
            &flowgate_core::variable::VariablePayload {
                name: Some("comment".into()),
                tag: Some("d:text".into()),
                value: serde_json::json!("looks fine"),
                scope: None,
            },
        )
        .await
        .expect("set variable");

    let page = app
        .client
        .tasks()
        .list(
            &bob(),
            &ListParams::new().where_clause("(includeTaskVariables = true)"),
        )
        .await
        .expect("list");
    let variables = page.items[0].variables.as_ref().expect("variables present");
    assert!(variables.iter().any(|v| v.name == "comment"));
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn order_by_priority_descending() {
    let app = spawn_app().await;
    let first = start_review(&app).await;
    let second = app
        .client
        .processes()
        .start(
            &bob(),
            &flowgate_core::process::StartProcess {
                process_definition_key: Some("review".into()),
                ..Default::default()
            },
        )
        .await
        .expect("second process");

    let first_task = active_task_id(&app, &first.id).await;
    let second_task = active_task_id(&app, &second.id).await;
    app.client
        .tasks()
        .update(
            &bob(),
            &first_task,
            &UpdateTask {
                priority: Some(10),
                ..UpdateTask::default()
            },
            &["priority"],
        )
        .await
        .expect("lower priority");
    app.client
        .tasks()
        .update(
            &bob(),
            &second_task,
            &UpdateTask {
                priority: Some(90),
                ..UpdateTask::default()
            },
            &["priority"],
        )
        .await
        .expect("raise priority");

    let page = app
        .client
        .tasks()
        .list(&admin(), &ListParams::new().order_by("priority DESC"))
        .await
        .expect("sorted list");
    let priorities: Vec<i32> = page.items.iter().map(|t| t.priority).collect();
    assert_eq!(priorities, vec![90, 10]);
}

// ---------------------------------------------------------------------------
// Candidates and form model
// ---------------------------------------------------------------------------

#[tokio::test]
async fn candidates_reflect_the_definition() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    let page = app
        .client
        .tasks()
        .candidates(&bob(), &task_id, &ListParams::new())
        .await
        .expect("candidates");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].candidate_id, "sales");
}

#[tokio::test]
async fn task_form_model_comes_from_the_definition() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    let page = app
        .client
        .tasks()
        .task_form_model(&bob(), &task_id)
        .await
        .expect("form model");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "comment");
}

// ---------------------------------------------------------------------------
// Method-not-allowed contract
// ---------------------------------------------------------------------------

#[tokio::test]
async fn posting_to_the_task_collection_is_405() {
    let app = spawn_app().await;
    let response = reqwest::Client::new()
        .post(format!("{}/api/v1/tasks", app.base_url))
        .basic_auth("bob@acme", Some("bob"))
        .json(&serde_json::json!({}))
        .send()
        .await
        .expect("request");
    assert_eq!(response.status(), 405);
}

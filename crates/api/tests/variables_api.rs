//! HTTP-level integration tests for process and task variables: typed
//! round-trips, the type-tag error split, and scope handling.

mod common;

use common::{active_task_id, bob, spawn_app, start_review};
use flowgate_client::ListParams;
use flowgate_core::variable::{VariablePayload, VariableScope, VariableValue};
use serde_json::json;

fn payload(name: &str, tag: &str, value: serde_json::Value) -> VariablePayload {
    VariablePayload {
        name: Some(name.into()),
        tag: Some(tag.into()),
        value,
        scope: None,
    }
}

// ---------------------------------------------------------------------------
// Round-trips
// ---------------------------------------------------------------------------

// A variable created as d:long 1234 must come back with the same type
// tag and value.
#[tokio::test]
async fn long_variable_round_trips() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    let created = app
        .client
        .tasks()
        .create_variable(&bob(), &task_id, &payload("counter", "d:long", json!(1234)))
        .await
        .expect("create");
    assert_eq!(created.value, VariableValue::Long(1234));
    assert_eq!(created.scope, VariableScope::Local);

    let page = app
        .client
        .tasks()
        .variables(&bob(), &task_id, &ListParams::new())
        .await
        .expect("list");
    let fetched = page
        .items
        .iter()
        .find(|v| v.name == "counter")
        .expect("variable present");
    assert_eq!(fetched.value, VariableValue::Long(1234));
}

#[tokio::test]
async fn datetime_variable_round_trips() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let created = app
        .client
        .processes()
        .create_variable(
            &bob(),
            &process.id,
            &payload(
                "deadline",
                "d:datetime",
                json!("2024-05-01T08:00:00.000+0000"),
            ),
        )
        .await
        .expect("create");
    match &created.value {
        VariableValue::Datetime(_) => {}
        other => panic!("expected datetime, got {other:?}"),
    }

    let page = app
        .client
        .processes()
        .variables(&bob(), &process.id, &ListParams::new())
        .await
        .expect("list");
    assert!(page.items.iter().any(|v| v.name == "deadline"));
}

// ---------------------------------------------------------------------------
// Error split: unsupported tag (400) vs failed coercion (500)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unsupported_type_tag_is_400_with_exact_message() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let err = app
        .client
        .processes()
        .create_variable(&bob(), &process.id, &payload("x", "d:fancy", json!("v")))
        .await
        .expect_err("unsupported tag");
    assert!(err.is_bad_request());
    assert_eq!(
        err.brief_summary(),
        Some("Unsupported type of variable: 'd:fancy'.")
    );
}

#[tokio::test]
async fn failed_coercion_is_500() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let err = app
        .client
        .processes()
        .create_variable(&bob(), &process.id, &payload("x", "d:int", json!("abc")))
        .await
        .expect_err("coercion failure");
    assert_eq!(err.api_status(), Some(500));
}

#[tokio::test]
async fn workflow_package_requires_an_array() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let err = app
        .client
        .processes()
        .create_variable(
            &bob(),
            &process.id,
            &payload("package", "bpm:workflowPackage", json!("node-1")),
        )
        .await
        .expect_err("scalar package");
    assert!(err.is_bad_request());

    let created = app
        .client
        .processes()
        .create_variable(
            &bob(),
            &process.id,
            &payload("package", "bpm:workflowPackage", json!(["node-1", "node-2"])),
        )
        .await
        .expect("array package");
    assert_eq!(
        created.value,
        VariableValue::WorkflowPackage(vec!["node-1".into(), "node-2".into()])
    );
}

// ---------------------------------------------------------------------------
// Update by name
// ---------------------------------------------------------------------------

#[tokio::test]
async fn put_by_name_rejects_a_mismatching_body_name() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let err = app
        .client
        .processes()
        .update_variable(
            &bob(),
            &process.id,
            "counter",
            &payload("other", "d:int", json!(1)),
        )
        .await
        .expect_err("name mismatch");
    assert!(err.is_bad_request());
}

#[tokio::test]
async fn put_by_name_upserts() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let body = VariablePayload {
        name: None,
        tag: Some("d:int".into()),
        value: json!(1),
        scope: None,
    };
    let created = app
        .client
        .processes()
        .update_variable(&bob(), &process.id, "attempts", &body)
        .await
        .expect("create via put");
    assert_eq!(created.name, "attempts");
    assert_eq!(created.value, VariableValue::Int(1));

    let updated = app
        .client
        .processes()
        .update_variable(
            &bob(),
            &process.id,
            "attempts",
            &VariablePayload {
                value: json!(2),
                ..body
            },
        )
        .await
        .expect("update via put");
    assert_eq!(updated.value, VariableValue::Int(2));
}

// ---------------------------------------------------------------------------
// Scopes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scope_filter_separates_local_and_global() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    app.client
        .tasks()
        .create_variable(
            &bob(),
            &task_id,
            &VariablePayload {
                scope: Some(VariableScope::Local),
                ..payload("localNote", "d:text", json!("mine"))
            },
        )
        .await
        .expect("local");
    app.client
        .tasks()
        .create_variable(
            &bob(),
            &task_id,
            &VariablePayload {
                scope: Some(VariableScope::Global),
                ..payload("outcome", "d:text", json!("approved"))
            },
        )
        .await
        .expect("global");

    let page = app
        .client
        .tasks()
        .variables(
            &bob(),
            &task_id,
            &ListParams::new().where_clause("(scope = 'local')"),
        )
        .await
        .expect("local listing");
    assert!(page.items.iter().all(|v| v.scope == VariableScope::Local));
    assert!(page.items.iter().any(|v| v.name == "localNote"));

    let page = app
        .client
        .tasks()
        .variables(
            &bob(),
            &task_id,
            &ListParams::new().where_clause("(scope = 'global')"),
        )
        .await
        .expect("global listing");
    assert!(page.items.iter().any(|v| v.name == "outcome"));

    // The global write went through to the process.
    let page = app
        .client
        .processes()
        .variables(&bob(), &process.id, &ListParams::new())
        .await
        .expect("process variables");
    assert!(page.items.iter().any(|v| v.name == "outcome"));
}

// ---------------------------------------------------------------------------
// Batches and deletion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn batch_create_answers_with_a_list() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let page = app
        .client
        .processes()
        .create_variables(
            &bob(),
            &process.id,
            &[
                payload("one", "d:int", json!(1)),
                payload("two", "d:int", json!(2)),
            ],
        )
        .await
        .expect("batch create");
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.pagination.count, 2);
}

#[tokio::test]
async fn delete_variable_then_404() {
    let app = spawn_app().await;
    let process = start_review(&app).await;
    let task_id = active_task_id(&app, &process.id).await;

    app.client
        .tasks()
        .create_variable(&bob(), &task_id, &payload("scratch", "d:int", json!(7)))
        .await
        .expect("create");
    app.client
        .tasks()
        .delete_variable(&bob(), &task_id, "scratch")
        .await
        .expect("delete");
    let err = app
        .client
        .tasks()
        .delete_variable(&bob(), &task_id, "scratch")
        .await
        .expect_err("delete again");
    assert!(err.is_not_found());
}

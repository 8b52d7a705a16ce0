//! HTTP-level integration tests for the processes resource and its
//! sub-resources.

mod common;

use common::{
    admin, alice, bob, carol, deploy_review, other_admin, spawn_app, start_review,
};
use flowgate_client::ListParams;
use flowgate_core::process::StartProcess;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Starting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_by_key_echoes_variables_and_items() {
    let app = spawn_app().await;
    deploy_review(&app).await;

    let mut variables = BTreeMap::new();
    variables.insert("initiator".to_string(), serde_json::json!("bob"));
    variables.insert("attempts".to_string(), serde_json::json!(1));
    let process = app
        .client
        .processes()
        .start(
            &bob(),
            &StartProcess {
                process_definition_key: Some("review".into()),
                business_key: Some(uuid::Uuid::new_v4().to_string()),
                variables,
                items: vec!["node-1".into()],
            },
        )
        .await
        .expect("start");

    assert_eq!(process.process_definition_key, "review");
    assert_eq!(process.start_user_id, "bob");
    assert_eq!(process.start_activity_id, "start");
    assert!(!process.completed);
    assert!(process.ended_at.is_none());
    let echoed = process.variables.expect("variables echo");
    assert!(echoed.contains_key("initiator"));
    assert!(echoed.contains_key("attempts"));
    let items = process.items.expect("items echo");
    assert!(items.contains("node-1"));
}

#[tokio::test]
async fn start_requires_exactly_one_definition_reference() {
    let app = spawn_app().await;
    deploy_review(&app).await;
    let page = app
        .client
        .process_definitions()
        .list(&bob(), &ListParams::new())
        .await
        .expect("list definitions");
    let definition_id = page.items[0].id.clone();

    let err = app
        .client
        .processes()
        .start(
            &bob(),
            &StartProcess {
                process_definition_id: Some(definition_id),
                process_definition_key: Some("review".into()),
                ..StartProcess::default()
            },
        )
        .await
        .expect_err("both references");
    assert!(err.is_bad_request());

    let err = app
        .client
        .processes()
        .start(&bob(), &StartProcess::default())
        .await
        .expect_err("no reference");
    assert!(err.is_bad_request());
}

#[tokio::test]
async fn start_with_unknown_key_is_rejected() {
    let app = spawn_app().await;
    deploy_review(&app).await;
    let err = app
        .client
        .processes()
        .start(
            &bob(),
            &StartProcess {
                process_definition_key: Some("nonexistent".into()),
                ..StartProcess::default()
            },
        )
        .await
        .expect_err("unknown key");
    assert!(err.is_bad_request());
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[tokio::test]
async fn involvement_gates_process_access() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    // Carol participates through the sales candidate group.
    app.client
        .processes()
        .get(&carol(), &process.id)
        .await
        .expect("candidate can read");

    // Alice is only a candidate of the not-yet-active approval task.
    let err = app
        .client
        .processes()
        .get(&alice(), &process.id)
        .await
        .expect_err("uninvolved user");
    assert!(err.is_forbidden());

    // A foreign tenant's admin sees nothing at all.
    let err = app
        .client
        .processes()
        .get(&other_admin(), &process.id)
        .await
        .expect_err("cross-tenant");
    assert!(err.is_not_found());
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_twice_yields_success_then_404() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    app.client
        .processes()
        .delete(&bob(), &process.id)
        .await
        .expect("first delete");
    let err = app
        .client
        .processes()
        .delete(&bob(), &process.id)
        .await
        .expect_err("second delete");
    assert!(err.is_not_found());

    // History remains, carrying the delete reason.
    let process = app
        .client
        .processes()
        .get(&bob(), &process.id)
        .await
        .expect("historic get");
    assert_eq!(
        process.delete_reason.as_deref(),
        Some("deleted through REST API")
    );
    assert!(process.completed);
}

#[tokio::test]
async fn only_the_starter_or_an_admin_may_delete() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let err = app
        .client
        .processes()
        .delete(&carol(), &process.id)
        .await
        .expect_err("candidate cannot delete");
    assert!(err.is_forbidden());

    app.client
        .processes()
        .delete(&admin(), &process.id)
        .await
        .expect("admin delete");
}

// ---------------------------------------------------------------------------
// Listing and filters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_filter_narrows_the_listing() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let page = app
        .client
        .processes()
        .list(&bob(), &ListParams::new().where_clause("(status = 'active')"))
        .await
        .expect("active");
    assert_eq!(page.items.len(), 1);

    let page = app
        .client
        .processes()
        .list(
            &bob(),
            &ListParams::new().where_clause("(status = 'completed')"),
        )
        .await
        .expect("completed");
    assert!(page.items.is_empty());

    let err = app
        .client
        .processes()
        .list(
            &bob(),
            &ListParams::new().where_clause("(status = 'archived')"),
        )
        .await
        .expect_err("invalid status");
    assert!(err.is_bad_request());

    let page = app
        .client
        .processes()
        .list(
            &bob(),
            &ListParams::new()
                .where_clause("(processDefinitionKey = 'review' AND startUserId = 'bob')"),
        )
        .await
        .expect("combined filter");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, process.id);
}

#[tokio::test]
async fn include_process_variables_adds_the_typed_list() {
    let app = spawn_app().await;
    deploy_review(&app).await;
    let mut variables = BTreeMap::new();
    variables.insert("initiator".to_string(), serde_json::json!("bob"));
    app.client
        .processes()
        .start(
            &bob(),
            &StartProcess {
                process_definition_key: Some("review".into()),
                variables,
                ..StartProcess::default()
            },
        )
        .await
        .expect("start");

    let page = app
        .client
        .processes()
        .list(
            &bob(),
            &ListParams::new().where_clause("(includeProcessVariables = true)"),
        )
        .await
        .expect("list");
    let typed = page.items[0]
        .process_variables
        .as_ref()
        .expect("processVariables present");
    assert!(typed.iter().any(|v| v.name == "initiator"));

    // Without the flag the list stays lean.
    let page = app
        .client
        .processes()
        .list(&bob(), &ListParams::new())
        .await
        .expect("list");
    assert!(page.items[0].process_variables.is_none());
}

// ---------------------------------------------------------------------------
// Sub-resources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn process_tasks_follow_the_flow() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let page = app
        .client
        .processes()
        .tasks(&bob(), &process.id, &ListParams::new())
        .await
        .expect("tasks");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Review document");

    app.client
        .tasks()
        .complete(&bob(), &page.items[0].id)
        .await
        .expect("complete review");

    let page = app
        .client
        .processes()
        .tasks(&bob(), &process.id, &ListParams::new())
        .await
        .expect("tasks after completion");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].name, "Approve publication");

    let page = app
        .client
        .processes()
        .tasks(
            &bob(),
            &process.id,
            &ListParams::new().where_clause("(status = 'any')"),
        )
        .await
        .expect("all tasks");
    assert_eq!(page.items.len(), 2);
}

#[tokio::test]
async fn activities_record_the_execution() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let page = app
        .client
        .processes()
        .activities(&bob(), &process.id, &ListParams::new())
        .await
        .expect("activities");
    let ids: Vec<&str> = page
        .items
        .iter()
        .map(|a| a.activity_definition_id.as_str())
        .collect();
    assert_eq!(ids, vec!["start", "reviewTask"]);
}

#[tokio::test]
async fn items_attach_and_detach() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let item = app
        .client
        .processes()
        .add_item(&bob(), &process.id, "node-42")
        .await
        .expect("attach");
    assert_eq!(item.id, "node-42");
    assert_eq!(item.added_by, "bob");

    // Attaching the same content twice conflicts.
    let err = app
        .client
        .processes()
        .add_item(&bob(), &process.id, "node-42")
        .await
        .expect_err("duplicate attach");
    assert!(err.is_conflict());

    let page = app
        .client
        .processes()
        .items(&bob(), &process.id, &ListParams::new())
        .await
        .expect("items");
    assert_eq!(page.items.len(), 1);

    app.client
        .processes()
        .delete_item(&bob(), &process.id, "node-42")
        .await
        .expect("detach");
    let err = app
        .client
        .processes()
        .delete_item(&bob(), &process.id, "node-42")
        .await
        .expect_err("detach again");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn image_is_404_without_graphic_notation() {
    let app = spawn_app().await;
    let process = start_review(&app).await;

    let err = app
        .client
        .processes()
        .image(&bob(), &process.id)
        .await
        .expect_err("no diagram");
    assert!(err.is_not_found());
    assert!(err
        .brief_summary()
        .expect("summary")
        .contains("graphical notation"));
}

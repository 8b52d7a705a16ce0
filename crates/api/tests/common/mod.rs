//! Shared harness for the HTTP integration tests.
//!
//! Each test spawns the real router (full middleware stack, exactly as
//! production builds it) on an ephemeral port and drives it through
//! `flowgate-client`, so the whole wire contract -- envelopes, status
//! codes, Basic auth -- is exercised end to end.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use flowgate_api::config::ServerConfig;
use flowgate_api::router::build_app_router;
use flowgate_api::state::AppState;
use flowgate_client::{Credentials, WorkflowClient};
use flowgate_core::definition::{DefinitionSpec, TaskSpec};
use flowgate_core::deployment::{Deployment, NewDeployment};
use flowgate_core::form::FormModelElement;
use flowgate_core::process::{ProcessInfo, StartProcess};
use flowgate_engine::WorkflowEngine;

pub const TENANT: &str = "acme";
pub const OTHER_TENANT: &str = "globex";

pub struct TestApp {
    pub client: WorkflowClient,
    pub engine: WorkflowEngine,
    pub base_url: String,
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        bootstrap_admin_user: "admin".to_string(),
        bootstrap_admin_password: "admin".to_string(),
    }
}

/// Spawn the app with a seeded directory and return a client against it.
///
/// Directory: tenant `acme` with `admin` (administrator), `alice`, `bob`
/// and `carol` (`bob`/`carol` in group `sales`); tenant `globex` with its
/// own `admin`.
pub async fn spawn_app() -> TestApp {
    let engine = WorkflowEngine::new();
    engine.register_user(TENANT, "admin", "admin", true);
    engine.register_user(TENANT, "alice", "alice", false);
    engine.register_user(TENANT, "bob", "bob", false);
    engine.register_user(TENANT, "carol", "carol", false);
    engine.add_group_member(TENANT, "sales", "bob");
    engine.add_group_member(TENANT, "sales", "carol");
    engine.register_user(OTHER_TENANT, "admin", "admin", true);

    let config = test_config();
    let state = AppState {
        engine: engine.clone(),
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve test app");
    });

    let base_url = format!("http://{addr}");
    TestApp {
        client: WorkflowClient::new(base_url.clone()),
        engine,
        base_url,
    }
}

pub fn admin() -> Credentials {
    Credentials::new(TENANT, "admin", "admin")
}

pub fn alice() -> Credentials {
    Credentials::new(TENANT, "alice", "alice")
}

pub fn bob() -> Credentials {
    Credentials::new(TENANT, "bob", "bob")
}

pub fn carol() -> Credentials {
    Credentials::new(TENANT, "carol", "carol")
}

pub fn other_admin() -> Credentials {
    Credentials::new(OTHER_TENANT, "admin", "admin")
}

pub fn task_spec(activity: &str, name: &str) -> TaskSpec {
    TaskSpec {
        activity_definition_id: activity.into(),
        name: name.into(),
        description: None,
        priority: 50,
        assignee: None,
        candidate_users: Vec::new(),
        candidate_groups: Vec::new(),
        due_in_ms: None,
        form_resource_key: None,
        form_fields: Vec::new(),
    }
}

/// The standard two-step review flow used across the suites: a `sales`
/// group review task followed by an approval task for `alice`.
pub fn review_definition() -> DefinitionSpec {
    let review = TaskSpec {
        candidate_groups: vec!["sales".into()],
        form_fields: vec![FormModelElement {
            name: "comment".into(),
            qualified_name: Some("wf:comment".into()),
            title: Some("Reviewer comment".into()),
            data_type: "d:text".into(),
            required: false,
            allowed_values: Vec::new(),
        }],
        ..task_spec("reviewTask", "Review document")
    };
    let approve = TaskSpec {
        candidate_users: vec!["alice".into()],
        ..task_spec("approveTask", "Approve publication")
    };
    DefinitionSpec {
        key: "review".into(),
        name: "Document review".into(),
        title: Some("Document review".into()),
        description: Some("Review and approve a document".into()),
        category: None,
        start_form_resource_key: Some("wf:submitReviewTask".into()),
        start_form_fields: vec![FormModelElement {
            name: "dueDate".into(),
            qualified_name: Some("bpm:workflowDueDate".into()),
            title: Some("Due date".into()),
            data_type: "d:datetime".into(),
            required: false,
            allowed_values: Vec::new(),
        }],
        tasks: vec![review, approve],
    }
}

/// Deploy the review flow as the tenant admin.
pub async fn deploy_review(app: &TestApp) -> Deployment {
    app.client
        .deployments()
        .create(
            &admin(),
            &NewDeployment {
                name: "review-flow".into(),
                definitions: vec![review_definition()],
            },
        )
        .await
        .expect("deploy review flow")
}

/// Deploy the review flow and start one instance as `bob`.
pub async fn start_review(app: &TestApp) -> ProcessInfo {
    deploy_review(app).await;
    app.client
        .processes()
        .start(
            &bob(),
            &StartProcess {
                process_definition_key: Some("review".into()),
                ..StartProcess::default()
            },
        )
        .await
        .expect("start review process")
}

/// The id of the process's single active task.
pub async fn active_task_id(app: &TestApp, process_id: &str) -> String {
    let page = app
        .client
        .processes()
        .tasks(&admin(), process_id, &flowgate_client::ListParams::new())
        .await
        .expect("list process tasks");
    page.items
        .first()
        .unwrap_or_else(|| panic!("no active task for process {process_id}"))
        .id
        .clone()
}

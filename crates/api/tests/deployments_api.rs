//! HTTP-level integration tests for the deployments resource, including
//! the paging contract.

mod common;

use common::{admin, bob, other_admin, review_definition, spawn_app};
use flowgate_client::ListParams;
use flowgate_core::deployment::NewDeployment;

fn deployment_body(name: &str) -> NewDeployment {
    NewDeployment {
        name: name.into(),
        definitions: vec![review_definition()],
    }
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_and_get_deployment() {
    let app = spawn_app().await;
    let created = app
        .client
        .deployments()
        .create(&admin(), &deployment_body("review-flow"))
        .await
        .expect("create");
    assert_eq!(created.name, "review-flow");
    assert!(created.deployed_at.is_some());

    let fetched = app
        .client
        .deployments()
        .get(&admin(), &created.id)
        .await
        .expect("get");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn delete_twice_yields_success_then_404() {
    let app = spawn_app().await;
    let created = app
        .client
        .deployments()
        .create(&admin(), &deployment_body("short-lived"))
        .await
        .expect("create");

    app.client
        .deployments()
        .delete(&admin(), &created.id)
        .await
        .expect("first delete");

    let err = app
        .client
        .deployments()
        .delete(&admin(), &created.id)
        .await
        .expect_err("second delete");
    assert!(err.is_not_found());

    let err = app
        .client
        .deployments()
        .get(&admin(), &created.id)
        .await
        .expect_err("get after delete");
    assert!(err.is_not_found());
}

// ---------------------------------------------------------------------------
// Authorization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn non_admin_gets_403() {
    let app = spawn_app().await;
    let err = app
        .client
        .deployments()
        .list(&bob(), &ListParams::new())
        .await
        .expect_err("non-admin list");
    assert!(err.is_forbidden());

    let err = app
        .client
        .deployments()
        .create(&bob(), &deployment_body("nope"))
        .await
        .expect_err("non-admin create");
    assert!(err.is_forbidden());
}

#[tokio::test]
async fn foreign_tenant_admin_gets_404() {
    let app = spawn_app().await;
    let created = app
        .client
        .deployments()
        .create(&admin(), &deployment_body("tenant-bound"))
        .await
        .expect("create");

    // The id is real, but in another tenant: hidden, not forbidden.
    let err = app
        .client
        .deployments()
        .get(&other_admin(), &created.id)
        .await
        .expect_err("cross-tenant get");
    assert!(err.is_not_found());
}

// ---------------------------------------------------------------------------
// Paging
// ---------------------------------------------------------------------------

#[tokio::test]
async fn paging_windows_follow_the_invariant() {
    let app = spawn_app().await;
    for i in 0..5 {
        app.client
            .deployments()
            .create(&admin(), &deployment_body(&format!("flow-{i}")))
            .await
            .expect("create");
    }

    // First window: two of five, more to come.
    let page = app
        .client
        .deployments()
        .list(&admin(), &ListParams::new().max_items(2))
        .await
        .expect("first window");
    assert_eq!(page.pagination.count, 2);
    assert_eq!(page.pagination.total_items, 5);
    assert_eq!(page.pagination.skip_count, 0);
    assert!(page.pagination.has_more_items);

    // skip 2, max 5: the window drains the set, so hasMoreItems must be
    // false even though count == 3 < maxItems.
    let page = app
        .client
        .deployments()
        .list(&admin(), &ListParams::new().skip_count(2).max_items(5))
        .await
        .expect("second window");
    assert_eq!(page.pagination.count, 3);
    assert_eq!(page.pagination.total_items, 5);
    assert_eq!(page.pagination.skip_count, 2);
    assert!(!page.pagination.has_more_items);
}

#[tokio::test]
async fn skip_beyond_total_yields_empty_page() {
    let app = spawn_app().await;
    app.client
        .deployments()
        .create(&admin(), &deployment_body("only-one"))
        .await
        .expect("create");

    let page = app
        .client
        .deployments()
        .list(&admin(), &ListParams::new().skip_count(10))
        .await
        .expect("list");
    assert!(page.items.is_empty());
    assert_eq!(page.pagination.count, 0);
    assert!(!page.pagination.has_more_items);
}

#[tokio::test]
async fn invalid_paging_parameters_are_rejected() {
    let app = spawn_app().await;
    let err = app
        .client
        .deployments()
        .list(&admin(), &ListParams::new().max_items(0))
        .await
        .expect_err("maxItems=0");
    assert!(err.is_bad_request());

    let err = app
        .client
        .deployments()
        .list(&admin(), &ListParams::new().skip_count(-1))
        .await
        .expect_err("negative skipCount");
    assert!(err.is_bad_request());
}

#[tokio::test]
async fn order_by_name_descending() {
    let app = spawn_app().await;
    for name in ["alpha", "bravo", "charlie"] {
        app.client
            .deployments()
            .create(&admin(), &deployment_body(name))
            .await
            .expect("create");
    }

    let page = app
        .client
        .deployments()
        .list(&admin(), &ListParams::new().order_by("name DESC"))
        .await
        .expect("list");
    let names: Vec<&str> = page.items.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["charlie", "bravo", "alpha"]);
}

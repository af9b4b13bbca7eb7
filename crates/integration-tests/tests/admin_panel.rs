//! End-to-end tests for the admin panel against the mock GraphQL backend.

#![allow(clippy::unwrap_used)]

use freightdesk_core::table::selection::data_key;
use freightdesk_integration_tests::{EMAIL, TestApp, location};
use reqwest::StatusCode;

#[tokio::test]
async fn health_endpoints_report_backend_reachability() {
    let app = TestApp::spawn().await;

    let live = app.get("/health").await;
    assert_eq!(live.status(), StatusCode::OK);
    assert_eq!(live.text().await.unwrap(), "ok");

    let ready = app.get("/health/ready").await;
    assert_eq!(ready.status(), StatusCode::OK);
    let body: serde_json::Value = ready.json().await.unwrap();
    assert_eq!(body["status"], "ready");
    assert!(app.backend.operations().contains(&"Ping".to_string()));
}

#[tokio::test]
async fn anonymous_visit_redirects_to_sign_in_with_return_location() {
    let app = TestApp::spawn().await;

    let response = app.get("/branches?page=2").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response).as_deref(),
        Some("/sign-in?redirect=%2Fbranches%3Fpage%3D2")
    );
}

#[tokio::test]
async fn sign_in_returns_to_requested_page() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/sign-in",
            &[
                ("email", EMAIL),
                ("password", freightdesk_integration_tests::PASSWORD),
                ("redirect", "/positions"),
            ],
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/positions"));

    let page = app.get("/positions").await;
    assert_eq!(page.status(), StatusCode::OK);
}

#[tokio::test]
async fn sign_in_ignores_off_site_redirect() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form(
            "/sign-in",
            &[
                ("email", EMAIL),
                ("password", freightdesk_integration_tests::PASSWORD),
                ("redirect", "//evil.example/phish"),
            ],
        )
        .await;

    assert_eq!(location(&response).as_deref(), Some("/"));
}

#[tokio::test]
async fn signed_in_user_is_sent_away_from_sign_in() {
    let app = TestApp::spawn().await;
    app.sign_in().await;

    let home = app.get("/sign-in").await;
    assert_eq!(home.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&home).as_deref(), Some("/"));

    let back = app.get("/sign-in?redirect=%2Ffleet-types").await;
    assert_eq!(location(&back).as_deref(), Some("/fleet-types"));
}

#[tokio::test]
async fn invalid_credentials_show_general_error() {
    let app = TestApp::spawn().await;

    let response = app
        .post_form("/sign-in", &[("email", EMAIL), ("password", "wrong")])
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.text().await.unwrap().contains("Invalid email or password."));
}

#[tokio::test]
async fn blank_sign_in_fields_fail_without_calling_backend() {
    let app = TestApp::spawn().await;

    let response = app.post_form("/sign-in", &[("email", ""), ("password", "")]).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().await.unwrap().contains("The Email field is required."));
    assert!(!app.backend.operations().contains(&"Login".to_string()));
}

#[tokio::test]
async fn branches_are_paginated_by_the_backend() {
    let app = TestApp::spawn().await;
    app.backend.seed_branches(47);
    app.sign_in().await;

    let first = app.get("/branches").await;
    assert_eq!(first.status(), StatusCode::OK);
    let body = first.text().await.unwrap();
    assert!(body.contains("1–10 of 47"), "summary missing");
    assert!(body.contains("Branch 01"));
    assert!(!body.contains("Branch 11"));
    assert!(body.contains("page=5"), "last page link missing");

    let last = app.get("/branches?page=5").await.text().await.unwrap();
    assert!(last.contains("41–47 of 47"));
    assert!(last.contains("Branch 47"));
}

#[tokio::test]
async fn search_narrows_rows() {
    let app = TestApp::spawn().await;
    app.backend.seed_branches(12);
    app.sign_in().await;

    let body = app.get("/branches?search=b12").await.text().await.unwrap();

    assert!(body.contains("Branch 12"));
    assert!(!body.contains("Branch 01"));
    assert!(body.contains("1–1 of 1"));
}

#[tokio::test]
async fn delete_closes_dialog_and_refetches() {
    let app = TestApp::spawn().await;
    app.backend.seed_branches(3);
    app.sign_in().await;

    let dialog = app.get("/branches?dialog=delete&id=2").await.text().await.unwrap();
    assert!(dialog.contains("Delete branch?"));
    assert!(dialog.contains("/branches/2/delete"));

    let lists_before = app.backend.list_calls("branches");
    let response = app
        .post_form("/branches/2/delete", &[("return_to", "/branches")])
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response).as_deref(), Some("/branches"));

    let body = app.get("/branches").await.text().await.unwrap();
    assert!(body.contains("Branch deleted."));
    assert!(!body.contains("Branch 02"));
    assert!(!body.contains("dialog-backdrop"));
    assert!(app.backend.list_calls("branches") > lists_before);
    assert_eq!(app.backend.branch_ids(), vec!["1", "3"]);
}

#[tokio::test]
async fn deleting_a_missing_row_reports_it() {
    let app = TestApp::spawn().await;
    app.backend.seed_branches(1);
    app.sign_in().await;

    let body = app.get("/branches?dialog=edit&id=99").await.text().await.unwrap();

    assert!(body.contains("That branch no longer exists."));
    assert!(!body.contains("dialog-backdrop"));
}

#[tokio::test]
async fn bulk_delete_removes_selected_rows() {
    let app = TestApp::spawn().await;
    app.backend.seed_branches(12);
    app.sign_in().await;

    let key = data_key((1..=10).map(|n| n.to_string()));
    let dialog = app
        .get(&format!(
            "/branches?dialog=bulk-delete&data_key={key}&selected=1&selected=2"
        ))
        .await
        .text()
        .await
        .unwrap();
    assert!(dialog.contains("Delete 2 branches?"));
    assert!(dialog.contains("Branch 01"));

    let response = app
        .post_form(
            "/branches/bulk-delete",
            &[("return_to", "/branches"), ("ids", "1"), ("ids", "2")],
        )
        .await;
    assert_eq!(location(&response).as_deref(), Some("/branches"));

    let body = app.get("/branches").await.text().await.unwrap();
    assert!(body.contains("Deleted 2 branches."));
    assert_eq!(app.backend.branch_ids().len(), 10);
}

#[tokio::test]
async fn stale_selection_does_not_open_bulk_dialog() {
    let app = TestApp::spawn().await;
    app.backend.seed_branches(3);
    app.sign_in().await;

    let body = app
        .get("/branches?dialog=bulk-delete&data_key=stale&selected=1")
        .await
        .text()
        .await
        .unwrap();

    assert!(body.contains("Select at least one branch."));
    assert!(!body.contains("dialog-backdrop"));
}

#[tokio::test]
async fn create_validation_errors_render_inline() {
    let app = TestApp::spawn().await;
    app.backend.seed_branches(2);
    app.sign_in().await;

    let missing = app
        .post_form(
            "/branches",
            &[("return_to", "/branches"), ("name", ""), ("code", "NEW"), ("status", "ACTIVE")],
        )
        .await;
    assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = missing.text().await.unwrap();
    assert!(body.contains("The name field is required."));
    assert!(body.contains("New branch"));

    let duplicate = app
        .post_form(
            "/branches",
            &[("return_to", "/branches"), ("name", "Copy"), ("code", "b01"), ("status", "ACTIVE")],
        )
        .await;
    assert_eq!(duplicate.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        duplicate
            .text()
            .await
            .unwrap()
            .contains("The code has already been taken.")
    );
    assert_eq!(app.backend.branch_ids().len(), 2);
}

#[tokio::test]
async fn create_and_update_redirect_back_to_table() {
    let app = TestApp::spawn().await;
    app.backend.seed_branches(1);
    app.sign_in().await;

    let created = app
        .post_form(
            "/branches",
            &[
                ("return_to", "/branches?page=1&search=rot"),
                ("name", "Rotterdam"),
                ("code", "rtm"),
                ("status", "ACTIVE"),
            ],
        )
        .await;
    assert_eq!(created.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&created).as_deref(),
        Some("/branches?page=1&search=rot")
    );

    let updated = app
        .post_form(
            "/branches/2",
            &[
                ("return_to", "https://elsewhere.example/"),
                ("name", "Rotterdam Port"),
                ("code", "RTM"),
                ("status", "INACTIVE"),
            ],
        )
        .await;
    assert_eq!(location(&updated).as_deref(), Some("/branches"));

    let body = app.get("/branches").await.text().await.unwrap();
    assert!(body.contains("Branch updated."));
    assert!(body.contains("Rotterdam Port"));
}

#[tokio::test]
async fn rejected_token_resets_session() {
    let app = TestApp::spawn().await;
    app.backend.seed_branches(3);
    app.sign_in().await;
    assert_eq!(app.get("/branches").await.status(), StatusCode::OK);

    app.backend.revoke_all_tokens();

    let retry = app.get("/branches?page=1").await;
    assert_eq!(retry.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&retry).as_deref(), Some("/branches?page=1"));

    let guarded = app.get("/branches?page=1").await;
    assert_eq!(
        location(&guarded).as_deref(),
        Some("/sign-in?redirect=%2Fbranches%3Fpage%3D1")
    );

    let sign_in = app.get("/sign-in").await;
    assert_eq!(sign_in.status(), StatusCode::OK);
    assert!(
        sign_in
            .text()
            .await
            .unwrap()
            .contains("Your session has expired. Please sign in again.")
    );
}

#[tokio::test]
async fn rejected_token_on_post_goes_to_sign_in() {
    let app = TestApp::spawn().await;
    app.backend.seed_branches(1);
    app.sign_in().await;
    app.backend.revoke_all_tokens();

    let response = app
        .post_form("/branches/1/delete", &[("return_to", "/branches")])
        .await;

    assert_eq!(location(&response).as_deref(), Some("/sign-in"));
    assert_eq!(app.backend.branch_ids(), vec!["1"]);
}

#[tokio::test]
async fn sign_out_clears_session() {
    let app = TestApp::spawn().await;
    app.sign_in().await;

    let response = app.post_form("/sign-out", &[]).await;
    assert_eq!(location(&response).as_deref(), Some("/sign-in"));
    assert!(app.backend.operations().contains(&"Logout".to_string()));

    let dashboard = app.get("/").await;
    assert_eq!(location(&dashboard).as_deref(), Some("/sign-in"));
}

#[tokio::test]
async fn dashboard_shows_resource_totals() {
    let app = TestApp::spawn().await;
    app.backend.seed_branches(7);
    app.sign_in().await;

    let response = app.get("/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.text().await.unwrap();
    assert!(body.contains("Branches"));
    assert!(body.contains("Positions"));
    assert!(body.contains('7'));
}

#[tokio::test]
async fn table_links_replace_history_but_dialogs_push() {
    let app = TestApp::spawn().await;
    app.backend.seed_branches(25);
    app.sign_in().await;

    let body = app.get("/branches?order_by=name.desc").await.text().await.unwrap();

    assert!(body.contains(r#"aria-sort="descending""#));
    assert!(body.contains("Branch 25"));
    assert!(body.contains(r#"data-search-form data-nav="replace""#));
    for line in body.lines() {
        let line = line.trim();
        if line.contains(r#"class="page-link"#) && line.starts_with("<a ") {
            assert!(line.contains(r#"data-nav="replace""#), "page link pushes: {line}");
        }
        if line.contains("sort-link") {
            assert!(line.contains(r#"data-nav="replace""#), "sort link pushes: {line}");
        }
        if line.contains("dialog=create") || line.contains("dialog=edit") || line.contains("dialog=delete") {
            assert!(!line.contains("data-nav"), "dialog link replaces: {line}");
        }
    }
    assert!(body.contains("dialog=create"));
}

#[tokio::test]
async fn page_past_the_end_links_back_to_last_page() {
    let app = TestApp::spawn().await;
    app.backend.seed_branches(25);
    app.sign_in().await;

    let body = app.get("/branches?page=9").await.text().await.unwrap();

    assert!(body.contains("No results"));
    assert!(!body.contains("of 25"));
    assert!(body.contains(r#"href="/branches?page=3" data-nav="replace" class="page-link" rel="prev""#));
}

#[tokio::test]
async fn static_assets_are_served() {
    let app = TestApp::spawn().await;

    let response = app.get("/static/js/table.js").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.text().await.unwrap().contains("data-nav"));
}

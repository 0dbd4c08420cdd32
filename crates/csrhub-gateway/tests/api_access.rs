//! End-to-end access rules through the HTTP boundary.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use csrhub_gateway::{app_state::AppState, config, router};

// ids: admin=1, alice=2, bob=3
const CFG: &str = r#"
version: 1
users:
  - { username: "admin", role: admin, superuser: true, token: "admin" }
  - { username: "alice", role: recipient, token: "alice" }
  - { username: "bob", role: recipient, token: "bob" }
"#;

fn app_with(cfg: &str) -> Router {
    let cfg = config::load_from_str(cfg).expect("config");
    router::build_router(AppState::new(cfg).expect("state"))
}

fn app() -> Router {
    app_with(CFG)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header("authorization", format!("Bearer {t}"));
    }
    let req = match body {
        Some(v) => req
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create_project(app: &Router) -> u64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/projects",
        Some("admin"),
        Some(json!({
            "title": "Clean water",
            "status": "active",
            "progress": 10,
            "budget": 1234.567,
            "start_date": "2024-01-01",
            "end_date": "2024-12-31"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["budget"], json!("1234.57"));
    body["id"].as_u64().unwrap()
}

async fn create_report(app: &Router, token: &str, project: u64, summary: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/reports",
        Some(token),
        Some(json!({ "project_id": project, "summary": summary, "status": "submitted" })),
    )
    .await
}

#[tokio::test]
async fn requests_without_valid_token_are_rejected() {
    let app = app();

    let (status, body) = send(&app, "GET", "/api/regions", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "AUTH_FAILED");

    let (status, _) = send(&app, "GET", "/api/regions", Some("nope"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/healthz", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn reports_are_scoped_to_their_recipient() {
    let app = app();
    let project = create_project(&app).await;

    let (status, alice_report) = create_report(&app, "alice", project, "Q1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(alice_report["recipient"]["username"], "alice");
    assert_eq!(alice_report["project"]["title"], "Clean water");
    let alice_report_id = alice_report["id"].as_u64().unwrap();

    let (status, _) = create_report(&app, "bob", project, "Q1 bob").await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, list) = send(&app, "GET", "/api/reports", Some("alice"), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["id"].as_u64(), Some(alice_report_id));

    let (_, list) = send(&app, "GET", "/api/reports", Some("admin"), None).await;
    assert_eq!(list.as_array().unwrap().len(), 2);

    let uri = format!("/api/reports/{alice_report_id}");
    let (status, _) = send(&app, "GET", &uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "PATCH", &uri, Some("bob"), Some(json!({"summary": "mine"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "NOT_ALLOWED");

    let (status, body) =
        send(&app, "PATCH", &uri, Some("alice"), Some(json!({"summary": "Q1 revised"}))).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["summary"], "Q1 revised");
    assert_eq!(body["status"], "submitted");

    let (status, _) = send(&app, "DELETE", &uri, Some("bob"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "DELETE", &uri, Some("admin"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "DELETE", &uri, Some("admin"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn members_cannot_file_rows_for_others() {
    let app = app();
    let project = create_project(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/requests",
        Some("alice"),
        Some(json!({ "type": "funding", "facility": "clinic", "requester_id": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "POST",
        "/api/reports",
        Some("admin"),
        Some(json!({ "project_id": project, "summary": "on behalf", "status": "draft", "recipient_id": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["recipient"]["username"], "bob");

    let (status, _) = send(
        &app,
        "POST",
        "/api/reports",
        Some("admin"),
        Some(json!({ "project_id": 999, "summary": "dangling", "status": "draft" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn notifications_are_owner_only_for_reads() {
    let app = app();

    let (status, note) = send(
        &app,
        "POST",
        "/api/notifications",
        Some("admin"),
        Some(json!({ "user_id": 2, "message": "report due", "type": "reminder" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(note["read"], false);
    let id = note["id"].as_u64().unwrap();

    // No superuser bypass when listing notifications.
    let (_, list) = send(&app, "GET", "/api/notifications", Some("admin"), None).await;
    assert!(list.as_array().unwrap().is_empty());

    let (_, list) = send(&app, "GET", "/api/notifications", Some("alice"), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let action = format!("/api/notifications/{id}/mark_as_read");
    let (status, _) = send(&app, "POST", &action, Some("bob"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    for _ in 0..2 {
        let (status, body) = send(&app, "POST", &action, Some("alice"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "notification marked as read");
    }

    let (_, body) = send(&app, "GET", &format!("/api/notifications/{id}"), Some("alice"), None).await;
    assert_eq!(body["read"], true);

    let (status, _) = send(&app, "POST", "/api/notifications/999/mark_as_read", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn anyone_may_assign_users_once() {
    let app = app();
    let project = create_project(&app).await;
    let action = format!("/api/projects/{project}/assign_user");

    for _ in 0..2 {
        let (status, body) = send(&app, "POST", &action, Some("alice"), Some(json!({"user_id": 3}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "user assigned");
    }

    let (_, body) = send(&app, "GET", &format!("/api/projects/{project}"), Some("bob"), None).await;
    let assigned = body["assigned_users"].as_array().unwrap();
    assert_eq!(assigned.len(), 1);
    assert_eq!(assigned[0]["username"], "bob");

    let (status, body) = send(&app, "POST", &action, Some("alice"), Some(json!({"user_id": 42}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn overrides_tighten_assignment() {
    let cfg = format!("{CFG}policy:\n  overrides: [\"project:assign_user=superuser\"]\n");
    let app = app_with(&cfg);
    let project = create_project(&app).await;
    let action = format!("/api/projects/{project}/assign_user");

    let (status, _) = send(&app, "POST", &action, Some("alice"), Some(json!({"user_id": 3}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, "POST", &action, Some("admin"), Some(json!({"user_id": 3}))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn deleting_a_project_removes_its_reports() {
    let app = app();
    let project = create_project(&app).await;
    create_report(&app, "alice", project, "Q1").await;
    create_report(&app, "bob", project, "Q1").await;

    let (status, _) = send(&app, "DELETE", &format!("/api/projects/{project}"), Some("alice"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = send(&app, "GET", "/api/reports", Some("admin"), None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn accounts_are_private_except_to_superusers() {
    let app = app();

    let (_, list) = send(&app, "GET", "/api/users", Some("alice"), None).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["username"], "alice");
    assert!(list[0].get("is_superuser").is_none());

    let (status, _) = send(&app, "GET", "/api/users/3", Some("alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = send(&app, "GET", "/api/users", Some("admin"), None).await;
    assert_eq!(list.as_array().unwrap().len(), 3);

    let (status, _) = send(&app, "DELETE", "/api/users/3", Some("alice"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", "/api/users/3", Some("admin"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The deleted account's token no longer authenticates.
    let (status, _) = send(&app, "GET", "/api/regions", Some("bob"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn reference_data_is_shared() {
    let app = app();

    let (status, region) = send(
        &app,
        "POST",
        "/api/regions",
        Some("bob"),
        Some(json!({ "name": "Nyanza", "country": "Kenya" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(region["project_count"], 0);

    let (_, list) = send(&app, "GET", "/api/regions", Some("alice"), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let uri = format!("/api/regions/{}", region["id"]);
    let (status, body) = send(&app, "PUT", &uri, Some("alice"), Some(json!({ "name": "Nyanza", "country": "KE" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["country"], "KE");

    let (status, _) = send(&app, "PATCH", &uri, Some("alice"), Some(json!({ "continent": "Africa" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn policy_decisions_are_counted() {
    let app = app();
    let project = create_project(&app).await;
    let (_, report) = create_report(&app, "alice", project, "Q1").await;

    let uri = format!("/api/reports/{}", report["id"]);
    send(&app, "DELETE", &uri, Some("bob"), None).await;
    send(&app, "GET", "/api/reports", Some("forged"), None).await;

    let req = Request::builder().uri("/metrics").body(Body::empty()).unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains(
        r#"csrhub_policy_decisions_total{kind="report",op="delete",outcome="deny"} 1"#
    ));
    assert!(text.contains(r#"csrhub_auth_failures_total{reason="unknown_token"} 1"#));
    assert!(text.contains("csrhub_reports 1"));
}

#[tokio::test]
async fn budgets_are_rounded_to_cents_before_the_cap() {
    let app = app();
    let body = |budget: Value| {
        json!({
            "title": "Solar kiosks",
            "status": "pending",
            "budget": budget,
            "start_date": "2024-01-01",
            "end_date": "2024-06-30"
        })
    };

    let (status, err) = send(&app, "POST", "/api/projects", Some("alice"), Some(body(json!(99999999.996)))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "BAD_REQUEST");

    let (status, _) = send(&app, "POST", "/api/projects", Some("alice"), Some(body(json!(-0.5)))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, row) = send(&app, "POST", "/api/projects", Some("alice"), Some(body(json!(99999999.994)))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(row["budget"], "99999999.99");

    let (_, list) = send(&app, "GET", "/api/projects", Some("alice"), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let app = app();
    let (_, region) = send(
        &app,
        "POST",
        "/api/regions",
        Some("alice"),
        Some(json!({ "name": "Coast", "country": "KE" })),
    )
    .await;
    let uri = format!("/api/regions/{}", region["id"]);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some("alice"),
        Some(json!({ "name": "Coast", "country": "KE", "continent": "Africa" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");
    assert!(body["message"].as_str().unwrap().contains("continent"));

    let (status, body) =
        send(&app, "POST", "/api/regions", Some("alice"), Some(json!({ "name": "Lake" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");

    let (status, body) = send(&app, "GET", "/api/regions/abc", Some("alice"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");

    let (status, body) = send(
        &app,
        "POST",
        "/api/projects/1/assign_user",
        Some("alice"),
        Some(json!({ "user": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BAD_REQUEST");

    let req = Request::builder()
        .method("POST")
        .uri("/api/regions")
        .header("authorization", "Bearer alice")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "BAD_REQUEST");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_edits_keep_every_assignment() {
    let app = app();
    let mut members = Vec::new();
    for i in 0..6 {
        let (status, body) = send(
            &app,
            "POST",
            "/api/users",
            Some("admin"),
            Some(json!({ "username": format!("field{i}"), "role": "recipient" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        members.push(body["id"].as_u64().unwrap());
    }

    for _ in 0..20 {
        let project = create_project(&app).await;
        let mut tasks = Vec::new();
        for &member in &members {
            let assigner = app.clone();
            tasks.push(tokio::spawn(async move {
                let uri = format!("/api/projects/{project}/assign_user");
                send(&assigner, "POST", &uri, Some("alice"), Some(json!({ "user_id": member }))).await.0
            }));
            let editor = app.clone();
            tasks.push(tokio::spawn(async move {
                let uri = format!("/api/projects/{project}");
                send(&editor, "PATCH", &uri, Some("bob"), Some(json!({ "progress": 50 }))).await.0
            }));
        }
        for task in tasks {
            assert!(task.await.unwrap().is_success());
        }

        let (_, body) = send(&app, "GET", &format!("/api/projects/{project}"), Some("alice"), None).await;
        assert_eq!(body["assigned_users"].as_array().unwrap().len(), members.len());
        assert_eq!(body["progress"], 50.0);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_signups_cannot_share_a_username() {
    let app = app();
    let mut tasks = Vec::new();
    for _ in 0..8 {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            send(
                &app,
                "POST",
                "/api/users",
                Some("alice"),
                Some(json!({ "username": "twin", "role": "public" })),
            )
            .await
            .0
        }));
    }

    let mut created = 0;
    for task in tasks {
        let status = task.await.unwrap();
        if status == StatusCode::CREATED {
            created += 1;
        } else {
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }
    assert_eq!(created, 1);

    // Renaming onto a taken name is rejected; renaming back frees the old one.
    let (status, _) = send(&app, "PATCH", "/api/users/2", Some("alice"), Some(json!({ "username": "bob" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "PATCH", "/api/users/2", Some("alice"), Some(json!({ "username": "alicia" }))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some("admin"),
        Some(json!({ "username": "alice", "role": "public" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn rows_filed_while_their_owner_is_deleted_do_not_survive() {
    let app = app();
    let project = create_project(&app).await;

    let mut tasks = Vec::new();
    for i in 0..16 {
        let app = app.clone();
        tasks.push(tokio::spawn(async move {
            let summary = format!("batch {i}");
            send(
                &app,
                "POST",
                "/api/reports",
                Some("admin"),
                Some(json!({ "project_id": project, "summary": summary, "status": "draft", "recipient_id": 3 })),
            )
            .await
            .0
        }));
    }
    let (status, _) = send(&app, "DELETE", "/api/users/3", Some("admin"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    for task in tasks {
        let status = task.await.unwrap();
        assert!(status == StatusCode::CREATED || status == StatusCode::BAD_REQUEST, "{status}");
    }

    let (_, list) = send(&app, "GET", "/api/reports", Some("admin"), None).await;
    assert!(list.as_array().unwrap().is_empty(), "{list}");
}

#[tokio::test]
async fn readiness_flips_when_draining() {
    let cfg = config::load_from_str(CFG).unwrap();
    let state = AppState::new(cfg).unwrap();
    let app = router::build_router(state.clone());

    let (status, _) = send(&app, "GET", "/readyz", None, None).await;
    assert_eq!(status, StatusCode::OK);

    state.set_draining();
    let (status, _) = send(&app, "GET", "/readyz", None, None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

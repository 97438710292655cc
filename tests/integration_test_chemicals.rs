mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, NaiveDate, Utc};
use common::TestApp;
use labtrack_backend::domain::models::user::Role;
use serde_json::{json, Value};

fn acetone() -> Value {
    json!({
        "name": "Acetone",
        "form": "aqueous",
        "concentration": "99%",
        "volume": 500.0,
        "quantity": 10,
        "storage_location": "Flammables cabinet",
        "expiry_date": "2030-06-30",
        "msds_file": "msds/acetone.pdf",
        "danger_classification": "yellow"
    })
}

fn chemical(name: &str, quantity: i32, expiry: NaiveDate, danger: &str) -> Value {
    json!({
        "name": name,
        "form": "powder",
        "quantity": quantity,
        "storage_location": "Shelf B",
        "expiry_date": expiry.to_string(),
        "danger_classification": danger
    })
}

fn names(body: &Value) -> Vec<String> {
    let mut names: Vec<String> = body.as_array().unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_teacher_creates_chemical_with_audit_row() {
    let app = TestApp::new().await;
    let (teacher, token) = app.user_with_token("ms_curie", Role::Teacher).await;

    let (status, body) = app.request("POST", "/api/chemicals/", Some(&token), Some(acetone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Acetone");
    assert_eq!(body["added_by"], teacher.id.as_str());
    assert_eq!(body["danger_classification"], "yellow");
    assert!(body["created_at"].is_string());

    assert_eq!(app.audit_count().await, 1);

    let id = body["id"].as_str().unwrap();
    let entries = app.state.audit_repo.list_for_object("Chemical", id).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action.as_str(), "create");
    assert_eq!(entries[0].user_id.as_deref(), Some(teacher.id.as_str()));
    assert_eq!(entries[0].changes, "Created Chemical \"Acetone\"");
}

#[tokio::test]
async fn test_student_cannot_create_and_no_audit_row_is_written() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("pupil", Role::Student).await;

    let (status, body) = app.request("POST", "/api/chemicals/", Some(&token), Some(acetone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"].is_string());
    assert_eq!(app.audit_count().await, 0);

    let (_, list) = app.request("GET", "/api/chemicals/", Some(&token), None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_anonymous_requests_are_unauthorized_not_forbidden() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("ms_curie", Role::Teacher).await;
    let (_, created) = app.request("POST", "/api/chemicals/", Some(&token), Some(acetone())).await;
    let path = format!("/api/chemicals/{}/", created["id"].as_str().unwrap());

    let (status, _) = app.request("GET", "/api/chemicals/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request("GET", &path, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request("POST", "/api/chemicals/", None, Some(acetone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request("PATCH", &path, None, Some(json!({"quantity": 1}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.request("DELETE", &path, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Anonymous with a broken filter or body is still 401.
    let (status, _) = app.request("GET", "/api/chemicals/?danger=purple", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.request("POST", "/api/chemicals/", None, Some(json!({"name": "x"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(app.audit_count().await, 1);
}

#[tokio::test]
async fn test_invalid_token_is_treated_as_anonymous() {
    let app = TestApp::new().await;

    let (status, _) = app.request("GET", "/api/chemicals/", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_lab_expert_patches_quantity() {
    let app = TestApp::new().await;
    let (_, teacher_token) = app.user_with_token("ms_curie", Role::Teacher).await;
    let (expert, expert_token) = app.user_with_token("lab_tech", Role::LabExpert).await;

    let (_, created) = app.request("POST", "/api/chemicals/", Some(&teacher_token), Some(acetone())).await;
    let id = created["id"].as_str().unwrap();
    let path = format!("/api/chemicals/{}/", id);

    let (status, body) = app.request("PATCH", &path, Some(&expert_token), Some(json!({"quantity": 20}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 20);
    assert_eq!(body["name"], "Acetone");
    assert_eq!(body["added_by"], created["added_by"]);
    assert_eq!(body["created_at"], created["created_at"]);

    assert_eq!(app.audit_count().await, 2);

    let entries = app.state.audit_repo.list_for_object("Chemical", id).await.unwrap();
    let update = entries.iter().find(|e| e.action.as_str() == "update").unwrap();
    assert_eq!(update.user_id.as_deref(), Some(expert.id.as_str()));
    assert_eq!(update.changes, "Updated Chemical \"Acetone\": quantity 10 -> 20");
}

#[tokio::test]
async fn test_student_can_read_but_not_mutate() {
    let app = TestApp::new().await;
    let (_, teacher_token) = app.user_with_token("ms_curie", Role::Teacher).await;
    let (_, student_token) = app.user_with_token("pupil", Role::Student).await;

    let (_, created) = app.request("POST", "/api/chemicals/", Some(&teacher_token), Some(acetone())).await;
    let path = format!("/api/chemicals/{}/", created["id"].as_str().unwrap());

    let (status, body) = app.request("GET", &path, Some(&student_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Acetone");

    let (status, list) = app.request("GET", "/api/chemicals/", Some(&student_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, _) = app.request("PATCH", &path, Some(&student_token), Some(json!({"quantity": 0}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.request("PUT", &path, Some(&student_token), Some(acetone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.request("DELETE", &path, Some(&student_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, body) = app.request("GET", &path, Some(&student_token), None).await;
    assert_eq!(body["quantity"], 10);
    assert_eq!(app.audit_count().await, 1);
}

#[tokio::test]
async fn test_admin_role_has_read_only_inventory_access() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("principal", Role::Admin).await;

    let (status, _) = app.request("GET", "/api/chemicals/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.request("POST", "/api/chemicals/", Some(&token), Some(acetone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_put_replaces_full_representation() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("ms_curie", Role::Teacher).await;

    let (_, created) = app.request("POST", "/api/chemicals/", Some(&token), Some(acetone())).await;
    let id = created["id"].as_str().unwrap();
    let path = format!("/api/chemicals/{}/", id);

    let mut replacement = acetone();
    replacement["quantity"] = json!(3);
    replacement["storage_location"] = json!("Cold store");
    replacement["msds_file"] = Value::Null;

    let (status, body) = app.request("PUT", &path, Some(&token), Some(replacement)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["quantity"], 3);
    assert_eq!(body["storage_location"], "Cold store");
    assert!(body["msds_file"].is_null());

    // A PUT missing required fields is rejected.
    let (status, _) = app.request("PUT", &path, Some(&token), Some(json!({"quantity": 4}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let entries = app.state.audit_repo.list_for_object("Chemical", id).await.unwrap();
    assert_eq!(entries.len(), 2);
    let update = &entries[1];
    assert!(update.changes.contains("quantity 10 -> 3"));
    assert!(update.changes.contains("storage_location Flammables cabinet -> Cold store"));
}

#[tokio::test]
async fn test_delete_removes_chemical_and_records_audit() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("ms_curie", Role::Teacher).await;

    let (_, created) = app.request("POST", "/api/chemicals/", Some(&token), Some(acetone())).await;
    let id = created["id"].as_str().unwrap();
    let path = format!("/api/chemicals/{}/", id);

    let (status, body) = app.request("DELETE", &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.request("GET", &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let entries = app.state.audit_repo.list_for_object("Chemical", id).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].changes, "Deleted Chemical \"Acetone\"");
}

#[tokio::test]
async fn test_missing_chemical_is_not_found_without_audit() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("ms_curie", Role::Teacher).await;
    let path = "/api/chemicals/00000000-0000-0000-0000-000000000000/";

    let (status, _) = app.request("GET", path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.request("PATCH", path, Some(&token), Some(json!({"quantity": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.request("PUT", path, Some(&token), Some(acetone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.request("DELETE", path, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(app.audit_count().await, 0);
}

#[tokio::test]
async fn test_validation_errors_are_bad_request() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("ms_curie", Role::Teacher).await;

    let mut negative = acetone();
    negative["quantity"] = json!(-1);
    let mut blank_name = acetone();
    blank_name["name"] = json!("   ");
    let mut bad_form = acetone();
    bad_form["form"] = json!("gas");
    let mut bad_hazard = acetone();
    bad_hazard["danger_classification"] = json!("purple");
    let mut bad_date = acetone();
    bad_date["expiry_date"] = json!("30/06/2030");
    let mut missing = acetone();
    missing.as_object_mut().unwrap().remove("storage_location");

    for payload in [negative, blank_name, bad_form, bad_hazard, bad_date, missing] {
        let (status, body) = app.request("POST", "/api/chemicals/", Some(&token), Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "unexpected status for body {}", body);
        assert!(body["error"].is_string());
    }

    let (status, _) = app.send(
        Request::builder()
            .method("POST")
            .uri("/api/chemicals/")
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap(),
    ).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(app.audit_count().await, 0);
}

#[tokio::test]
async fn test_patch_with_negative_quantity_leaves_record_unchanged() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("ms_curie", Role::Teacher).await;

    let (_, created) = app.request("POST", "/api/chemicals/", Some(&token), Some(acetone())).await;
    let path = format!("/api/chemicals/{}/", created["id"].as_str().unwrap());

    let (status, _) = app.request("PATCH", &path, Some(&token), Some(json!({"quantity": -5}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.request("GET", &path, Some(&token), None).await;
    assert_eq!(body["quantity"], 10);
    assert_eq!(app.audit_count().await, 1);
}

#[tokio::test]
async fn test_list_filters() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("ms_curie", Role::Teacher).await;

    let today = Utc::now().date_naive();
    let fixtures = [
        chemical("Expired Low Red", 2, today - Duration::days(1), "red"),
        chemical("Expires Today", 5, today, "yellow"),
        chemical("Fresh Plenty", 6, today + Duration::days(30), "green"),
        chemical("Fresh Low Red", 0, today + Duration::days(30), "red"),
        chemical("Expired Plenty", 50, today - Duration::days(400), "green"),
    ];
    for payload in fixtures {
        let (status, _) = app.request("POST", "/api/chemicals/", Some(&token), Some(payload)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, all) = app.request("GET", "/api/chemicals/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 5);

    let (_, expired) = app.request("GET", "/api/chemicals/?expired=true", Some(&token), None).await;
    assert_eq!(names(&expired), vec!["Expired Low Red", "Expired Plenty"]);

    let (_, low) = app.request("GET", "/api/chemicals/?low_stock=true", Some(&token), None).await;
    assert_eq!(names(&low), vec!["Expired Low Red", "Expires Today", "Fresh Low Red"]);

    let (_, red) = app.request("GET", "/api/chemicals/?danger=red", Some(&token), None).await;
    assert_eq!(names(&red), vec!["Expired Low Red", "Fresh Low Red"]);

    let (_, combined) = app.request("GET", "/api/chemicals/?expired=true&low_stock=true&danger=red", Some(&token), None).await;
    assert_eq!(names(&combined), vec!["Expired Low Red"]);

    let (_, not_filtered) = app.request("GET", "/api/chemicals/?expired=false", Some(&token), None).await;
    assert_eq!(not_filtered.as_array().unwrap().len(), 5);

    let (status, _) = app.request("GET", "/api/chemicals/?danger=purple", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.request("GET", "/api/chemicals/?expired=maybe", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Reads are never audited.
    assert_eq!(app.audit_count().await, 5);
}

#[tokio::test]
async fn test_access_token_cookie_authenticates() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("pupil", Role::Student).await;

    let (status, _) = app.send(
        Request::builder()
            .method("GET")
            .uri("/api/chemicals/")
            .header(header::COOKIE, format!("access_token={}", token))
            .body(Body::empty())
            .unwrap(),
    ).await;
    assert_eq!(status, StatusCode::OK);
}

async fn fail_audit_writes(app: &TestApp) {
    sqlx::query(
        "CREATE TRIGGER reject_audit BEFORE INSERT ON audit_logs
         BEGIN SELECT RAISE(ABORT, 'audit log unavailable'); END"
    )
        .execute(&app.pool)
        .await
        .unwrap();
}

async fn chemical_count(app: &TestApp) -> i64 {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM chemicals")
        .fetch_one(&app.pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_failed_audit_write_rolls_back_every_mutation() {
    let app = TestApp::new().await;
    let (_, token) = app.user_with_token("ms_curie", Role::Teacher).await;

    let (_, created) = app.request("POST", "/api/chemicals/", Some(&token), Some(acetone())).await;
    let path = format!("/api/chemicals/{}/", created["id"].as_str().unwrap());

    fail_audit_writes(&app).await;

    let (status, _) = app.request("POST", "/api/chemicals/", Some(&token), Some(chemical("Ethanol", 8, Utc::now().date_naive(), "yellow"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(chemical_count(&app).await, 1);

    let (status, _) = app.request("PATCH", &path, Some(&token), Some(json!({"quantity": 20}))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let (_, body) = app.request("GET", &path, Some(&token), None).await;
    assert_eq!(body["quantity"], 10);

    let mut replacement = acetone();
    replacement["storage_location"] = json!("Cold store");
    let (status, _) = app.request("PUT", &path, Some(&token), Some(replacement)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, _) = app.request("DELETE", &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = app.request("GET", &path, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["storage_location"], "Flammables cabinet");
    assert_eq!(chemical_count(&app).await, 1);
    assert_eq!(app.audit_count().await, 1);
}

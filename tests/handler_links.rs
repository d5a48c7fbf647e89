mod common;

use axum::http::StatusCode;
use serde_json::json;
use tinyurl::domain::entities::LinkStatus;
use tinyurl::domain::repositories::LinkRepository;

#[tokio::test]
async fn test_create_link_with_generated_code() {
    let (server, repo) = common::create_test_server();

    let response = server
        .post("/api/url")
        .json(&json!({ "original_url": "https://example.com/page" }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["statusCode"], 201);
    assert_eq!(json["message"], "Short URL created successfully");

    let data = &json["data"];
    let code = data["short_code"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert_eq!(data["original_url"], "https://example.com/page");
    assert_eq!(data["status"], "active");
    assert_eq!(data["short_url"], format!("{}/{}", common::BASE_URL, code));
    assert!(data["expires_at"].is_null());
    assert!(data["id"].is_i64());
    assert!(data.get("created_at").is_some());

    assert!(repo.exists_by_code(code).await.unwrap());
}

#[tokio::test]
async fn test_create_link_normalizes_custom_code() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/api/url")
        .json(&json!({
            "original_url": "https://example.com",
            "custom_short_code": "AbC-1"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["data"]["short_code"], "abc-1");
}

#[tokio::test]
async fn test_create_link_with_status_and_expiry() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/api/url")
        .json(&json!({
            "original_url": "https://example.com",
            "status": "inactive",
            "expires_at": "2030-01-01T00:00:00Z"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["data"]["status"], "inactive");
    assert_eq!(json["data"]["expires_at"], "2030-01-01T00:00:00Z");
}

#[tokio::test]
async fn test_create_link_duplicate_custom_code() {
    let (server, repo) = common::create_test_server();
    common::seed_active_link(&repo, "taken", "https://example.com").await;

    let response = server
        .post("/api/url")
        .json(&json!({
            "original_url": "https://other.example.com",
            "custom_short_code": "Taken"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["statusCode"], 409);
    assert_eq!(
        json["message"],
        "Something went wrong, Please try again later"
    );
    assert_eq!(json["data"]["error"], "conflict");
    assert_eq!(json["data"]["message"], "Custom short code already exists");
}

#[tokio::test]
async fn test_create_link_custom_code_too_short() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/api/url")
        .json(&json!({
            "original_url": "https://example.com",
            "custom_short_code": "a!b"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["data"]["message"], "Invalid custom short code format");
}

#[tokio::test]
async fn test_create_link_reserved_code() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/api/url")
        .json(&json!({
            "original_url": "https://example.com",
            "custom_short_code": "status"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_link_invalid_url() {
    let (server, repo) = common::create_test_server();

    let response = server
        .post("/api/url")
        .json(&json!({ "original_url": "not a url" }))
        .await;

    response.assert_status_bad_request();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["data"]["error"], "validation_error");
    assert_eq!(json["data"]["details"]["fields"][0]["field"], "original_url");

    assert!(repo.list_all(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_link_rejects_non_http_scheme() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/api/url")
        .json(&json!({ "original_url": "ftp://example.com/file" }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["data"]["message"], "Invalid URL format");
}

#[tokio::test]
async fn test_create_link_rejects_control_characters() {
    let (server, repo) = common::create_test_server();

    let response = server
        .post("/api/url")
        .json(&json!({
            "original_url": "https://example.com/a\nb",
            "custom_short_code": "nl01"
        }))
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["data"]["error"], "validation_error");

    assert!(repo.list_all(None).await.unwrap().is_empty());
    server.get("/api/nl01").await.assert_status_not_found();
}

#[tokio::test]
async fn test_create_link_malformed_body() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .post("/api/url")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["statusCode"], 400);
    assert_eq!(json["data"]["message"], "Invalid request body");
}

#[tokio::test]
async fn test_list_links_newest_first() {
    let (server, repo) = common::create_test_server();
    common::seed_active_link(&repo, "first", "https://example.com/1").await;
    common::seed_active_link(&repo, "second", "https://example.com/2").await;

    let response = server.get("/api/url").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["message"], "Urls fetched successfully");

    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["short_code"], "second");
    assert_eq!(data[1]["short_code"], "first");
}

#[tokio::test]
async fn test_list_links_filtered_by_status() {
    let (server, repo) = common::create_test_server();
    common::seed_active_link(&repo, "live1", "https://example.com/1").await;
    common::seed_link(
        &repo,
        "idle1",
        "https://example.com/2",
        LinkStatus::Inactive,
        None,
    )
    .await;

    let response = server
        .get("/api/url")
        .add_query_param("status", "inactive")
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["short_code"], "idle1");
}

#[tokio::test]
async fn test_list_links_unknown_status() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .get("/api/url")
        .add_query_param("status", "archived")
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_get_link_by_id() {
    let (server, repo) = common::create_test_server();
    let link = common::seed_active_link(&repo, "getme", "https://example.com").await;

    let response = server.get(&format!("/api/url/{}", link.id)).await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["message"], "URL retrieved successfully");
    assert_eq!(json["data"]["short_code"], "getme");
    assert_eq!(json["data"]["click_count"], 0);
}

#[tokio::test]
async fn test_get_link_not_found() {
    let (server, _repo) = common::create_test_server();

    let response = server.get("/api/url/999").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["data"]["error"], "not_found");
    assert_eq!(json["data"]["message"], "URL not found");
}

#[tokio::test]
async fn test_get_link_non_numeric_id() {
    let (server, _repo) = common::create_test_server();

    let response = server.get("/api/url/abc").await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["data"]["error"], "validation_error");
}

#[tokio::test]
async fn test_update_link_partial() {
    let (server, repo) = common::create_test_server();
    let link = common::seed_link(
        &repo,
        "upd1",
        "https://example.com",
        LinkStatus::Active,
        Some(chrono::Utc::now() + chrono::Duration::days(1)),
    )
    .await;

    let response = server
        .put(&format!("/api/url/{}", link.id))
        .json(&json!({ "status": "inactive", "expires_at": null }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["message"], "URL updated successfully");
    assert_eq!(json["data"]["status"], "inactive");
    assert!(json["data"]["expires_at"].is_null());
    assert_eq!(json["data"]["original_url"], "https://example.com");
    assert_eq!(json["data"]["short_code"], "upd1");
}

#[tokio::test]
async fn test_update_link_keeps_absent_expiry() {
    let (server, repo) = common::create_test_server();
    let expires_at = chrono::Utc::now() + chrono::Duration::days(1);
    let link = common::seed_link(
        &repo,
        "upd2",
        "https://example.com",
        LinkStatus::Active,
        Some(expires_at),
    )
    .await;

    server
        .put(&format!("/api/url/{}", link.id))
        .json(&json!({ "original_url": "https://rust-lang.org" }))
        .await
        .assert_status_ok();

    let stored = repo.find_by_id(link.id).await.unwrap().unwrap();
    assert_eq!(stored.original_url, "https://rust-lang.org");
    assert_eq!(stored.expires_at, Some(expires_at));
}

#[tokio::test]
async fn test_update_link_invalid_url() {
    let (server, repo) = common::create_test_server();
    let link = common::seed_active_link(&repo, "upd3", "https://example.com").await;

    let response = server
        .put(&format!("/api/url/{}", link.id))
        .json(&json!({ "original_url": "nope" }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn test_update_link_rejects_control_characters() {
    let (server, repo) = common::create_test_server();
    let link = common::seed_active_link(&repo, "upd4", "https://example.com").await;

    let response = server
        .put(&format!("/api/url/{}", link.id))
        .json(&json!({ "original_url": "https://example.com/\r\nx" }))
        .await;

    response.assert_status_bad_request();

    let stored = repo.find_by_id(link.id).await.unwrap().unwrap();
    assert_eq!(stored.original_url, "https://example.com");
}

#[tokio::test]
async fn test_update_link_not_found() {
    let (server, _repo) = common::create_test_server();

    let response = server
        .put("/api/url/404")
        .json(&json!({ "status": "inactive" }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn test_delete_link_twice() {
    let (server, repo) = common::create_test_server();
    let link = common::seed_active_link(&repo, "del1", "https://example.com").await;
    let path = format!("/api/url/{}", link.id);

    let response = server.delete(&path).await;
    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["message"], "URL has been deleted");
    assert_eq!(json["data"]["deleted_count"], 1);

    let response = server.delete(&path).await;
    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["data"]["deleted_count"], 0);
}

#[tokio::test]
async fn test_link_stats() {
    let (server, repo) = common::create_test_server();
    let link = common::seed_active_link(&repo, "stat1", "https://example.com").await;
    repo.increment_click_count("stat1").await.unwrap();
    repo.increment_click_count("stat1").await.unwrap();

    let response = server.get(&format!("/api/url/{}/stats", link.id)).await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["message"], "URL statistics retrieved successfully");
    assert_eq!(json["data"]["click_count"], 2);
    assert!(json["data"].get("updated_at").is_some());
}

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let (server, _repo) = common::create_test_server();

    let created = server
        .post("/api/url")
        .json(&json!({
            "original_url": "https://example.com/round",
            "custom_short_code": "round1"
        }))
        .await
        .json::<serde_json::Value>();
    let id = created["data"]["id"].as_i64().unwrap();

    let fetched = server
        .get(&format!("/api/url/{id}"))
        .await
        .json::<serde_json::Value>();

    assert_eq!(fetched["data"]["original_url"], "https://example.com/round");
    assert_eq!(fetched["data"]["short_code"], "round1");
    assert_eq!(fetched["data"]["status"], "active");
}

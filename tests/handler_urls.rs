mod common;

use serde_json::json;

use common::{BASE_URL, spawn_app};

#[tokio::test]
async fn test_list_urls_newest_first() {
    let app = spawn_app();
    for alias in ["first", "second", "third"] {
        common::create_url(&app, "owner-1", json!({ "url": format!("example.com/{alias}"), "alias": alias })).await;
    }

    let response = app
        .server
        .get("/v1/api/urls")
        .add_header("Authorization", app.token("owner-1"))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["message"], "URLs retrieved successfully");
    assert_eq!(json["total"], 3);
    assert_eq!(json["page"], 1);
    assert_eq!(json["limit"], 10);

    let slugs: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec!["third", "second", "first"]);

    let newest = &json["data"][0];
    assert_eq!(newest["shortUrl"], format!("{BASE_URL}/third"));
    assert_eq!(newest["originalUrl"], "example.com/third");
    assert_eq!(newest["customAlias"], true);
    assert_eq!(newest["visitCount"], 0);
    assert!(newest["lastVisitedAt"].is_null());
    assert!(newest["createdAt"].is_string());
}

#[tokio::test]
async fn test_list_urls_paginates() {
    let app = spawn_app();
    for i in 0..3 {
        common::create_url(&app, "owner-1", json!({ "url": format!("example.com/{i}") })).await;
    }

    let response = app
        .server
        .get("/v1/api/urls")
        .add_query_param("page", 2)
        .add_query_param("pageSize", 2)
        .add_header("Authorization", app.token("owner-1"))
        .await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total"], 3);
    assert_eq!(json["page"], 2);
    assert_eq!(json["limit"], 2);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["originalUrl"], "example.com/0");
}

#[tokio::test]
async fn test_list_urls_page_past_end_is_empty() {
    let app = spawn_app();
    common::create_url(&app, "owner-1", json!({ "url": "example.com" })).await;

    let response = app
        .server
        .get("/v1/api/urls?page=5&limit=10")
        .add_header("Authorization", app.token("owner-1"))
        .await;

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["total"], 1);
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_list_urls_only_live_records_of_owner() {
    let app = spawn_app();
    let mine = common::create_url(&app, "owner-1", json!({ "url": "example.com/mine" })).await;
    let doomed = common::create_url(&app, "owner-1", json!({ "url": "example.com/doomed" })).await;
    common::create_url(&app, "owner-2", json!({ "url": "example.com/theirs" })).await;

    app.server
        .delete(&format!("/v1/api/urls/{}", doomed["id"]))
        .add_header("Authorization", app.token("owner-1"))
        .await;

    let json = app
        .server
        .get("/v1/api/urls")
        .add_header("Authorization", app.token("owner-1"))
        .await
        .json::<serde_json::Value>();

    assert_eq!(json["total"], 1);
    assert_eq!(json["data"][0]["id"], mine["id"]);
}

#[tokio::test]
async fn test_list_urls_rejects_bad_paging() {
    let app = spawn_app();

    for query in [
        "limit=101",
        "limit=0",
        "page=0",
        "page=922337203685477580&limit=100",
    ] {
        let response = app
            .server
            .get(&format!("/v1/api/urls?{query}"))
            .add_header("Authorization", app.token("owner-1"))
            .await;

        response.assert_status_bad_request();
        assert_eq!(
            response.json::<serde_json::Value>()["error"]["code"],
            "validation_error"
        );
    }
}

#[tokio::test]
async fn test_list_urls_requires_token() {
    let app = spawn_app();

    let response = app.server.get("/v1/api/urls").await;

    response.assert_status_unauthorized();
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "unauthorized"
    );
}

#[tokio::test]
async fn test_delete_url_twice() {
    let app = spawn_app();
    let item = common::create_url(&app, "owner-1", json!({ "url": "example.com" })).await;
    let path = format!("/v1/api/urls/{}", item["id"]);

    let first = app
        .server
        .delete(&path)
        .add_header("Authorization", app.token("owner-1"))
        .await;
    assert_eq!(first.status_code(), 204);
    assert!(first.text().is_empty());

    let second = app
        .server
        .delete(&path)
        .add_header("Authorization", app.token("owner-1"))
        .await;
    second.assert_status_not_found();
    assert_eq!(
        second.json::<serde_json::Value>()["error"]["message"],
        "No matching URL found"
    );
}

#[tokio::test]
async fn test_delete_foreign_url_is_not_found() {
    let app = spawn_app();
    let item = common::create_url(&app, "owner-1", json!({ "url": "example.com" })).await;
    let id = item["id"].as_i64().unwrap();

    let response = app
        .server
        .delete(&format!("/v1/api/urls/{id}"))
        .add_header("Authorization", app.token("owner-2"))
        .await;

    response.assert_status_not_found();
    assert!(!app.urls.get(id).await.unwrap().deleted);
}

#[tokio::test]
async fn test_delete_unknown_url_is_not_found() {
    let app = spawn_app();

    let response = app
        .server
        .delete("/v1/api/urls/9999")
        .add_header("Authorization", app.token("owner-1"))
        .await;

    response.assert_status_not_found();
}

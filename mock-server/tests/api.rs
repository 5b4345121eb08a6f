use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_auth};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- root ---

#[tokio::test]
async fn root_serves_enveloped_server_info() {
    let resp = app().oneshot(get_request("/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["project_name"], "basin mock server");
    assert!(json["data"]["project_version"].is_string());
}

// --- buckets ---

#[tokio::test]
async fn create_bucket_returns_201_with_envelope() {
    let resp = app()
        .oneshot(json_request("POST", "/buckets", r#"{"id":"blog"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body_json(resp).await;
    assert_eq!(json["data"]["id"], "blog");
    assert!(json["data"]["last_modified"].is_i64());
}

#[tokio::test]
async fn get_missing_bucket_is_structured_404() {
    let resp = app().oneshot(get_request("/buckets/nope")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = body_json(resp).await;
    assert_eq!(json["errno"], 110);
    assert_eq!(json["message"], "Not found");
    assert_eq!(json["code"], 404);
    assert_eq!(json["error"], "Not Found");
}

#[tokio::test]
async fn create_record_in_missing_collection_is_404() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/buckets/nope/collections/nope/records",
            r#"{"title":"orphan"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- auth gate ---

#[tokio::test]
async fn auth_gate_rejects_missing_credentials() {
    let resp = app_with_auth(Some("Basic dGVzdDp0ZXN0".to_string()))
        .oneshot(get_request("/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(resp).await;
    assert_eq!(json["errno"], 104);
    assert_eq!(json["error"], "Unauthorized");
}

#[tokio::test]
async fn auth_gate_accepts_matching_credentials() {
    let req = Request::builder()
        .uri("/")
        .header("authorization", "Basic dGVzdDp0ZXN0")
        .body(String::new())
        .unwrap();
    let resp = app_with_auth(Some("Basic dGVzdDp0ZXN0".to_string()))
        .oneshot(req)
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// --- full record lifecycle ---

#[tokio::test]
async fn record_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // Parent resources.
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/buckets", r#"{"id":"default"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/buckets/default/collections",
            r#"{"id":"posts"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Create.
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/buckets/default/collections/posts/records",
            r#"{"title":"Walk dog","description":"morning"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let first_stamp = created["data"]["last_modified"].as_i64().unwrap();

    // Get.
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(&format!(
            "/buckets/default/collections/posts/records/{id}"
        )))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched = body_json(resp).await;
    assert_eq!(fetched["data"]["title"], "Walk dog");

    // Partial update keeps the other field and bumps last_modified.
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            &format!("/buckets/default/collections/posts/records/{id}"),
            r#"{"title":"Walk cat"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let patched = body_json(resp).await;
    assert_eq!(patched["data"]["title"], "Walk cat");
    assert_eq!(patched["data"]["description"], "morning");
    assert!(patched["data"]["last_modified"].as_i64().unwrap() > first_stamp);

    // Full replacement drops omitted fields.
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/buckets/default/collections/posts/records/{id}"),
            r#"{"title":"Feed fish"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let replaced = body_json(resp).await;
    assert_eq!(replaced["data"]["title"], "Feed fish");
    assert!(replaced["data"].get("description").is_none());

    // Delete confirms the removed id.
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .method("DELETE")
                .uri(&format!("/buckets/default/collections/posts/records/{id}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted = body_json(resp).await;
    assert_eq!(deleted["data"]["id"], id.as_str());
    assert_eq!(deleted["data"]["deleted"], true);
    // Get after delete — structured 404.
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(&format!(
            "/buckets/default/collections/posts/records/{id}"
        )))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let json = body_json(resp).await;
    assert_eq!(json["errno"], 110);
}

// --- listing ---

#[tokio::test]
async fn list_records_honors_sort_param() {
    use tower::Service;

    let mut app = app().into_service();

    ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/buckets", r#"{"id":"default"}"#))
        .await
        .unwrap();
    ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/buckets/default/collections",
            r#"{"id":"posts"}"#,
        ))
        .await
        .unwrap();
    for body in [
        r#"{"title":"b","description":"2"}"#,
        r#"{"title":"a","description":"9"}"#,
        r#"{"title":"b","description":"1"}"#,
    ] {
        ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request(
                "POST",
                "/buckets/default/collections/posts/records",
                body,
            ))
            .await
            .unwrap();
    }

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(
            "/buckets/default/collections/posts/records?_sort=title,description",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    let listed: Vec<(&str, &str)> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| {
            (
                r["title"].as_str().unwrap(),
                r["description"].as_str().unwrap(),
            )
        })
        .collect();
    assert_eq!(listed, [("a", "9"), ("b", "1"), ("b", "2")]);

    // Descending by title.
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(
            "/buckets/default/collections/posts/records?_sort=-title",
        ))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"][0]["title"], "b");
}

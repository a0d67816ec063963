
use actix_web::{http::StatusCode, test};
use portfolio_cms::{
    constants::MAX_BODY_BYTES,
    repositories::document_store::{DocumentStore, Filter},
};
use serde_json::{json, Value};
use test_utils::*;

fn post_body(title: &str) -> Value {
    json!({
        "title": title,
        "excerpt": "A short excerpt",
        "content": "# Heading\n\nSome **markdown** body.",
        "tags": ["rust", "web"]
    })
}

#[actix_rt::test]
async fn unauthenticated_create_is_rejected_and_stores_nothing() {
    let app = TestApp::new();
    let svc = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .set_json(post_body("Hello World"))
        .to_request();
    let resp = test::call_service(&svc, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(error_code(&body), "UNAUTHORIZED");
    assert!(body.get("data").is_none());
    assert_eq!(app.store.count("blogs", &Filter::all()).await.unwrap(), 0);
}

#[actix_rt::test]
async fn authenticated_create_returns_201_with_defaults() {
    let app = TestApp::new();
    let svc = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(app.bearer())
        .set_json(post_body("Hello World"))
        .to_request();
    let resp = test::call_service(&svc, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["_id"].as_str().map(str::len), Some(24));
    assert_eq!(data["title"], "Hello World");
    assert_eq!(data["slug"], "hello-world");
    assert_eq!(data["likes"], 0);
    assert_eq!(data["version"], 1);
    assert_eq!(data["status"], "draft");
}

#[actix_rt::test]
async fn invalid_payload_reports_every_missing_field() {
    let app = TestApp::new();
    let svc = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(app.bearer())
        .set_json(json!({ "tags": ["rust"] }))
        .to_request();
    let resp = test::call_service(&svc, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
    let details = body["error"]["details"].as_object().unwrap();
    for field in ["title", "excerpt", "content"] {
        assert!(!details[field].as_array().unwrap().is_empty(), "missing detail for {field}");
    }
}

#[actix_rt::test]
async fn duplicate_slug_is_a_bad_request() {
    let app = TestApp::new();
    let svc = init_app!(app);

    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let req = test::TestRequest::post()
            .uri("/api/blogs")
            .insert_header(app.bearer())
            .set_json(post_body("Same Title"))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), expected);
    }
    assert_eq!(app.store.count("blogs", &Filter::all()).await.unwrap(), 1);
}

#[actix_rt::test]
async fn likes_count_once_per_client_address() {
    let app = TestApp::new();
    let svc = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(app.bearer())
        .set_json(post_body("Likeable"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&svc, req).await;
    let id = created["data"]["_id"].as_str().unwrap().to_string();
    let like_uri = format!("/api/blogs/{}/like", id);

    let like = |peer: &str| {
        test::TestRequest::post()
            .uri(&like_uri)
            .peer_addr(format!("{}:5000", peer).parse().unwrap())
            .to_request()
    };

    let resp = test::call_service(&svc, like("198.51.100.1")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["likes"], 1);

    let resp = test::call_service(&svc, like("198.51.100.1")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(error_code(&body), "BAD_REQUEST");

    let resp = test::call_service(&svc, like("198.51.100.2")).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["likes"], 2);
    assert_eq!(body["data"]["likedBy"], json!(["198.51.100.1", "198.51.100.2"]));
}

#[actix_rt::test]
async fn publish_needs_a_token_and_bumps_version() {
    let app = TestApp::new();
    let svc = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(app.bearer())
        .set_json(post_body("To Publish"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&svc, req).await;
    let uri = format!("/api/blogs/{}/publish", created["data"]["_id"].as_str().unwrap());

    let anonymous = test::TestRequest::post().uri(&uri).to_request();
    assert_eq!(test::call_service(&svc, anonymous).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post().uri(&uri).insert_header(app.bearer()).to_request();
    let body: Value = test::call_and_read_body_json(&svc, req).await;
    assert_eq!(body["data"]["status"], "published");
    assert_eq!(body["data"]["version"], 2);
    assert!(body["data"]["publishedAt"].is_string());
}

#[actix_rt::test]
async fn slug_route_renders_markdown_and_tags_are_listed() {
    let app = TestApp::new();
    let svc = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(app.bearer())
        .set_json(post_body("Rendered Post"))
        .to_request();
    test::call_service(&svc, req).await;

    let req = test::TestRequest::get().uri("/api/blogs/slug/rendered-post").to_request();
    let body: Value = test::call_and_read_body_json(&svc, req).await;
    assert!(body["data"]["contentHtml"].as_str().unwrap().contains("<strong>markdown</strong>"));

    let req = test::TestRequest::get().uri("/api/blogs/tags").to_request();
    let body: Value = test::call_and_read_body_json(&svc, req).await;
    assert_eq!(body["data"], json!(["rust", "web"]));

    let req = test::TestRequest::get().uri("/api/blogs/slug/missing").to_request();
    assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn bad_list_queries_are_validation_errors() {
    let app = TestApp::new();
    let svc = init_app!(app);

    for uri in ["/api/blogs?limit=0", "/api/blogs?limit=abc", "/api/blogs?status=deleted"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(error_code(&body), "VALIDATION_ERROR", "{uri}");
    }

    let req = test::TestRequest::get().uri("/api/blogs?limit=5&tag=rust").to_request();
    let body: Value = test::call_and_read_body_json(&svc, req).await;
    assert_eq!(body["data"], json!([]));
}

fn oversized_post() -> Value {
    json!({
        "title": "Too Long",
        "excerpt": "A short excerpt",
        "content": "x".repeat(MAX_BODY_BYTES + 1024)
    })
}

#[actix_rt::test]
async fn oversized_bodies_still_authenticate_first() {
    let app = TestApp::new();
    let svc = init_app!(app);

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .set_json(oversized_post())
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(error_code(&body), "UNAUTHORIZED");

    let req = test::TestRequest::post()
        .uri("/api/blogs")
        .insert_header(app.bearer())
        .set_json(oversized_post())
        .to_request();
    let resp = test::call_service(&svc, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(error_code(&body), "VALIDATION_ERROR");
    assert!(body["error"]["details"]["body"].is_array());

    assert_eq!(app.store.count("blogs", &Filter::all()).await.unwrap(), 0);
}

#[actix_rt::test]
async fn unknown_routes_and_methods_answer_with_envelopes() {
    let app = TestApp::new();
    let svc = init_app!(app);

    let requests = [
        ("/api/nothing-here", test::TestRequest::get()),
        ("/nothing-here", test::TestRequest::get()),
        ("/api/blogs", test::TestRequest::put().set_json(json!({}))),
        ("/api/auth/login", test::TestRequest::get()),
    ];

    for (uri, builder) in requests {
        let resp = test::call_service(&svc, builder.uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false, "{uri}");
        assert_eq!(error_code(&body), "NOT_FOUND", "{uri}");
    }

    // Handler-produced 404s keep their own message.
    let req = test::TestRequest::get().uri("/api/blogs/slug/missing").to_request();
    let body: Value = test::call_and_read_body_json(&svc, req).await;
    assert_eq!(error_code(&body), "NOT_FOUND");
    assert!(!body["error"]["message"].as_str().unwrap().starts_with("No route"));
}

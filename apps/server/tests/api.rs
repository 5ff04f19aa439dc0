use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use futures::StreamExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use techfolio_server::{api::app_router, build_state, config::Config};

/// Builds an in-process router backed by a throwaway database. The tempdir
/// must stay alive for the duration of the test or SQLite loses its file.
async fn build_test_app(configure: impl FnOnce(&mut Config)) -> (axum::Router, TempDir) {
    let tmp = TempDir::new().unwrap();
    let mut config = Config {
        listen_addr: "127.0.0.1:0".to_string(),
        db_path: tmp.path().join("test.db").to_string_lossy().into_owned(),
        event_sink_url: None,
        event_sink_timeout: Duration::from_millis(200),
        stream_tick: Duration::from_millis(50),
        api_token: None,
    };
    configure(&mut config);

    let state = build_state(&config).await.unwrap();
    (app_router(state), tmp)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn response_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn sample_portfolio(name: &str) -> Value {
    json!({
        "name": name,
        "description": "Edge compute and networking estate",
        "portfolioType": "ENTERPRISE",
        "ownerId": "7",
        "organizationId": "org-1",
    })
}

fn sample_technology(name: &str, annual_cost: Value) -> Value {
    json!({
        "name": name,
        "category": "Infrastructure",
        "technologyType": "DATABASE",
        "maturityLevel": "MATURE",
        "riskLevel": "LOW",
        "annualCost": annual_cost,
    })
}

#[tokio::test]
async fn portfolio_lifecycle_and_summary() {
    let (app, _tmp) = build_test_app(|_| {}).await;

    // Create the portfolio
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/portfolios",
            sample_portfolio("Edge Infra"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let portfolio = response_json(response).await;
    let portfolio_id = portfolio["id"].as_str().unwrap().to_string();
    assert_eq!(portfolio["name"], "Edge Infra");
    assert_eq!(portfolio["status"], "ACTIVE");
    assert_eq!(portfolio["isActive"], true);

    // Attach two technologies, one without a known annual cost
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/portfolios/{}/technologies", portfolio_id),
            sample_technology("Postgres", json!(1200.0)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let postgres = response_json(response).await;
    let postgres_id = postgres["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/portfolios/{}/technologies", portfolio_id),
            sample_technology("Redis", Value::Null),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // The summary joins the live count with the cost sum
    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/v1/portfolios/{}/summary",
            portfolio_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let summary = response_json(response).await;
    assert_eq!(summary["technologyCount"], 2);
    assert_eq!(summary["totalAnnualCost"], 1200.0);

    // Removing the costed technology drops it from both aggregates
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!(
                    "/api/v1/portfolios/{}/technologies/{}",
                    portfolio_id, postgres_id
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(get_request(&format!(
            "/api/v1/portfolios/{}/summary",
            portfolio_id
        )))
        .await
        .unwrap();
    let summary = response_json(response).await;
    assert_eq!(summary["technologyCount"], 1);
    assert_eq!(summary["totalAnnualCost"], 0.0);

    // Listing returns summaries, not bare rows
    let response = app
        .clone()
        .oneshot(get_request("/api/v1/portfolios"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listed = response_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["technologyCount"], 1);
}

#[tokio::test]
async fn duplicate_active_name_conflicts_until_deleted() {
    let (app, _tmp) = build_test_app(|_| {}).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/portfolios",
            sample_portfolio("Edge Infra"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let first = response_json(response).await;
    let first_id = first["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/portfolios",
            sample_portfolio("Edge Infra"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Logical deletion frees the name for reuse
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!("/api/v1/portfolios/{}", first_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/portfolios",
            sample_portfolio("Edge Infra"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn missing_portfolio_is_not_found() {
    let (app, _tmp) = build_test_app(|_| {}).await;

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/portfolios/no-such-id"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(get_request("/api/v1/portfolios/no-such-id/summary"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_input_is_rejected() {
    let (app, _tmp) = build_test_app(|_| {}).await;

    let mut portfolio = sample_portfolio("Edge Infra");
    portfolio["portfolioType"] = json!("SKUNKWORKS");
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/api/v1/portfolios", portfolio))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("SKUNKWORKS"));

    // A technology cannot be attached to a portfolio that does not exist
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/portfolios/no-such-id/technologies",
            sample_technology("Postgres", json!(1200.0)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn technology_delete_requires_owning_portfolio() {
    let (app, _tmp) = build_test_app(|_| {}).await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/portfolios",
            sample_portfolio("Edge Infra"),
        ))
        .await
        .unwrap();
    let owner = response_json(response).await;
    let owner_id = owner["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/portfolios",
            sample_portfolio("Data Science"),
        ))
        .await
        .unwrap();
    let other = response_json(response).await;
    let other_id = other["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            &format!("/api/v1/portfolios/{}/technologies", owner_id),
            sample_technology("Postgres", json!(1200.0)),
        ))
        .await
        .unwrap();
    let postgres = response_json(response).await;
    let postgres_id = postgres["id"].as_str().unwrap().to_string();

    // The wrong portfolio's URL must not reach the technology.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!(
                    "/api/v1/portfolios/{}/technologies/{}",
                    other_id, postgres_id
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(get_request(&format!("/api/v1/technologies/{}", postgres_id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let technology = response_json(response).await;
    assert_eq!(technology["isActive"], true);

    // The owning portfolio's URL still works.
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::DELETE)
                .uri(format!(
                    "/api/v1/portfolios/{}/technologies/{}",
                    owner_id, postgres_id
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn stream_emits_summary_frames() {
    let (app, _tmp) = build_test_app(|config| {
        config.stream_tick = Duration::from_millis(20);
    })
    .await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/portfolios",
            sample_portfolio("Edge Infra"),
        ))
        .await
        .unwrap();
    let portfolio = response_json(response).await;
    let portfolio_id = portfolio["id"].as_str().unwrap().to_string();

    let response = app
        .oneshot(get_request(&format!(
            "/api/v1/portfolios/{}/stream?policy=buffer&capacity=4",
            portfolio_id
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    // Read body chunks until a full summary frame has arrived.
    let mut frames = response.into_body().into_data_stream();
    let mut collected = String::new();
    while !collected.contains("technologyCount") {
        let chunk = tokio::time::timeout(Duration::from_secs(5), frames.next())
            .await
            .expect("no SSE frame within one tick interval")
            .expect("stream ended before a summary frame")
            .expect("stream yielded an error frame");
        collected.push_str(std::str::from_utf8(&chunk).unwrap());
    }
    assert!(collected.contains("event: summary"));
    assert!(collected.contains("\"technologyCount\":0"));

    // Client disconnect: dropping the body cancels the subscription.
    drop(frames);
}

#[tokio::test]
async fn publish_failure_does_not_affect_writes() {
    // Port 9 is discard; nothing answers there, so every publish fails.
    let (app, _tmp) = build_test_app(|config| {
        config.event_sink_url = Some("http://127.0.0.1:9/events".to_string());
    })
    .await;

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/portfolios",
            sample_portfolio("Edge Infra"),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let portfolio = response_json(response).await;

    // The write is durable even though its change event went nowhere
    let response = app
        .oneshot(get_request(&format!(
            "/api/v1/portfolios/{}",
            portfolio["id"].as_str().unwrap()
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn bearer_token_guards_api_but_not_health() {
    let (app, _tmp) = build_test_app(|config| {
        config.api_token = Some("sekret".to_string());
    })
    .await;

    let response = app
        .clone()
        .oneshot(get_request("/api/v1/portfolios"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/portfolios")
                .header(header::AUTHORIZATION, "Bearer wrong")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/portfolios")
                .header(header::AUTHORIZATION, "Bearer sekret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

//! Route-level tests: the full application router against mocked upstreams

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path, query_param},
};

use griddy::{AppState, GriddyConfig, web};

/// Config whose every upstream points at the mock server
fn test_config(upstream: &MockServer) -> GriddyConfig {
    let mut config = GriddyConfig::default();
    config.llm.api_key = Some("sk-test".to_string());
    config.llm.base_url = upstream.uri();
    config.geocoding.api_key = Some("maps-test".to_string());
    config.geocoding.base_url = upstream.uri();
    config.ml.base_url = upstream.uri();
    config
}

fn build_app(config: GriddyConfig) -> Router {
    web::app(AppState::from_config(config))
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn parse_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

async fn mount_extraction(upstream: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(completion(content))
        .mount(upstream)
        .await;
}

#[tokio::test]
async fn test_agent_geocodes_extracted_location() {
    let upstream = MockServer::start().await;
    mount_extraction(
        &upstream,
        r#"{"locationQuery": "Dubbo, NSW", "technology": "solar"}"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .and(query_param("address", "Dubbo, NSW, Australia"))
        .and(query_param("key", "maps-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [{
                "formatted_address": "Dubbo NSW 2830, Australia",
                "place_id": "ChIJ-dubbo",
                "geometry": {"location": {"lat": -32.2569, "lng": 148.6011}}
            }]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let response = build_app(test_config(&upstream))
        .oneshot(post_json(
            "/api/agent",
            r#"{"prompt": "100MW solar farm near Dubbo"}"#,
        ))
        .await
        .unwrap();

    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::OK);

    let result = &json["result"];
    assert_eq!(result["technology"], "solar");
    assert_eq!(result["locationQuery"], "Dubbo, NSW, Australia");
    assert_eq!(result["coordinate"]["lat"], -32.2569);
    assert_eq!(result["coordinate"]["lng"], 148.6011);
    assert_eq!(result["fullAddress"], "Dubbo NSW 2830, Australia");
    assert_eq!(result["placeId"], "ChIJ-dubbo");
    assert_eq!(result["source"], "google-geocoding");
    assert!(result.get("error").is_none());
}

#[tokio::test]
async fn test_agent_geocoding_miss_is_soft_failure() {
    let upstream = MockServer::start().await;
    mount_extraction(&upstream, r#"{"locationQuery": "Atlantis"}"#).await;

    Mock::given(method("GET"))
        .and(path("/geocode/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "ZERO_RESULTS", "results": []})),
        )
        .mount(&upstream)
        .await;

    let response = build_app(test_config(&upstream))
        .oneshot(post_json("/api/agent", r#"{"prompt": "somewhere"}"#))
        .await
        .unwrap();

    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"]["error"], "Geocoding failed");
    assert_eq!(json["result"]["technology"], "wind");
    assert_eq!(json["result"]["locationQuery"], "Atlantis, Australia");
    assert!(json["result"].get("coordinate").is_none());
}

#[tokio::test]
async fn test_agent_rejects_missing_prompt() {
    let upstream = MockServer::start().await;
    let app = build_app(test_config(&upstream));

    for body in ["{}", r#"{"prompt": ""}"#, "not json"] {
        let response = app.clone().oneshot(post_json("/api/agent", body)).await.unwrap();
        let (status, json) = parse_body(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(json, json!({"error": "Missing prompt"}));
    }

    // nothing may reach the model for a rejected prompt
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_agent_missing_maps_key() {
    let upstream = MockServer::start().await;
    mount_extraction(&upstream, r#"{"locationQuery": "Dubbo"}"#).await;

    let mut config = test_config(&upstream);
    config.geocoding.api_key = None;
    config.geocoding.public_api_key = None;

    let response = build_app(config)
        .oneshot(post_json("/api/agent", r#"{"prompt": "wind near Dubbo"}"#))
        .await
        .unwrap();

    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({"error": "Missing Google Maps API key"}));
}

#[tokio::test]
async fn test_agent_missing_llm_key() {
    let upstream = MockServer::start().await;
    let mut config = test_config(&upstream);
    config.llm.api_key = None;

    let response = build_app(config)
        .oneshot(post_json("/api/agent", r#"{"prompt": "wind near Dubbo"}"#))
        .await
        .unwrap();

    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({"error": "Missing language model API key"}));
}

#[tokio::test]
async fn test_agent_upstream_failure() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&upstream)
        .await;

    let response = build_app(test_config(&upstream))
        .oneshot(post_json("/api/agent", r#"{"prompt": "wind near Dubbo"}"#))
        .await
        .unwrap();

    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({"error": "Agent failed"}));
}

#[tokio::test]
async fn test_ml_dates_relays_status_and_body() {
    let upstream = MockServer::start().await;
    let dates = json!({
        "summary": {"count": 1, "min_date": "2024-01-01", "max_date": "2024-01-01"},
        "dates": ["2024-01-01"]
    });
    Mock::given(method("GET"))
        .and(path("/dates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(dates.clone()))
        .mount(&upstream)
        .await;

    let response = build_app(test_config(&upstream))
        .oneshot(get("/api/ml/dates"))
        .await
        .unwrap();

    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, dates);
}

#[tokio::test]
async fn test_ml_score_relays_upstream_error_verbatim() {
    let upstream = MockServer::start().await;
    let request = json!({"lat": -32.2, "lon": 148.6, "date": "1999-01-01"});
    Mock::given(method("POST"))
        .and(path("/score"))
        .and(body_json(request.clone()))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"detail": "date out of range"})),
        )
        .mount(&upstream)
        .await;

    let response = build_app(test_config(&upstream))
        .oneshot(post_json("/api/ml/score", &request.to_string()))
        .await
        .unwrap();

    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json, json!({"detail": "date out of range"}));
}

#[tokio::test]
async fn test_ml_score_proxy_failures() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/score"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&upstream)
        .await;
    let app = build_app(test_config(&upstream));

    // request body is not JSON
    let response = app
        .clone()
        .oneshot(post_json("/api/ml/score", "lat=1"))
        .await
        .unwrap();
    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({"error": "Proxy failed"}));

    // upstream body is not JSON
    let response = app
        .oneshot(post_json("/api/ml/score", r#"{"lat": 1}"#))
        .await
        .unwrap();
    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({"error": "Proxy failed"}));
}

#[tokio::test]
async fn test_ml_dates_unreachable_upstream() {
    let mut config = GriddyConfig::default();
    config.ml.base_url = "http://127.0.0.1:9".to_string();

    let response = build_app(config).oneshot(get("/api/ml/dates")).await.unwrap();

    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, json!({"error": "Proxy failed"}));
}

#[tokio::test]
async fn test_echo_ml_returns_three_sites_near_coordinate() {
    let response = build_app(GriddyConfig::default())
        .oneshot(post_json(
            "/api/echo-ml",
            r#"{"coordinate": {"lat": -37.56, "lng": 143.85}}"#,
        ))
        .await
        .unwrap();

    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::OK);

    let sites = json["sites"].as_array().unwrap();
    assert_eq!(sites.len(), 3);
    for site in sites {
        let lat = site["lat"].as_f64().unwrap();
        let lng = site["lng"].as_f64().unwrap();
        let score = site["score"].as_f64().unwrap();
        assert!((lat - -37.56).abs() <= 0.6);
        assert!((lng - 143.85).abs() <= 0.6);
        assert!((0.7..=0.95).contains(&score));
    }
}

#[tokio::test]
async fn test_echo_ml_without_body_uses_default_base() {
    let response = build_app(GriddyConfig::default())
        .oneshot(post_json("/api/echo-ml", ""))
        .await
        .unwrap();

    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::OK);
    for site in json["sites"].as_array().unwrap() {
        assert!((site["lat"].as_f64().unwrap() - -32.2469).abs() <= 0.6);
    }
}

#[tokio::test]
async fn test_health() {
    let response = build_app(GriddyConfig::default())
        .oneshot(get("/api/health"))
        .await
        .unwrap();

    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], griddy::VERSION);
}

#[tokio::test]
async fn test_map_config_exposes_only_public_key() {
    let mut config = GriddyConfig::default();
    config.geocoding.api_key = Some("server-secret".to_string());
    config.geocoding.public_api_key = Some("browser-key".to_string());

    let response = build_app(config).oneshot(get("/api/map-config")).await.unwrap();

    let (status, json) = parse_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["apiKey"], "browser-key");
    assert_eq!(json["zoom"], 5);
    assert_eq!(json["center"]["lat"], -25.2744);
    assert!(!json.to_string().contains("server-secret"));
}

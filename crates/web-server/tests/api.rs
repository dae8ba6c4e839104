use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use dataset::{DatasetCache, REQUIRED_COLUMNS};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use web_server::{build_router, AppState};

const ROWS: [&str; 4] = [
    "Harbour Noodle Bar,Viaduct,Asian,QSR,4000,25,0.20,0.45,0.30,0.05,20000,45000,30000,5000,6,2,1.02",
    "Federal Street Grill,CBD,Steakhouse,Fine Dining,1000,100,0.80,0.10,0.05,0.05,80000,10000,5000,5000,22,8,1.08",
    "Wynyard Pizza Co,Wynyard Quarter,Italian,QSR,5000,20,0.10,0.55,0.30,0.05,10000,55000,30000,5000,4,1,1.01",
    "Victoria Lane Bistro,CBD,European,Casual Dining,2000,50,0.55,0.20,0.15,0.10,55000,20000,15000,10000,11,4,1.05",
];

fn write_dataset(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("restaurants.csv");
    let mut body = REQUIRED_COLUMNS.join(",");
    for row in ROWS {
        body.push('\n');
        body.push_str(row);
    }
    std::fs::write(&path, body).unwrap();
    path
}

fn app(path: &Path) -> Router {
    build_router(Arc::new(AppState::new(DatasetCache::new(path), 10)))
}

async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_check_responds_ok() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir);
    let response = app(&path)
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn facets_list_values_in_first_appearance_order() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir);
    let (status, body) = send(app(&path), Method::GET, "/api/facets").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subregions"], serde_json::json!(["Viaduct", "CBD", "Wynyard Quarter"]));
    assert_eq!(body["segments"], serde_json::json!(["QSR", "Fine Dining", "Casual Dining"]));
    assert_eq!(body["row_count"], 4);
}

#[tokio::test]
async fn dashboard_without_filters_covers_every_row() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir);
    let (status, body) = send(app(&path), Method::GET, "/api/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kpis"]["restaurant_count"], 4);
    assert_eq!(body["kpis"]["total_orders"], 12_000);
    assert_eq!(body["kpis"]["high_risk_count"], 2);
    assert_eq!(body["channel_view"]["mode"], "OverallMix");
    assert_eq!(body["top_risk"][0]["name"], "Wynyard Pizza Co");
}

#[tokio::test]
async fn dashboard_applies_facet_selection_and_view() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir);
    let (status, body) = send(
        app(&path),
        Method::GET,
        "/api/dashboard?subregion=CBD&view=comparison&top=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kpis"]["restaurant_count"], 2);
    assert_eq!(body["kpis"]["high_risk_count"], 0);
    assert_eq!(body["channel_view"]["mode"], "DeliveryComparison");
    assert!(body["channel_view"]["data"]["Fine Dining"].is_object());
    // Both CBD rows sit below the threshold.
    assert_eq!(body["top_risk"], serde_json::json!([]));
}

#[tokio::test]
async fn top_parameter_bounds_the_risk_list() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir);
    let (status, body) = send(
        app(&path),
        Method::GET,
        "/api/dashboard?subregion=Viaduct,Wynyard%20Quarter&top=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kpis"]["high_risk_count"], 2);
    assert_eq!(body["top_risk"].as_array().unwrap().len(), 1);
    assert_eq!(body["top_risk"][0]["name"], "Wynyard Pizza Co");
}

#[tokio::test]
async fn malformed_top_is_a_json_bad_request() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir);
    let (status, body) = send(app(&path), Method::GET, "/api/dashboard?top=lots").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_requests_share_one_cached_dataset() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir);
    let app = app(&path);

    let (first, second) = tokio::join!(
        send(app.clone(), Method::GET, "/api/facets"),
        send(app.clone(), Method::GET, "/api/dashboard"),
    );
    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(second.0, StatusCode::OK);

    let (_, again) = send(app, Method::GET, "/api/facets").await;
    assert_eq!(first.1["loaded_at"], again["loaded_at"]);
}

#[tokio::test]
async fn empty_selection_yields_degenerate_report() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir);
    let (status, body) = send(app(&path), Method::GET, "/api/dashboard?segment=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kpis"]["restaurant_count"], 0);
    assert_eq!(body["kpis"]["total_orders"], 0);
    assert!(body["kpis"]["avg_order_value"].is_null());
    assert!(body["profit_gap"].is_null());
    assert_eq!(body["top_risk"], serde_json::json!([]));
}

#[tokio::test]
async fn unknown_view_is_a_bad_request() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir);
    let (status, body) = send(app(&path), Method::GET, "/api/dashboard?view=pie").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("pie"));
}

#[tokio::test]
async fn missing_source_is_reported_as_server_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.csv");
    let (status, body) = send(app(&path), Method::GET, "/api/facets").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn reload_picks_up_rewritten_source() {
    let dir = TempDir::new().unwrap();
    let path = write_dataset(&dir);
    let app = app(&path);

    let (_, before) = send(app.clone(), Method::GET, "/api/facets").await;
    assert_eq!(before["row_count"], 4);

    let mut body = REQUIRED_COLUMNS.join(",");
    body.push('\n');
    body.push_str(ROWS[0]);
    std::fs::write(&path, body).unwrap();

    let (status, after) = send(app, Method::POST, "/api/reload").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["row_count"], 1);
    assert_eq!(after["subregions"], serde_json::json!(["Viaduct"]));
}

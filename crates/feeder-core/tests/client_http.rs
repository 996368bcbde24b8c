//! DeviceClient against an in-process HTTP server.

#![cfg(feature = "http-client")]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use serde_json::{Value, json};

use feeder_core::{DeviceClient, Error, FeedSize, FeedType, FeederApi};

type Bodies = Arc<Mutex<Vec<(String, Value)>>>;

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn recording_router(bodies: Bodies) -> Router {
    fn record(path: &str, bodies: &Bodies, body: String) -> &'static str {
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body).unwrap()
        };
        bodies.lock().unwrap().push((path.to_string(), value));
        "Success"
    }

    Router::new()
        .route(
            "/api/manualFeed",
            post(|State(b): State<Bodies>, body: String| async move {
                record("/api/manualFeed", &b, body)
            }),
        )
        .route(
            "/api/addFeedTime",
            post(|State(b): State<Bodies>, body: String| async move {
                record("/api/addFeedTime", &b, body)
            }),
        )
        .route(
            "/api/deleteFeedTime",
            post(|State(b): State<Bodies>, body: String| async move {
                record("/api/deleteFeedTime", &b, body)
            }),
        )
        .route(
            "/api/toggleCamera",
            post(|State(b): State<Bodies>, body: String| async move {
                record("/api/toggleCamera", &b, body)
            }),
        )
        .with_state(bodies)
}

fn json_route(path: &str, body: Value) -> Router {
    Router::new().route(
        path,
        get(move || {
            let body = body.clone();
            async move { axum::Json(body) }
        }),
    )
}

#[tokio::test]
async fn test_get_reading_number_and_string() {
    let url = spawn_server(json_route("/api/getDistance", json!({"distance": 64}))).await;
    let client = DeviceClient::new(&url).unwrap();
    assert_eq!(client.get_reading().await.unwrap().percent, 64);

    let url = spawn_server(json_route("/api/getDistance", json!({"distance": "12.6"}))).await;
    let client = DeviceClient::new(&url).unwrap();
    assert_eq!(client.get_reading().await.unwrap().percent, 13);
}

#[tokio::test]
async fn test_get_reading_sensor_unavailable() {
    let url = spawn_server(json_route(
        "/api/getDistance",
        json!({"distance": "Sensor not available"}),
    ))
    .await;
    let client = DeviceClient::new(&url).unwrap();
    let err = client.get_reading().await.unwrap_err();
    assert!(matches!(err, Error::SensorUnavailable(_)));
}

#[tokio::test]
async fn test_get_last_feed_empty() {
    let url = spawn_server(json_route("/api/getLastFeed", json!({"last_feed": []}))).await;
    let client = DeviceClient::new(&url).unwrap();
    assert_eq!(client.get_last_feed().await.unwrap(), None);
}

#[tokio::test]
async fn test_get_last_feed_with_date() {
    let body = json!({"last_feed": ["08:00", "2024-01-02"]});
    let url = spawn_server(json_route("/api/getLastFeed", body)).await;
    let client = DeviceClient::new(&url).unwrap();
    let entry = client.get_last_feed().await.unwrap().unwrap();
    assert_eq!(entry.time, "08:00");
    assert_eq!(entry.feed_type(), None);
}

#[tokio::test]
async fn test_get_feed_times_and_logs() {
    let router = json_route(
        "/api/getFeedTimes",
        json!({"feed_times": [["07:00", 0, 2], ["14:30", 1, 3]]}),
    )
    .merge(json_route(
        "/api/getFeedingTimes",
        json!({"feeding_times": [["2024-01-01", "08:00", 0, 2]]}),
    ));
    let url = spawn_server(router).await;
    let client = DeviceClient::new(&url).unwrap();

    let times = client.get_feed_times().await.unwrap();
    assert_eq!(times.len(), 2);
    assert_eq!(times[1].feed_type(), Some(FeedType::OneTime));

    let logs = client.get_feed_logs().await.unwrap();
    assert_eq!(logs[0].date, "2024-01-01");
}

#[tokio::test]
async fn test_mutation_bodies() {
    let bodies: Bodies = Arc::new(Mutex::new(Vec::new()));
    let url = spawn_server(recording_router(bodies.clone())).await;
    let client = DeviceClient::new(&url).unwrap();

    client.manual_feed(FeedSize::XLarge).await.unwrap();
    client
        .add_feed_time("8:05", FeedType::OneTime, FeedSize::Average)
        .await
        .unwrap();
    client.delete_feed_time("08:05").await.unwrap();
    client.toggle_camera().await.unwrap();

    let bodies = bodies.lock().unwrap().clone();
    assert_eq!(
        bodies,
        vec![
            ("/api/manualFeed".to_string(), json!({"size": 5})),
            (
                "/api/addFeedTime".to_string(),
                json!({"time": "08:05", "type": 1, "size": 3})
            ),
            ("/api/deleteFeedTime".to_string(), json!({"time": "08:05"})),
            ("/api/toggleCamera".to_string(), Value::Null),
        ]
    );
}

#[tokio::test]
async fn test_server_error_carries_status_text_and_body() {
    let router = Router::new().route(
        "/api/manualFeed",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Motor not configured or not found",
            )
        }),
    );
    let url = spawn_server(router).await;
    let client = DeviceClient::new(&url).unwrap();

    let err = client.manual_feed(FeedSize::Small).await.unwrap_err();
    assert_eq!(
        err,
        Error::Server {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            detail: Some("Motor not configured or not found".to_string()),
        }
    );
}

#[tokio::test]
async fn test_missing_endpoint_is_server_error() {
    let url = spawn_server(Router::new()).await;
    let client = DeviceClient::new(&url).unwrap();
    let err = client.get_feed_times().await.unwrap_err();
    assert!(matches!(err, Error::Server { status: 404, .. }));
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let router = Router::new().route("/api/getDistance", get(|| async { "sixty" }));
    let url = spawn_server(router).await;
    let client = DeviceClient::new(&url).unwrap();
    let err = client.get_reading().await.unwrap_err();
    assert!(matches!(err, Error::MalformedResponse { .. }));
}

#[tokio::test]
async fn test_unreachable_device_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = DeviceClient::new(&format!("http://{}", addr)).unwrap();
    let err = client.get_reading().await.unwrap_err();
    assert!(matches!(err, Error::Network { .. }));
}

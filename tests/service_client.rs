use std::collections::HashMap;

use axum::extract::{Json, Path, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{Value, json};

use webdl::common::api::client::{ClientConfig, JobService, ServiceClient};
use webdl::common::api::error::ApiError;
use webdl::common::api::models::{DownloadRequest, TaskStatus};

async fn download(Json(body): Json<Value>) -> Response {
    let url = body["url"].as_str().unwrap_or("").trim().to_string();
    if url.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Missing url"}))).into_response();
    }
    let task_id = if body["audio_only"] == json!(true) {
        "audio-task"
    } else {
        "abc123"
    };
    Json(json!({ "task_id": task_id })).into_response()
}

async fn task_status(Path(task_id): Path<String>) -> Response {
    match task_id.as_str() {
        "abc123" => Json(json!({
            "id": "abc123",
            "status": "running",
            "urls": ["https://example.com/v"],
            "created_at": "2024-05-01T10:00:00Z",
            "progress": [],
            "last_progress": {
                "status": "downloading",
                "downloaded_bytes": 2048,
                "total_bytes": 8192.4,
                "speed": 1536.0,
                "eta": null,
                "fragment_index": null,
                "filename": "/srv/dl/Title-abc.f137.mp4"
            },
            "files": ["Title-abc.mp4"],
            "log": [{"ts": "2024-05-01T10:00:01Z", "level": "INFO", "msg": "[youtube] abc: Downloading webpage"}],
            "error": null
        }))
        .into_response(),
        "garbled" => (StatusCode::OK, "<html>oops</html>").into_response(),
        "weird" => Json(json!({"status": "paused", "files": [], "log": []})).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({"error": "unknown task"}))).into_response(),
    }
}

async fn list_downloads(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let limit = query.get("limit").cloned().unwrap_or_default();
    Json(json!({
        "files": [
            {"name": "Title-abc.mp4", "size": 1024, "mtime": "2024-05-01T10:05:00Z"},
            {"name": format!("limit-{}", limit)}
        ]
    }))
}

async fn open_downloads() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"ok": false, "error": "xdg-open not found"})),
    )
        .into_response()
}

async fn reveal(Path(filename): Path<String>) -> Response {
    if filename == "My Clip.mp4" {
        Json(json!({"ok": true})).into_response()
    } else {
        (StatusCode::FORBIDDEN, "<h1>Forbidden</h1>").into_response()
    }
}

// 在随机端口上启动假后端，返回服务地址
async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/api/download", post(download))
        .route("/api/status/{task_id}", get(task_status))
        .route("/api/list_downloads", get(list_downloads))
        .route("/api/open_downloads", post(open_downloads))
        .route("/api/reveal/{*filename}", post(reveal));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/", addr)
}

fn client_for(base: &str) -> ServiceClient {
    let mut config = ClientConfig::parse(base).unwrap();
    config.list_limit = 25;
    ServiceClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_create_task() {
    let client = client_for(&spawn_backend().await);

    let request = DownloadRequest {
        url: "https://example.com/v".to_string(),
        ..DownloadRequest::default()
    };
    assert_eq!(client.create_task(&request).await.unwrap(), "abc123");

    let audio = DownloadRequest {
        audio_only: true,
        ..request
    };
    assert_eq!(client.create_task(&audio).await.unwrap(), "audio-task");
}

#[tokio::test]
async fn test_create_task_rejected() {
    let client = client_for(&spawn_backend().await);

    let err = client
        .create_task(&DownloadRequest::default())
        .await
        .unwrap_err();
    match err {
        ApiError::Rejected { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Missing url");
        }
        other => panic!("期望 Rejected，实际: {:?}", other),
    }
}

#[tokio::test]
async fn test_task_status() {
    let client = client_for(&spawn_backend().await);

    let response = client.task_status("abc123").await.unwrap();
    assert_eq!(response.status, TaskStatus::Running);
    assert_eq!(response.files, vec!["Title-abc.mp4".to_string()]);
    assert_eq!(response.log.len(), 1);
    assert_eq!(
        response.log[0].to_string(),
        "[2024-05-01T10:00:01Z] INFO: [youtube] abc: Downloading webpage"
    );
    assert_eq!(response.created_at.as_deref(), Some("2024-05-01T10:00:00Z"));

    let snapshot = response.last_progress.unwrap();
    assert_eq!(snapshot.downloaded_bytes, Some(2048));
    assert_eq!(snapshot.total_bytes, Some(8192));
    assert_eq!(snapshot.eta, None);
}

#[tokio::test]
async fn test_task_status_failures() {
    let client = client_for(&spawn_backend().await);

    assert!(matches!(
        client.task_status("missing").await,
        Err(ApiError::Rejected { status: 404, .. })
    ));
    assert!(matches!(
        client.task_status("garbled").await,
        Err(ApiError::InvalidResponse(_))
    ));
    // 未知的状态值同样视为响应格式错误
    assert!(matches!(
        client.task_status("weird").await,
        Err(ApiError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_list_downloads_passes_limit() {
    let client = client_for(&spawn_backend().await);

    let files = client.list_downloads().await.unwrap();
    let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Title-abc.mp4", "limit-25"]);
    assert_eq!(files[0].size, Some(1024));
    assert_eq!(files[1].size, None);
}

#[tokio::test]
async fn test_open_and_reveal() {
    let client = client_for(&spawn_backend().await);

    match client.open_downloads().await {
        Err(ApiError::Rejected { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "xdg-open not found");
        }
        other => panic!("期望 Rejected，实际: {:?}", other),
    }

    client.reveal("My Clip.mp4").await.unwrap();
    // 非 JSON 的错误页使用状态码的原因短语
    match client.reveal("../etc/passwd").await {
        Err(ApiError::Rejected { status, message }) => {
            assert_eq!(status, 403);
            assert_eq!(message, "Forbidden");
        }
        other => panic!("期望 Rejected，实际: {:?}", other),
    }
}

#[tokio::test]
async fn test_file_url_is_encoded() {
    let client = client_for("http://127.0.0.1:8080");
    assert_eq!(
        client.file_url("My Clip #1.mp4"),
        "http://127.0.0.1:8080/files/My%20Clip%20%231.mp4"
    );
    assert_eq!(client.base_url(), "http://127.0.0.1:8080");
}

#[tokio::test]
async fn test_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(&format!("http://{}", addr));
    assert!(matches!(
        client.task_status("abc123").await,
        Err(ApiError::Transport(_))
    ));
}

#[test]
fn test_invalid_server_address() {
    assert!(matches!(
        ClientConfig::parse("not a url"),
        Err(ApiError::InvalidBaseUrl(_))
    ));
}

//! HTTP backend integration tests
//!
//! Runs the reqwest backend against an in-process axum server standing in for
//! the timetable server, bound to an ephemeral port.

use axum::extract::{Form, Multipart, Path, Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use ttgen_client::{BatchUploader, HttpBackend, TimetableBackend, UploadFile};
use ttgen_common::api::DurationConstants;
use ttgen_common::{Error, UploadCategory};

#[derive(Debug, Clone, PartialEq)]
struct Received {
    path: String,
    field: String,
    file_name: String,
    contents: Vec<u8>,
}

#[derive(Clone, Default)]
struct ServerState {
    received: Arc<Mutex<Vec<Received>>>,
    saved: Arc<Mutex<Vec<Value>>>,
    generate_form: Arc<Mutex<Option<HashMap<String, String>>>>,
}

impl ServerState {
    fn received(&self) -> Vec<Received> {
        let mut received = self.received.lock().unwrap().clone();
        received.sort_by(|a, b| a.path.cmp(&b.path));
        received
    }
}

/// Accepts every multipart upload; names containing "bad" are rejected
async fn upload(State(state): State<ServerState>, uri: Uri, mut multipart: Multipart) -> Json<Value> {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let field_name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().unwrap_or_default().to_string();
        let contents = field.bytes().await.unwrap().to_vec();

        if file_name.contains("bad") {
            return Json(json!({"success": false, "error": "Invalid room file format"}));
        }
        state.received.lock().unwrap().push(Received {
            path: uri.path().to_string(),
            field: field_name,
            file_name,
            contents,
        });
    }
    Json(json!({"success": true}))
}

async fn listing(Query(query): Query<HashMap<String, String>>) -> Response {
    if query.get("fetch_courses").map(String::as_str) != Some("true") {
        return (StatusCode::OK, "<html>index</html>").into_response();
    }
    Json(json!({
        "courses": [
            {"Department": "CSE", "Semester": 3, "Course Code": "CS301",
             "Course Name": "Operating Systems", "Faculty": "Dr. Rao",
             "L": 3, "T": 1, "P": 0, "Classroom": "L101"},
            {"Department": "ECE", "Semester": 5, "Course Code": "EC501",
             "Course Name": "VLSI", "Faculty": "Dr. Iyer",
             "L": 3, "T": 0, "P": 2, "Classroom": null}
        ],
        "departments": ["CSE", "ECE"],
        "semesters": [3, 5]
    }))
    .into_response()
}

async fn save_config(State(state): State<ServerState>, Json(body): Json<Value>) -> Json<Value> {
    let valid = body.get("duration_constants").is_some();
    state.saved.lock().unwrap().push(body);
    Json(json!({"success": valid}))
}

async fn generate(
    State(state): State<ServerState>,
    Form(form): Form<HashMap<String, String>>,
) -> impl IntoResponse {
    *state.generate_form.lock().unwrap() = Some(form);
    ([(header::CONTENT_TYPE, "application/zip")], b"PK\x03\x04zip".to_vec())
}

async fn faculty_timetable(Path(name): Path<String>) -> impl IntoResponse {
    (
        [(
            header::CONTENT_TYPE,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        )],
        format!("workbook for {}", name).into_bytes(),
    )
}

fn app(state: ServerState) -> Router {
    let mut router = Router::new();
    for category in UploadCategory::all() {
        router = router.route(category.endpoint(), post(upload));
    }
    router
        .route("/upload-dept-timetables", post(upload))
        .route("/", get(listing))
        .route("/save-config", post(save_config))
        .route("/generate", post(generate))
        .route("/generate-faculty-timetable/:name", get(faculty_timetable))
        .with_state(state)
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn backend() -> (HttpBackend, ServerState) {
    let state = ServerState::default();
    let url = spawn(app(state.clone())).await;
    (HttpBackend::new(&url, Duration::from_secs(5)).unwrap(), state)
}

fn csv(name: &str, contents: &str) -> UploadFile {
    UploadFile::new(name, contents)
}

#[tokio::test]
async fn test_bulk_upload_routes_each_file() {
    let (backend, state) = backend().await;
    let uploader = BatchUploader::new(Arc::new(backend));

    uploader
        .upload_all(&[
            csv("rooms.csv", "Room,Capacity\n"),
            csv("updated_batches.csv", "Department,Semester\n"),
            csv("combined.csv", "Department,Semester,Course Code\n"),
        ])
        .await
        .unwrap();

    let received = state.received();
    assert_eq!(received.len(), 3);
    assert_eq!(received[0].path, "/upload");
    assert_eq!(received[0].file_name, "combined.csv");
    assert_eq!(received[1].path, "/upload-batches");
    assert_eq!(received[2].path, "/upload-rooms");
    assert_eq!(received[2].contents, b"Room,Capacity\n");
    assert!(received.iter().all(|r| r.field == "file"));
}

#[tokio::test]
async fn test_server_rejection_carries_reason() {
    let (backend, _state) = backend().await;
    let result = backend
        .upload(UploadCategory::Room, &csv("bad_rooms.csv", "x"))
        .await;
    match result {
        Err(Error::UploadRejected(reason)) => assert_eq!(reason, "Invalid room file format"),
        other => panic!("expected UploadRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let router = Router::new().route(
        "/upload-rooms",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
    );
    let url = spawn(router).await;
    let backend = HttpBackend::new(&url, Duration::from_secs(5)).unwrap();

    let result = backend
        .upload(UploadCategory::Room, &csv("rooms.csv", "x"))
        .await;
    match result {
        Err(Error::UploadRejected(reason)) => {
            assert!(reason.contains("Malformed response from /upload-rooms (HTTP 500)"))
        }
        other => panic!("expected UploadRejected, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = HttpBackend::new(&format!("http://{}", addr), Duration::from_secs(2)).unwrap();
    let result = backend
        .upload(UploadCategory::Batch, &csv("batches.csv", "x"))
        .await;
    assert!(matches!(result, Err(Error::Network(_))));
}

#[tokio::test]
async fn test_request_timeout() {
    let router = Router::new().route(
        "/upload-rooms",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({"success": true}))
        }),
    );
    let url = spawn(router).await;
    let backend = HttpBackend::new(&url, Duration::from_millis(100)).unwrap();

    let result = backend
        .upload(UploadCategory::Room, &csv("rooms.csv", "x"))
        .await;
    assert!(matches!(result, Err(Error::Timeout(d)) if d == Duration::from_millis(100)));
}

#[tokio::test]
async fn test_fetch_courses_decodes_listing() {
    let (backend, _state) = backend().await;
    let listing = backend.fetch_courses().await.unwrap();

    assert_eq!(listing.courses.len(), 2);
    assert_eq!(listing.courses[0].code, "CS301");
    assert_eq!(listing.courses[0].semester, "3");
    assert_eq!(listing.courses[1].classroom, "");
    assert_eq!(listing.departments, vec!["CSE", "ECE"]);
    assert_eq!(listing.semesters, vec!["3", "5"]);
}

#[tokio::test]
async fn test_save_config_then_generate() {
    let (backend, state) = backend().await;
    let durations = DurationConstants {
        lab_duration: 6,
        ..Default::default()
    };

    backend.save_config(&durations).await.unwrap();
    let archive = backend.generate(&durations).await.unwrap();
    assert_eq!(archive, b"PK\x03\x04zip");

    let saved = state.saved.lock().unwrap().clone();
    assert_eq!(saved[0]["duration_constants"]["lab_duration"], 6);
    assert_eq!(saved[0]["duration_constants"]["hour_slots"], 2);

    let form = state.generate_form.lock().unwrap().clone().unwrap();
    assert_eq!(form.get("lab_duration").map(String::as_str), Some("6"));
    assert_eq!(form.get("lecture_duration").map(String::as_str), Some("3"));
}

#[tokio::test]
async fn test_save_config_failure_is_config_save_error() {
    let router = Router::new().route(
        "/save-config",
        post(|| async { Json(json!({"success": false})) }),
    );
    let url = spawn(router).await;
    let backend = HttpBackend::new(&url, Duration::from_secs(5)).unwrap();

    let result = backend.save_config(&DurationConstants::default()).await;
    assert!(matches!(result, Err(Error::ConfigSave(_))));
}

#[tokio::test]
async fn test_generate_redirect_page_is_rejected() {
    let router = Router::new().route(
        "/generate",
        post(|| async { ([(header::CONTENT_TYPE, "text/html")], "<html>No file uploaded</html>") }),
    );
    let url = spawn(router).await;
    let backend = HttpBackend::new(&url, Duration::from_secs(5)).unwrap();

    let result = backend.generate(&DurationConstants::default()).await;
    assert!(matches!(result, Err(Error::UploadRejected(_))));
}

#[tokio::test]
async fn test_department_timetables_send_only_xlsx() {
    let (backend, state) = backend().await;
    let sent = backend
        .upload_department_timetables(&[
            UploadFile::new("CSE_timetable.xlsx", "xlsx-1"),
            UploadFile::new("readme.txt", "ignored"),
            UploadFile::new("ECE_timetable.xlsx", "xlsx-2"),
        ])
        .await
        .unwrap();
    assert_eq!(sent, 2);

    let received = state.received();
    assert_eq!(received.len(), 2);
    assert!(received
        .iter()
        .all(|r| r.path == "/upload-dept-timetables" && r.field == "files[]"));
}

#[tokio::test]
async fn test_faculty_timetable_name_is_path_encoded() {
    let (backend, _state) = backend().await;
    let workbook = backend.faculty_timetable(" Dr. A Rao ").await.unwrap();
    assert_eq!(workbook, b"workbook for Dr. A Rao");
}

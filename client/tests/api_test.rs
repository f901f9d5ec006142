//! Integration tests for the HTTP record store.
//!
//! Each test starts an in-process mock of the club backend on an ephemeral
//! port and talks to it through `ApiStore`.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use swimtime_client::api::ApiStore;
use swimtime_client::session::Session;
use swimtime_client::AppError;
use swimtime_engine::{
    import_document, parse_instant, Distance, Error, MemoryStore, RecordStore, Style, Swimmer,
    TimeRecord, TimeSubmission,
};

const TOKEN: &str = "test-token";

// ========== Mock backend ==========

struct Mock {
    store: MemoryStore,
    users: serde_json::Value,
}

type Shared = Arc<Mock>;

/// Create/update body exactly as the club backend reads it.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BackendSubmission {
    swimmer_id: String,
    distance: u32,
    style: Style,
    time_seconds: f64,
    date: String,
    competition: Option<String>,
    oficial: bool,
}

impl BackendSubmission {
    fn into_submission(self) -> Result<TimeSubmission, Error> {
        let mut submission = TimeSubmission::new(
            self.swimmer_id,
            Distance::try_from(self.distance)?,
            self.style,
            self.time_seconds,
            parse_instant(&self.date)?,
        )
        .with_official(self.oficial);
        submission.competition = self.competition;
        Ok(submission)
    }
}

/// A stored record in the backend's snake_case row shape.
fn backend_row(record: &TimeRecord) -> serde_json::Value {
    json!({
        "id": record.id,
        "swimmer_id": record.swimmer_id,
        "distance": record.distance.meters(),
        "style": record.style,
        "time_seconds": record.time_seconds,
        "date": record.date,
        "competition": record.competition,
        "oficial": record.is_official,
        "minima_eh": record.meets_standard_a,
        "minima_bizkaia": record.meets_standard_b,
    })
}

fn detail(status: StatusCode, message: impl std::fmt::Display) -> Response {
    (status, Json(json!({ "detail": message.to_string() }))).into_response()
}

fn authorize(headers: &HeaderMap) -> Result<(), Response> {
    let expected = format!("Bearer {TOKEN}");
    match headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(detail(StatusCode::UNAUTHORIZED, "missing bearer token")),
    }
}

fn store_error(err: Error) -> Response {
    match err {
        Error::RecordNotFound(_) => detail(StatusCode::NOT_FOUND, err),
        _ => detail(StatusCode::UNPROCESSABLE_ENTITY, err),
    }
}

async fn list_times(State(mock): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    let rows: Vec<_> = mock.store.records().iter().map(backend_row).collect();
    Json(rows).into_response()
}

async fn create_time(
    State(mock): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<BackendSubmission>,
) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    match body
        .into_submission()
        .and_then(|submission| mock.store.insert(submission))
    {
        Ok(record) => (StatusCode::CREATED, Json(backend_row(&record))).into_response(),
        Err(e) => store_error(e),
    }
}

async fn update_time(
    State(mock): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<BackendSubmission>,
) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    match body
        .into_submission()
        .and_then(|submission| mock.store.replace(&id, submission))
    {
        Ok(record) => Json(backend_row(&record)).into_response(),
        Err(e) => store_error(e),
    }
}

async fn delete_time(
    State(mock): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    match mock.store.remove(&id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => store_error(e),
    }
}

async fn list_users(State(mock): State<Shared>, headers: HeaderMap) -> Response {
    if let Err(rejection) = authorize(&headers) {
        return rejection;
    }
    Json(mock.users.clone()).into_response()
}

/// Start the mock backend and return its base URL.
async fn spawn_backend() -> String {
    let mock = Mock {
        store: MemoryStore::with_swimmers([
            Swimmer::new("s1", "Ane"),
            Swimmer::new("s2", "Mikel"),
        ]),
        users: json!([
            {"id": "s1", "name": "Ane", "role": "swimmer"},
            {"id": "s2", "name": "Mikel", "role": "swimmer"},
            {"id": "c1", "name": "Itziar", "role": "coach"}
        ]),
    };

    let app = Router::new()
        .route("/api/times", get(list_times).post(create_time))
        .route("/api/times/{id}", put(update_time).delete(delete_time))
        .route("/api/users", get(list_users))
        .with_state(Arc::new(mock));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

fn client(base_url: &str, session: Session) -> ApiStore {
    ApiStore::new(base_url, session, Duration::from_secs(5)).unwrap()
}

fn submission(swimmer_id: &str, time_seconds: f64) -> TimeSubmission {
    TimeSubmission::new(
        swimmer_id,
        Distance::M100,
        Style::Butterfly,
        time_seconds,
        parse_instant("2024-06-15").unwrap(),
    )
}

// ========== CRUD ==========

#[tokio::test]
async fn test_crud_round_trip() {
    let base = spawn_backend().await;
    let api = client(&base, Session::with_token(TOKEN));

    let created = api
        .create(submission("s1", 70.5).with_competition("Copa"))
        .await
        .unwrap();
    assert_eq!(created.id, "time_1");
    assert_eq!(created.competition.as_deref(), Some("Copa"));

    let listed = api.list().await.unwrap();
    assert_eq!(listed, vec![created.clone()]);

    let updated = api
        .update(&created.id, submission("s1", 69.9))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.time_seconds, 69.9);
    assert_eq!(updated.competition, None);

    api.delete(&created.id).await.unwrap();
    assert!(api.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_backend_only_reads_its_own_field_names() {
    let base = spawn_backend().await;

    let camel_case = serde_json::to_value(submission("s1", 70.5)).unwrap();
    assert!(camel_case.get("swimmerId").is_some());

    let response = reqwest::Client::new()
        .post(format!("{base}/api/times"))
        .bearer_auth(TOKEN)
        .json(&camel_case)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 422);

    // The same time sent through ApiStore is accepted
    let api = client(&base, Session::with_token(TOKEN));
    let created = api.create(submission("s1", 70.5)).await.unwrap();
    assert_eq!(created.swimmer_id, "s1");
    assert_eq!(created.distance, Distance::M100);
    assert!(created.is_official);
}

#[tokio::test]
async fn test_update_missing_record_is_not_found() {
    let base = spawn_backend().await;
    let api = client(&base, Session::with_token(TOKEN));

    let err = api
        .update("time_99", submission("s1", 60.0))
        .await
        .unwrap_err();
    match err {
        AppError::Api { status, detail } => {
            assert_eq!(status, 404);
            assert!(detail.contains("time_99"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ========== Session ==========

#[tokio::test]
async fn test_missing_token_is_rejected() {
    let base = spawn_backend().await;
    let api = client(&base, Session::anonymous());

    let err = api.list().await.unwrap_err();
    assert!(matches!(
        err,
        AppError::Api { status: 401, ref detail } if detail == "missing bearer token"
    ));
}

#[tokio::test]
async fn test_swimmers_exclude_other_roles() {
    let base = spawn_backend().await;
    let api = client(&base, Session::with_token(TOKEN));

    let swimmers = api.swimmers().await.unwrap();
    let ids: Vec<&str> = swimmers.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, vec!["s1", "s2"]);
}

// ========== Batch import ==========

#[tokio::test]
async fn test_import_over_http_tallies_failures() {
    let base = spawn_backend().await;
    let api = client(&base, Session::with_token(TOKEN));

    let document = r#"[
        {"swimmer_id": "s1", "distance": 50, "style": "Libre", "time_seconds": 29.1, "date": "2024-02-01"},
        {"swimmer_id": "s2", "distance": 50, "style": "Libre", "time_seconds": -3, "date": "2024-02-01"},
        {"swimmer_id": "s2", "distance": 200, "style": "Estilos", "time_seconds": 150.25, "date": "2024-02-03"}
    ]"#;

    let report = import_document(&api, document).await.unwrap();
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.failures[0].index, 1);

    let stored = api.list().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().any(|r| r.swimmer_id == "s1" && r.time_seconds == 29.1));
    assert!(stored.iter().any(|r| r.swimmer_id == "s2" && r.time_seconds == 150.25));
}

#[tokio::test]
async fn test_store_rejection_counts_as_failure() {
    let base = spawn_backend().await;
    let api = client(&base, Session::with_token(TOKEN));

    let document = r#"[
        {"swimmerId": "ghost", "distanceMeters": 100, "style": "Braza", "timeSeconds": 90.0, "date": "2024-02-01"},
        {"swimmerId": "s1", "distanceMeters": 100, "style": "Braza", "timeSeconds": 88.0, "date": "2024-02-01"}
    ]"#;

    let report = import_document(&api, document).await.unwrap();
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 1);
    assert!(report.failures[0].reason.contains("422"));
}

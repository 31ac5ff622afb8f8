use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use timetable_client::HttpSchedulingService;
use timetable_client::http::REQUEST_ID_HEADER;
use timetable_core::models::{Day, EntryId, Scope, SlotId, TimeSlot, TimetableEntry};
use timetable_core::{ScheduleError, SchedulingService, StaticCredentials};
use tokio::net::TcpListener;

const TOKEN: &str = "secret-token";

#[derive(Default)]
struct Recorded {
    hits: AtomicUsize,
    last_body: Mutex<Option<Value>>,
    last_request_id: Mutex<Option<String>>,
}

type Shared = Arc<Recorded>;

fn authorized(state: &Shared, headers: &HeaderMap) -> bool {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_request_id.lock().unwrap() = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some(format!("Bearer {}", TOKEN).as_str())
}

fn entry_json(id: &str, day: &str) -> Value {
    json!({
        "_id": id,
        "className": "10",
        "section": "A",
        "subjectName": "Physics",
        "teacherId": "t-1",
        "day": day,
        "startTime": "09:00",
        "endTime": "10:00",
        "roomNumber": "12"
    })
}

async fn list_slots(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if !authorized(&state, &headers) {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "jwt expired" }))).into_response();
    }
    Json(json!([
        { "_id": "a", "startTime": "10:00", "endTime": "11:00" },
        { "_id": "b", "startTime": "09:00", "endTime": "10:00", "label": "First" }
    ]))
    .into_response()
}

async fn update_slot(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    authorized(&state, &headers);
    *state.last_body.lock().unwrap() = Some(json!({ "id": id, "body": body.clone() }));
    Json(json!({ "data": body })).into_response()
}

async fn list_timetable(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    authorized(&state, &headers);
    let matches = query.get("className").map(String::as_str) == Some("10")
        && query.get("section").map(String::as_str) == Some("A");
    let data = if matches {
        vec![entry_json("e1", "MONDAY")]
    } else {
        vec![]
    };
    Json(json!({ "success": true, "data": data })).into_response()
}

async fn create_entry(State(state): State<Shared>, headers: HeaderMap) -> Response {
    authorized(&state, &headers);
    (
        StatusCode::CONFLICT,
        Json(json!({ "message": "Timetable entry already exists" })),
    )
        .into_response()
}

async fn update_entry(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    authorized(&state, &headers);
    let day = body["day"].as_str().unwrap_or_default().to_string();
    *state.last_body.lock().unwrap() = Some(body);
    Json(entry_json(&id, &day)).into_response()
}

async fn delete_entry(State(state): State<Shared>, headers: HeaderMap) -> StatusCode {
    authorized(&state, &headers);
    StatusCode::NO_CONTENT
}

async fn broken_teachers(State(state): State<Shared>, headers: HeaderMap) -> Response {
    authorized(&state, &headers);
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response()
}

async fn list_mixed_slots(State(state): State<Shared>, headers: HeaderMap) -> Response {
    authorized(&state, &headers);
    Json(json!([
        { "_id": "a", "startTime": "09:00", "endTime": "10:00" },
        { "_id": "b", "startTime": "11:00", "endTime": "10:30" },
        { "_id": "c", "startTime": "10:00", "endTime": "11:00" }
    ]))
    .into_response()
}

async fn list_mixed_timetable(State(state): State<Shared>, headers: HeaderMap) -> Response {
    authorized(&state, &headers);
    let mut bad_section = entry_json("e2", "tuesday");
    bad_section["section"] = json!("A-1");
    let mut bad_day = entry_json("e3", "someday");
    bad_day["section"] = json!("A");
    Json(json!({ "data": [entry_json("e1", "monday"), bad_section, bad_day] })).into_response()
}

async fn serve(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/", addr)
}

/// Server whose list endpoints mix valid and invalid records.
async fn spawn_mixed_server() -> String {
    let app = Router::new()
        .route("/api/time-slots", get(list_mixed_slots))
        .route("/api/timetable", get(list_mixed_timetable))
        .with_state(Shared::default());
    serve(app).await
}

async fn spawn_server() -> (String, Shared) {
    let state = Shared::default();
    let app = Router::new()
        .route("/api/time-slots", get(list_slots))
        .route("/api/time-slots/:id", put(update_slot))
        .route("/api/timetable", get(list_timetable).post(create_entry))
        .route("/api/timetable/:id", put(update_entry).delete(delete_entry))
        .route("/api/teachers/subjects", get(broken_teachers))
        .with_state(state.clone());

    (serve(app).await, state)
}

fn client(base_url: &str, token: Option<&str>) -> HttpSchedulingService {
    HttpSchedulingService::new(
        base_url,
        Duration::from_secs(5),
        Arc::new(StaticCredentials::new(token.map(str::to_string))),
    )
    .unwrap()
}

fn scope() -> Scope {
    Scope::new("10", "a").unwrap()
}

#[test_log::test(tokio::test)]
async fn test_fetch_time_slots_with_bearer_token() {
    let (url, state) = spawn_server().await;
    let service = client(&url, Some(TOKEN));

    let slots = service.time_slots().await.unwrap();

    let ids: Vec<_> = slots.iter().map(|slot| slot.id.as_str()).collect();
    assert_eq!(ids, vec!["10:00-11:00", "09:00-10:00"]);
    assert_eq!(slots[1].label, "9:00 AM - 10:00 AM");
    assert_eq!(state.hits.load(Ordering::SeqCst), 1);
    assert!(state.last_request_id.lock().unwrap().is_some());
}

#[tokio::test]
async fn test_timetable_unwraps_data_envelope() {
    let (url, _state) = spawn_server().await;
    let service = client(&url, Some(TOKEN));

    let entries = service.timetable(&scope()).await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, EntryId::from("e1"));
    assert_eq!(entries[0].day, Day::Monday);
    assert_eq!(entries[0].room_number.as_deref(), Some("12"));
}

#[tokio::test]
async fn test_invalid_slot_rows_are_skipped() {
    let url = spawn_mixed_server().await;
    let service = client(&url, Some(TOKEN));

    let slots = service.time_slots().await.unwrap();

    let ids: Vec<_> = slots.iter().map(|slot| slot.id.as_str()).collect();
    assert_eq!(ids, vec!["09:00-10:00", "10:00-11:00"]);
}

#[tokio::test]
async fn test_invalid_entry_rows_are_skipped() {
    let url = spawn_mixed_server().await;
    let service = client(&url, Some(TOKEN));

    let entries = service.timetable(&scope()).await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, EntryId::from("e1"));
}

#[tokio::test]
async fn test_remote_message_is_passed_through() {
    let (url, _state) = spawn_server().await;
    let service = client(&url, Some(TOKEN));
    let draft = TimetableEntry {
        id: EntryId::from("unused"),
        class_name: scope().class_name,
        section: scope().section,
        subject_name: "Physics".to_string(),
        teacher_id: "t-1".to_string(),
        day: Day::Monday,
        start_time: "09:00".parse().unwrap(),
        end_time: "10:00".parse().unwrap(),
        room_number: None,
    }
    .to_draft();

    let error = service.create_entry(&draft).await.unwrap_err();

    match error {
        ScheduleError::RemoteRejection { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "Timetable entry already exists");
        }
        other => panic!("expected remote rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_error_falls_back_to_generic_message() {
    let (url, _state) = spawn_server().await;
    let service = client(&url, Some(TOKEN));

    let error = service.teachers_with_subjects().await.unwrap_err();

    assert_eq!(error.user_message(), "Request failed with status 500");
}

#[tokio::test]
async fn test_update_sends_lower_case_day() {
    let (url, state) = spawn_server().await;
    let service = client(&url, Some(TOKEN));
    let mut draft = service.timetable(&scope()).await.unwrap()[0].to_draft();
    draft.day = "THURSDAY".parse().unwrap();

    let updated = service
        .update_entry(&EntryId::from("e1"), &draft)
        .await
        .unwrap();

    let body = state.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["day"], json!("thursday"));
    assert_eq!(body["className"], json!("10"));
    assert_eq!(updated.day, Day::Thursday);
}

#[tokio::test]
async fn test_slot_id_is_sent_as_path_segment() {
    let (url, state) = spawn_server().await;
    let service = client(&url, Some(TOKEN));
    let slot = TimeSlot::new("09:15".parse().unwrap(), "10:00".parse().unwrap()).unwrap();

    let updated = service
        .update_time_slot(&SlotId::from("09:00-10:00"), &slot)
        .await
        .unwrap();

    let recorded = state.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(recorded["id"], json!("09:00-10:00"));
    assert_eq!(recorded["body"]["startTime"], json!("09:15"));
    assert_eq!(updated.id, slot.id);
}

#[tokio::test]
async fn test_delete_accepts_empty_response() {
    let (url, _state) = spawn_server().await;
    let service = client(&url, Some(TOKEN));

    service.delete_entry(&EntryId::from("e1")).await.unwrap();
}

#[tokio::test]
async fn test_missing_token_fails_before_request() {
    let (url, state) = spawn_server().await;
    let service = client(&url, None);

    let error = service.time_slots().await.unwrap_err();

    assert!(matches!(error, ScheduleError::AuthMissing));
    assert_eq!(state.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rejected_token_reports_auth_missing() {
    let (url, _state) = spawn_server().await;
    let service = client(&url, Some("stale-token"));

    let error = service.time_slots().await.unwrap_err();

    assert!(matches!(error, ScheduleError::AuthMissing));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let service = client(&format!("http://{}", addr), Some(TOKEN));

    let error = service.time_slots().await.unwrap_err();

    assert!(matches!(error, ScheduleError::Transport(_)));
    assert!(error.is_retryable());
}

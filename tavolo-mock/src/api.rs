//! Mock reservation backend API
//!
//! Every handler answers with the `{ success, data?, message?, error? }`
//! envelope the real backend uses.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{
    ApiReservation, ApiResponse, ApiShiftPatch, DEFAULT_TIMES, PushTokenRegistration,
    RejectRequest, ReservationStatus, ReservationStats, ShiftStat,
};
use uuid::Uuid;

use crate::state::AppState;

type MockResponse = (StatusCode, Json<ApiResponse<Value>>);

fn payload(data: impl Serialize) -> Value {
    serde_json::to_value(data).expect("mock payload serializes")
}

fn ok(data: impl Serialize) -> MockResponse {
    (StatusCode::OK, Json(ApiResponse::ok(payload(data))))
}

fn ok_with_message(data: impl Serialize, message: &str) -> MockResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::ok_with_message(payload(data), message)),
    )
}

fn ok_message(message: &str) -> MockResponse {
    (StatusCode::OK, Json(ApiResponse::ok_message(message)))
}

fn not_found(error: &str) -> MockResponse {
    (StatusCode::NOT_FOUND, Json(ApiResponse::error(error)))
}

fn unavailable(error: &str) -> MockResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiResponse::error(error)),
    )
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reservations", get(list_reservations).post(create_reservation))
        .route(
            "/reservations/{id}",
            get(get_reservation)
                .put(update_reservation)
                .delete(delete_reservation),
        )
        .route("/reservations/{id}/accept", post(accept_reservation))
        .route("/reservations/{id}/reject", post(reject_reservation))
        .route("/shifts/times/available", get(available_times))
        .route("/shifts/{date}", get(get_shifts))
        .route("/shifts/{date}/initialize", post(initialize_shifts))
        .route("/shifts/{date}/stats", get(shift_stats))
        .route("/shifts/{date}/{time}", get(get_shift).put(update_shift))
        .route("/push-tokens", post(register_push_token))
        .route("/push-tokens/{device_id}", delete(unregister_push_token))
}

async fn health() -> MockResponse {
    ok_message("ok")
}

// ========== Reservations ==========

#[derive(Debug, Deserialize)]
struct ListQuery {
    date: Option<String>,
    status: Option<String>,
    limit: Option<usize>,
}

async fn list_reservations(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> MockResponse {
    if state.fail_reads.load(Ordering::SeqCst) {
        return unavailable("simulated backend outage");
    }

    let reservations = state.reservations.lock().unwrap();
    let mut rows: Vec<ApiReservation> = reservations
        .values()
        .filter(|r| query.date.as_ref().is_none_or(|date| &r.date == date))
        .filter(|r| {
            query
                .status
                .as_ref()
                .is_none_or(|status| r.status.as_str() == status)
        })
        .cloned()
        .collect();
    rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    if let Some(limit) = query.limit {
        rows.truncate(limit);
    }
    ok(rows)
}

async fn get_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> MockResponse {
    match state.reservations.lock().unwrap().get(&id) {
        Some(reservation) => ok(reservation),
        None => not_found("reservation not found"),
    }
}

async fn create_reservation(
    State(state): State<Arc<AppState>>,
    Json(mut reservation): Json<ApiReservation>,
) -> MockResponse {
    let now = Utc::now().to_rfc3339();
    reservation.id = Some(Uuid::new_v4().to_string());
    reservation.created_at = Some(now.clone());
    reservation.updated_at = Some(now);

    let mut reservations = state.reservations.lock().unwrap();
    reservations.insert(reservation.id.clone().unwrap(), reservation.clone());
    ok_with_message(reservation, "reservation created")
}

async fn update_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(updates): Json<ApiReservation>,
) -> MockResponse {
    let mut reservations = state.reservations.lock().unwrap();
    let Some(existing) = reservations.get_mut(&id) else {
        return not_found("reservation not found");
    };
    // Backend owns id and createdAt; everything else is last-write-wins
    existing.full_name = updates.full_name;
    existing.phone = updates.phone;
    existing.email = updates.email;
    existing.date = updates.date;
    existing.time = updates.time;
    existing.seats = updates.seats;
    existing.special_requests = updates.special_requests;
    existing.status = updates.status;
    existing.updated_at = Some(Utc::now().to_rfc3339());
    ok(existing.clone())
}

async fn delete_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> MockResponse {
    match state.reservations.lock().unwrap().remove(&id) {
        Some(_) => ok_message("reservation deleted"),
        None => not_found("reservation not found"),
    }
}

fn set_status(state: &AppState, id: &str, status: ReservationStatus) -> MockResponse {
    let mut reservations = state.reservations.lock().unwrap();
    let Some(existing) = reservations.get_mut(id) else {
        return not_found("reservation not found");
    };
    existing.status = status;
    existing.updated_at = Some(Utc::now().to_rfc3339());
    ok(existing.clone())
}

async fn accept_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> MockResponse {
    set_status(&state, &id, ReservationStatus::Accepted)
}

async fn reject_reservation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<RejectRequest>>,
) -> MockResponse {
    if let Some(Json(RejectRequest { reason: Some(reason) })) = body {
        tracing::debug!(%id, %reason, "reservation rejected with reason");
    }
    set_status(&state, &id, ReservationStatus::Rejected)
}

// ========== Shifts ==========

async fn get_shifts(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> MockResponse {
    ok(state.shifts_for_date(&date))
}

async fn get_shift(
    State(state): State<Arc<AppState>>,
    Path((date, time)): Path<(String, String)>,
) -> MockResponse {
    match state
        .shifts_for_date(&date)
        .into_iter()
        .find(|shift| shift.time == time)
    {
        Some(shift) => ok(shift),
        None => not_found("shift not found"),
    }
}

async fn update_shift(
    State(state): State<Arc<AppState>>,
    Path((date, time)): Path<(String, String)>,
    Json(patch): Json<ApiShiftPatch>,
) -> MockResponse {
    // Ensure the date's default set exists before patching
    state.shifts_for_date(&date);

    let mut shifts = state.shifts.lock().unwrap();
    let Some(shift) = shifts
        .get_mut(&date)
        .and_then(|set| set.iter_mut().find(|shift| shift.time == time))
    else {
        return not_found("shift not found");
    };
    if let Some(enabled) = patch.enabled {
        shift.enabled = enabled;
    }
    if let Some(max_reservations) = patch.max_reservations {
        shift.max_reservations = max_reservations;
    }
    ok(shift.clone())
}

async fn initialize_shifts(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> MockResponse {
    let mut shifts = state.shifts.lock().unwrap();
    if shifts.contains_key(&date) {
        return ok_message("shifts already initialized");
    }
    shifts.insert(date.clone(), crate::state::default_shifts(&date));
    ok_message("shifts initialized")
}

async fn shift_stats(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> MockResponse {
    let shifts = state.shifts_for_date(&date);
    let reservations = state.reservations.lock().unwrap();
    let for_date: Vec<&ApiReservation> =
        reservations.values().filter(|r| r.date == date).collect();

    let count = |status: ReservationStatus| -> u32 {
        for_date.iter().filter(|r| r.status == status).count() as u32
    };

    let shift_stats = shifts
        .iter()
        .map(|shift| {
            // Rejected reservations do not consume seats
            let booked: Vec<&&ApiReservation> = for_date
                .iter()
                .filter(|r| r.time == shift.time && r.status != ReservationStatus::Rejected)
                .collect();
            let seats = booked.iter().map(|r| r.seats).sum();
            ShiftStat {
                time: shift.time.clone(),
                reservations: booked.len() as u32,
                seats,
                available: shift.enabled && seats < shift.max_reservations,
            }
        })
        .collect();

    ok(ReservationStats {
        date: date.clone(),
        total_reservations: for_date.len() as u32,
        total_seats: for_date.iter().map(|r| r.seats).sum(),
        pending_reservations: count(ReservationStatus::Pending),
        accepted_reservations: count(ReservationStatus::Accepted),
        rejected_reservations: count(ReservationStatus::Rejected),
        shift_stats,
    })
}

async fn available_times() -> MockResponse {
    ok(DEFAULT_TIMES)
}

// ========== Push tokens ==========

async fn register_push_token(
    State(state): State<Arc<AppState>>,
    Json(registration): Json<PushTokenRegistration>,
) -> MockResponse {
    state
        .push_tokens
        .lock()
        .unwrap()
        .insert(registration.device_id.clone(), registration);
    ok_message("push token registered")
}

async fn unregister_push_token(
    State(state): State<Arc<AppState>>,
    Path(device_id): Path<String>,
) -> MockResponse {
    match state.push_tokens.lock().unwrap().remove(&device_id) {
        Some(_) => ok_message("push token unregistered"),
        None => not_found("push token not found"),
    }
}

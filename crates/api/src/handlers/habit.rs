//! Handlers for the `/habits` resource.
//!
//! Every handler is scoped to the authenticated owner. A habit owned by
//! someone else is reported as not found.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use habits_core::error::CoreError;
use habits_core::habit::{CreateHabit, HabitPatch, HabitRecord, UpdateHabit};
use habits_core::query;
use habits_core::types::DbId;
use habits_core::validation::{apply_update, validate_for_create, validate_for_update, verify_schedule};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::HabitListParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Habit", id })
}

/// Load one of the owner's habits or fail with 404.
async fn find_owned(state: &AppState, owner_id: DbId, id: DbId) -> AppResult<HabitRecord> {
    state
        .store
        .get(owner_id, id)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Merge `patch` into a loaded habit, re-check the schedule, and persist.
async fn save_patched(
    state: &AppState,
    existing: &HabitRecord,
    patch: &HabitPatch,
) -> AppResult<HabitRecord> {
    let merged = apply_update(existing, patch);
    verify_schedule(&merged).map_err(CoreError::from)?;

    state
        .store
        .update(merged)
        .await?
        .ok_or_else(|| not_found(existing.id))
}

/// POST /api/v1/habits
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateHabit>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<HabitRecord>>)> {
    let Json(input) = payload?;
    let today = chrono::Local::now().date_naive();
    let habit = validate_for_create(&input, today).map_err(CoreError::from)?;

    let record = state.store.create(auth.user_id, habit).await?;
    tracing::info!(owner_id = auth.user_id, habit_id = record.id, "Habit created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// GET /api/v1/habits
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<HabitListParams>,
) -> AppResult<Json<DataResponse<Vec<HabitRecord>>>> {
    let list_query = params.into_query()?;
    let records = state.store.list(auth.user_id).await?;
    let visible = query::list(&records, auth.user_id, &list_query);

    tracing::debug!(
        owner_id = auth.user_id,
        total = records.len(),
        returned = visible.len(),
        "Habits listed"
    );
    Ok(Json(DataResponse { data: visible }))
}

/// GET /api/v1/habits/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<HabitRecord>>> {
    let record = find_owned(&state, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: record }))
}

/// PUT / PATCH /api/v1/habits/{id}
///
/// Both methods take a partial payload; absent keys leave stored values alone.
/// The stored frequency decides which day list a payload without
/// `frequencyType` may touch.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    payload: Result<Json<UpdateHabit>, JsonRejection>,
) -> AppResult<Json<DataResponse<HabitRecord>>> {
    let Json(input) = payload?;
    let existing = find_owned(&state, auth.user_id, id).await?;
    let patch = validate_for_update(&input, existing.frequency_type).map_err(CoreError::from)?;

    let record = save_patched(&state, &existing, &patch).await?;
    tracing::info!(owner_id = auth.user_id, habit_id = id, "Habit updated");

    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/habits/{id}
///
/// Soft delete: the habit is marked inactive and stays listable with the
/// inactive filter.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = find_owned(&state, auth.user_id, id).await?;
    save_patched(&state, &existing, &HabitPatch::deactivate()).await?;
    tracing::info!(owner_id = auth.user_id, habit_id = id, "Habit deactivated");

    Ok(StatusCode::NO_CONTENT)
}

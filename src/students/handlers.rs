use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};

use crate::{
    auth::jwt::{AuthUser, ReadGate},
    error::ApiError,
    state::AppState,
};

use super::{
    dto::{StudentInput, StudentOut},
    repo,
};

fn validated_name(input: &StudentInput) -> Result<&str, ApiError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Name must not be empty".into()));
    }
    Ok(name)
}

#[instrument(skip(state, _gate))]
pub async fn list_students(
    State(state): State<AppState>,
    _gate: ReadGate,
) -> Result<Json<Vec<StudentOut>>, ApiError> {
    let students = repo::list_all(&state.db).await?;
    Ok(Json(students.into_iter().map(StudentOut::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_student(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Json(payload): Json<StudentInput>,
) -> Result<(StatusCode, Json<StudentOut>), ApiError> {
    let name = validated_name(&payload)?;
    let student = repo::insert(&state.db, name, payload.course_id).await?;
    info!(student_id = student.id, name = %student.name, "student created");
    Ok((StatusCode::CREATED, Json(student.into())))
}

#[instrument(skip(state, _gate))]
pub async fn get_student(
    State(state): State<AppState>,
    _gate: ReadGate,
    Path(id): Path<i64>,
) -> Result<Json<StudentOut>, ApiError> {
    let student = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;
    Ok(Json(student.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_student(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<StudentInput>,
) -> Result<Json<StudentOut>, ApiError> {
    let name = validated_name(&payload)?;
    let student = repo::update(&state.db, id, name, payload.course_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Student not found".into()))?;
    info!(student_id = student.id, name = %student.name, "student updated");
    Ok(Json(student.into()))
}

#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Student not found".into()));
    }
    info!(student_id = id, "student deleted");
    Ok(StatusCode::NO_CONTENT)
}

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
    students,
};

use super::{
    dto::{CourseDetails, CourseInput, CourseOut},
    repo,
};

fn validated_name(input: &CourseInput) -> Result<&str, ApiError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Name must not be empty".into()));
    }
    Ok(name)
}

#[instrument(skip(state, _gate))]
pub async fn list_courses(
    State(state): State<AppState>,
    _gate: ReadGate,
) -> Result<Json<Vec<CourseOut>>, ApiError> {
    let courses = repo::list_all(&state.db).await?;
    Ok(Json(courses.into_iter().map(CourseOut::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_course(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CourseInput>,
) -> Result<(StatusCode, Json<CourseOut>), ApiError> {
    let name = validated_name(&payload)?;
    let course = repo::insert(&state.db, name, Some(user_id)).await?;
    info!(course_id = course.id, name = %course.name, "course created");
    Ok((StatusCode::CREATED, Json(course.into())))
}

#[instrument(skip(state, _gate))]
pub async fn get_course(
    State(state): State<AppState>,
    _gate: ReadGate,
    Path(id): Path<i64>,
) -> Result<Json<CourseDetails>, ApiError> {
    let course = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".into()))?;
    let students = students::repo::list_by_course(&state.db, course.id).await?;

    Ok(Json(CourseDetails {
        id: course.id,
        name: course.name,
        students: students.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_course(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<CourseInput>,
) -> Result<Json<CourseOut>, ApiError> {
    let name = validated_name(&payload)?;
    let course = repo::update_name(&state.db, id, name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Course not found".into()))?;
    info!(course_id = course.id, name = %course.name, "course updated");
    Ok(Json(course.into()))
}

#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    AuthUser(_): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !repo::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Course not found".into()));
    }
    info!(course_id = id, "course deleted");
    Ok(StatusCode::NO_CONTENT)
}

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    AppState,
    error::{ApiError, ApiJson, ApiPath, PathId},
    models::{
        AssignSlotRequest, Class, CreateClassRequest, CreatedResponse, ErrorBody, MessageResponse,
    },
};

#[utoipa::path(get, path = "/", tag = "health")]
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Class Slots API",
        "endpoints": {
            "/api/classes": "List or create classes",
            "/api/classes/{id}": "Get or delete a class",
            "/api/classes/{id}/duplicate": "Copy a class with assignments cleared",
            "/api/classes/{classId}/slots/{slotId}": "Assign a time slot"
        }
    }))
}

#[utoipa::path(get, path = "/healthz/live", tag = "health")]
pub async fn healthz_live() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

#[utoipa::path(
    get,
    path = "/healthz/ready",
    responses(
        (status = 200, description = "Store reachable"),
        (status = 500, description = "Store unavailable", body = ErrorBody)
    ),
    tag = "health"
)]
pub async fn healthz_ready(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state
        .schedule
        .store()
        .ping()
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    Ok(Json(serde_json::json!({"status": "ok"})))
}

#[utoipa::path(
    get,
    path = "/api/classes",
    responses((status = 200, description = "All classes, newest first", body = [Class])),
    tag = "classes"
)]
pub async fn list_classes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let classes = state.schedule.list_classes().await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(("id" = i64, Path, description = "Class id")),
    responses(
        (status = 200, description = "The class", body = Class),
        (status = 404, description = "Class not found", body = ErrorBody)
    ),
    tag = "classes"
)]
pub async fn get_class(
    State(state): State<AppState>,
    ApiPath(PathId(id)): ApiPath<PathId>,
) -> Result<impl IntoResponse, ApiError> {
    let class = state.schedule.get_class(id).await?;
    Ok(Json(class))
}

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassRequest,
    responses((status = 201, description = "Class created", body = CreatedResponse)),
    tag = "classes"
)]
pub async fn create_class(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreateClassRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state
        .schedule
        .create_class(body.name, Some(body.date), body.time_slots)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "Class created successfully".into(),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/api/classes/{id}/duplicate",
    params(("id" = i64, Path, description = "Class to copy")),
    responses(
        (status = 201, description = "Class duplicated", body = CreatedResponse),
        (status = 404, description = "Class not found", body = ErrorBody)
    ),
    tag = "classes"
)]
pub async fn duplicate_class(
    State(state): State<AppState>,
    ApiPath(PathId(id)): ApiPath<PathId>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.schedule.duplicate_class(id).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "Class duplicated successfully".into(),
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(("id" = i64, Path, description = "Class id")),
    responses((status = 200, description = "Class deleted (or already absent)", body = MessageResponse)),
    tag = "classes"
)]
pub async fn delete_class(
    State(state): State<AppState>,
    ApiPath(PathId(id)): ApiPath<PathId>,
) -> Result<impl IntoResponse, ApiError> {
    state.schedule.delete_class(id).await?;
    Ok(Json(MessageResponse {
        message: "Class deleted successfully".into(),
    }))
}

#[utoipa::path(
    put,
    path = "/api/classes/{classId}/slots/{slotId}",
    params(
        ("classId" = i64, Path, description = "Class id"),
        ("slotId" = i64, Path, description = "Time slot id within the class")
    ),
    request_body = AssignSlotRequest,
    responses(
        (status = 200, description = "Slot assigned", body = MessageResponse),
        (status = 404, description = "Class or time slot not found", body = ErrorBody)
    ),
    tag = "classes"
)]
pub async fn assign_slot(
    State(state): State<AppState>,
    ApiPath((PathId(class_id), PathId(slot_id))): ApiPath<(PathId, PathId)>,
    ApiJson(body): ApiJson<AssignSlotRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .schedule
        .assign_slot(class_id, slot_id, body.assigned_to)
        .await?;
    Ok(Json(MessageResponse {
        message: "Slot assigned successfully".into(),
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".into())
}

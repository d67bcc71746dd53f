use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStudent;
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::result::{ResultResponse, StudentResultResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_my_results))
        .route("/:result_id", get(get_my_result))
}

async fn list_my_results(
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentResultResponse>>, ApiError> {
    let rows = repositories::results::list_by_student(state.db(), &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list results"))?;

    Ok(Json(rows.into_iter().map(StudentResultResponse::from_row).collect()))
}

async fn get_my_result(
    Path(result_id): Path<String>,
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<ResultResponse>, ApiError> {
    let result = repositories::results::find_by_id(state.db(), &result_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch result"))?
        .ok_or_else(|| ApiError::NotFound("Result not found".to_string()))?;

    if result.student_id != student.id {
        return Err(ApiError::NotFound("Result not found".to_string()));
    }

    Ok(Json(ResultResponse::from_db(result)))
}

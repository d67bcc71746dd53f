use axum::Router;

use crate::core::state::AppState;

pub(crate) mod exams;
pub(crate) mod questions;
pub(crate) mod students;
pub(crate) mod subjects;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .nest("/students", students::router())
        .nest("/subjects", subjects::router())
        .nest("/questions", questions::router())
        .nest("/exams", exams::router())
}

use std::collections::HashMap;

use sqlx::types::Json;
use sqlx::{FromRow, SqlitePool};
use time::PrimitiveDateTime;

use crate::db::models::ExamResult;
use crate::db::types::{AnswerOption, AttemptStatus};

const COLUMNS: &str = "\
    id, exam_id, student_id, question_ids, answers, status, started_at, expires_at, \
    submitted_at, score, total_marks, percentage, created_at, updated_at";

pub(crate) async fn find_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<ExamResult>, sqlx::Error> {
    sqlx::query_as::<_, ExamResult>(&format!("SELECT {COLUMNS} FROM results WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_exam_and_student(
    pool: &SqlitePool,
    exam_id: &str,
    student_id: &str,
) -> Result<Option<ExamResult>, sqlx::Error> {
    sqlx::query_as::<_, ExamResult>(&format!(
        "SELECT {COLUMNS} FROM results WHERE exam_id = ? AND student_id = ?"
    ))
    .bind(exam_id)
    .bind(student_id)
    .fetch_optional(pool)
    .await
}

pub(crate) struct CreateResult<'a> {
    pub(crate) id: &'a str,
    pub(crate) exam_id: &'a str,
    pub(crate) student_id: &'a str,
    pub(crate) question_ids: Vec<String>,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) expires_at: PrimitiveDateTime,
    pub(crate) total_marks: i32,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

/// Inserts the attempt row. The UNIQUE (exam_id, student_id) index makes a
/// second concurrent start fail with a unique violation, which callers map
/// to the duplicate-attempt error.
pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateResult<'_>,
) -> Result<ExamResult, sqlx::Error> {
    sqlx::query_as::<_, ExamResult>(&format!(
        "INSERT INTO results (
            id, exam_id, student_id, question_ids, answers, status, started_at, expires_at,
            submitted_at, score, total_marks, percentage, created_at, updated_at
        ) VALUES (?,?,?,?,?,?,?,?,NULL,0,?,0,?,?)
        RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.exam_id)
    .bind(params.student_id)
    .bind(Json(params.question_ids))
    .bind(Json(HashMap::<String, AnswerOption>::new()))
    .bind(AttemptStatus::Started)
    .bind(params.started_at)
    .bind(params.expires_at)
    .bind(params.total_marks)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct SubmitResult {
    pub(crate) answers: HashMap<String, AnswerOption>,
    pub(crate) score: i32,
    pub(crate) percentage: i32,
    pub(crate) submitted_at: PrimitiveDateTime,
}

/// Finalizes an attempt. The status guard makes a repeated submit a no-op,
/// reported back as `false`.
pub(crate) async fn submit(
    pool: &SqlitePool,
    id: &str,
    params: SubmitResult,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE results SET
            answers = ?,
            status = ?,
            submitted_at = ?,
            score = ?,
            percentage = ?,
            updated_at = ?
         WHERE id = ? AND status = ?",
    )
    .bind(Json(params.answers))
    .bind(AttemptStatus::Submitted)
    .bind(params.submitted_at)
    .bind(params.score)
    .bind(params.percentage)
    .bind(params.submitted_at)
    .bind(id)
    .bind(AttemptStatus::Started)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// An attempt joined with the exam it belongs to, for the student's own
/// results listing.
#[derive(Debug, FromRow)]
pub(crate) struct StudentResultRow {
    pub(crate) id: String,
    pub(crate) exam_id: String,
    pub(crate) exam_title: String,
    pub(crate) subject_name: String,
    pub(crate) status: AttemptStatus,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) submitted_at: Option<PrimitiveDateTime>,
    pub(crate) score: i32,
    pub(crate) total_marks: i32,
    pub(crate) percentage: i32,
}

pub(crate) async fn list_by_student(
    pool: &SqlitePool,
    student_id: &str,
) -> Result<Vec<StudentResultRow>, sqlx::Error> {
    sqlx::query_as::<_, StudentResultRow>(
        "SELECT r.id, r.exam_id, e.title AS exam_title, s.name AS subject_name,
                r.status, r.started_at, r.submitted_at, r.score, r.total_marks, r.percentage
         FROM results r
         JOIN exams e ON e.id = r.exam_id
         JOIN subjects s ON s.id = e.subject_id
         WHERE r.student_id = ?
         ORDER BY r.started_at DESC",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// An attempt joined with the student who made it, for the admin's
/// per-exam review.
#[derive(Debug, FromRow)]
pub(crate) struct ExamResultRow {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) student_no: String,
    pub(crate) student_name: String,
    pub(crate) status: AttemptStatus,
    pub(crate) started_at: PrimitiveDateTime,
    pub(crate) submitted_at: Option<PrimitiveDateTime>,
    pub(crate) score: i32,
    pub(crate) total_marks: i32,
    pub(crate) percentage: i32,
}

pub(crate) async fn list_by_exam(
    pool: &SqlitePool,
    exam_id: &str,
) -> Result<Vec<ExamResultRow>, sqlx::Error> {
    sqlx::query_as::<_, ExamResultRow>(
        "SELECT r.id, r.student_id, st.student_no, st.full_name AS student_name,
                r.status, r.started_at, r.submitted_at, r.score, r.total_marks, r.percentage
         FROM results r
         JOIN students st ON st.id = r.student_id
         WHERE r.exam_id = ?
         ORDER BY r.percentage DESC, st.student_no",
    )
    .bind(exam_id)
    .fetch_all(pool)
    .await
}

#[derive(Debug, FromRow)]
pub(crate) struct ExamAggregateRow {
    pub(crate) attempts: i64,
    pub(crate) submitted: i64,
    pub(crate) average_percentage: Option<f64>,
    pub(crate) highest_score: Option<i32>,
    pub(crate) lowest_score: Option<i32>,
}

/// Aggregates over submitted attempts only; in-flight attempts count toward
/// `attempts` but not toward the score statistics.
pub(crate) async fn aggregate_for_exam(
    pool: &SqlitePool,
    exam_id: &str,
) -> Result<ExamAggregateRow, sqlx::Error> {
    sqlx::query_as::<_, ExamAggregateRow>(
        "SELECT COUNT(*) AS attempts,
                COUNT(submitted_at) AS submitted,
                AVG(CASE WHEN status = 'submitted' THEN percentage END) AS average_percentage,
                MAX(CASE WHEN status = 'submitted' THEN score END) AS highest_score,
                MIN(CASE WHEN status = 'submitted' THEN score END) AS lowest_score
         FROM results
         WHERE exam_id = ?",
    )
    .bind(exam_id)
    .fetch_one(pool)
    .await
}

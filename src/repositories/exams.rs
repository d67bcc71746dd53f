use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use time::PrimitiveDateTime;

use crate::db::models::Exam;

const COLUMNS: &str = "\
    id, subject_id, title, duration_minutes, questions_per_exam, total_marks, starts_at, \
    ends_at, is_active, created_at, updated_at";

pub(crate) async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!("SELECT {COLUMNS} FROM exams WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &SqlitePool,
    subject_id: Option<&str>,
    skip: i64,
    limit: i64,
) -> Result<Vec<Exam>, sqlx::Error> {
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM exams"));
    if let Some(subject_id) = subject_id {
        builder.push(" WHERE subject_id = ").push_bind(subject_id);
    }
    builder.push(" ORDER BY created_at DESC, id LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));
    builder.push(" OFFSET ");
    builder.push_bind(skip.max(0));
    builder.build_query_as::<Exam>().fetch_all(pool).await
}

pub(crate) async fn count(
    pool: &SqlitePool,
    subject_id: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM exams");
    if let Some(subject_id) = subject_id {
        builder.push(" WHERE subject_id = ").push_bind(subject_id);
    }
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

/// Exams a student is allowed to see: active ones, newest first.
pub(crate) async fn list_active(
    pool: &SqlitePool,
    skip: i64,
    limit: i64,
) -> Result<Vec<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams WHERE is_active = TRUE
         ORDER BY created_at DESC, id LIMIT ? OFFSET ?"
    ))
    .bind(limit.clamp(1, 1000))
    .bind(skip.max(0))
    .fetch_all(pool)
    .await
}

pub(crate) async fn count_active(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM exams WHERE is_active = TRUE")
        .fetch_one(pool)
        .await
}

pub(crate) struct CreateExam<'a> {
    pub(crate) id: &'a str,
    pub(crate) subject_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) duration_minutes: i32,
    pub(crate) questions_per_exam: i32,
    pub(crate) total_marks: i32,
    pub(crate) starts_at: Option<PrimitiveDateTime>,
    pub(crate) ends_at: Option<PrimitiveDateTime>,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &SqlitePool, params: CreateExam<'_>) -> Result<Exam, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "INSERT INTO exams (
            id, subject_id, title, duration_minutes, questions_per_exam, total_marks,
            starts_at, ends_at, is_active, created_at, updated_at
        ) VALUES (?,?,?,?,?,?,?,?,?,?,?)
        RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.subject_id)
    .bind(params.title)
    .bind(params.duration_minutes)
    .bind(params.questions_per_exam)
    .bind(params.total_marks)
    .bind(params.starts_at)
    .bind(params.ends_at)
    .bind(params.is_active)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateExam {
    pub(crate) title: Option<String>,
    pub(crate) duration_minutes: Option<i32>,
    pub(crate) questions_per_exam: Option<i32>,
    pub(crate) total_marks: Option<i32>,
    pub(crate) starts_at: Option<PrimitiveDateTime>,
    pub(crate) ends_at: Option<PrimitiveDateTime>,
    pub(crate) is_active: Option<bool>,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &SqlitePool,
    id: &str,
    params: UpdateExam,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE exams SET
            title = COALESCE(?, title),
            duration_minutes = COALESCE(?, duration_minutes),
            questions_per_exam = COALESCE(?, questions_per_exam),
            total_marks = COALESCE(?, total_marks),
            starts_at = COALESCE(?, starts_at),
            ends_at = COALESCE(?, ends_at),
            is_active = COALESCE(?, is_active),
            updated_at = ?
         WHERE id = ?",
    )
    .bind(params.title)
    .bind(params.duration_minutes)
    .bind(params.questions_per_exam)
    .bind(params.total_marks)
    .bind(params.starts_at)
    .bind(params.ends_at)
    .bind(params.is_active)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete_by_id(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM exams WHERE id = ?").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

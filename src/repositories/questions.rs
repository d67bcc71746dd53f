use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use time::PrimitiveDateTime;

use crate::db::models::Question;
use crate::db::types::{AnswerOption, Difficulty};

const COLUMNS: &str = "\
    id, subject_id, text, option_a, option_b, option_c, option_d, correct_option, marks, \
    difficulty, created_at, updated_at";

pub(crate) async fn find_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!("SELECT {COLUMNS} FROM questions WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &SqlitePool,
    subject_id: Option<&str>,
    skip: i64,
    limit: i64,
) -> Result<Vec<Question>, sqlx::Error> {
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM questions"));
    if let Some(subject_id) = subject_id {
        builder.push(" WHERE subject_id = ").push_bind(subject_id);
    }
    builder.push(" ORDER BY created_at DESC, id LIMIT ");
    builder.push_bind(limit.clamp(1, 1000));
    builder.push(" OFFSET ");
    builder.push_bind(skip.max(0));
    builder.build_query_as::<Question>().fetch_all(pool).await
}

pub(crate) async fn count(
    pool: &SqlitePool,
    subject_id: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM questions");
    if let Some(subject_id) = subject_id {
        builder.push(" WHERE subject_id = ").push_bind(subject_id);
    }
    builder.build_query_scalar::<i64>().fetch_one(pool).await
}

pub(crate) async fn count_for_subject(
    pool: &SqlitePool,
    subject_id: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE subject_id = ?")
        .bind(subject_id)
        .fetch_one(pool)
        .await
}

/// Draws a uniform random sample of question ids from the subject's bank.
pub(crate) async fn sample_ids_for_subject(
    pool: &SqlitePool,
    subject_id: &str,
    count: i64,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT id FROM questions WHERE subject_id = ? ORDER BY RANDOM() LIMIT ?",
    )
    .bind(subject_id)
    .bind(count)
    .fetch_all(pool)
    .await
}

pub(crate) async fn fetch_by_ids(
    pool: &SqlitePool,
    ids: &[String],
) -> Result<Vec<Question>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new(format!("SELECT {COLUMNS} FROM questions WHERE id IN ("));
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    builder.push(")");
    builder.build_query_as::<Question>().fetch_all(pool).await
}

/// (id, correct_option, marks) for the pinned question set, used at grading.
pub(crate) async fn answer_keys_by_ids(
    pool: &SqlitePool,
    ids: &[String],
) -> Result<Vec<(String, AnswerOption, i32)>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, correct_option, marks FROM questions WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id);
    }
    builder.push(")");
    builder
        .build_query_as::<(String, AnswerOption, i32)>()
        .fetch_all(pool)
        .await
}

pub(crate) struct CreateQuestion<'a> {
    pub(crate) id: &'a str,
    pub(crate) subject_id: &'a str,
    pub(crate) text: &'a str,
    pub(crate) option_a: &'a str,
    pub(crate) option_b: &'a str,
    pub(crate) option_c: &'a str,
    pub(crate) option_d: &'a str,
    pub(crate) correct_option: AnswerOption,
    pub(crate) marks: i32,
    pub(crate) difficulty: Difficulty,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateQuestion<'_>,
) -> Result<Question, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "INSERT INTO questions (
            id, subject_id, text, option_a, option_b, option_c, option_d, correct_option,
            marks, difficulty, created_at, updated_at
        ) VALUES (?,?,?,?,?,?,?,?,?,?,?,?)
        RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.subject_id)
    .bind(params.text)
    .bind(params.option_a)
    .bind(params.option_b)
    .bind(params.option_c)
    .bind(params.option_d)
    .bind(params.correct_option)
    .bind(params.marks)
    .bind(params.difficulty)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateQuestion {
    pub(crate) text: Option<String>,
    pub(crate) option_a: Option<String>,
    pub(crate) option_b: Option<String>,
    pub(crate) option_c: Option<String>,
    pub(crate) option_d: Option<String>,
    pub(crate) correct_option: Option<AnswerOption>,
    pub(crate) marks: Option<i32>,
    pub(crate) difficulty: Option<Difficulty>,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &SqlitePool,
    id: &str,
    params: UpdateQuestion,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE questions SET
            text = COALESCE(?, text),
            option_a = COALESCE(?, option_a),
            option_b = COALESCE(?, option_b),
            option_c = COALESCE(?, option_c),
            option_d = COALESCE(?, option_d),
            correct_option = COALESCE(?, correct_option),
            marks = COALESCE(?, marks),
            difficulty = COALESCE(?, difficulty),
            updated_at = ?
         WHERE id = ?",
    )
    .bind(params.text)
    .bind(params.option_a)
    .bind(params.option_b)
    .bind(params.option_c)
    .bind(params.option_d)
    .bind(params.correct_option)
    .bind(params.marks)
    .bind(params.difficulty)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete_by_id(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM questions WHERE id = ?").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

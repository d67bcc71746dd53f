use sqlx::SqlitePool;
use time::PrimitiveDateTime;

use crate::db::models::Student;

const COLUMNS: &str = "\
    id, student_no, full_name, email, hashed_password, is_active, created_at, updated_at";

pub(crate) async fn find_by_id(
    pool: &SqlitePool,
    id: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn fetch_one_by_id(pool: &SqlitePool, id: &str) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE id = ?"))
        .bind(id)
        .fetch_one(pool)
        .await
}

pub(crate) async fn find_by_student_no(
    pool: &SqlitePool,
    student_no: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE student_no = ?"))
        .bind(student_no)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_student_no_or_email(
    pool: &SqlitePool,
    student_no: &str,
    email: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>("SELECT id FROM students WHERE student_no = ? OR email = ?")
        .bind(student_no)
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(
    pool: &SqlitePool,
    skip: i64,
    limit: i64,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {COLUMNS} FROM students ORDER BY student_no LIMIT ? OFFSET ?"
    ))
    .bind(limit.clamp(1, 1000))
    .bind(skip.max(0))
    .fetch_all(pool)
    .await
}

pub(crate) async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM students").fetch_one(pool).await
}

pub(crate) struct CreateStudent<'a> {
    pub(crate) id: &'a str,
    pub(crate) student_no: &'a str,
    pub(crate) full_name: &'a str,
    pub(crate) email: &'a str,
    pub(crate) hashed_password: String,
    pub(crate) is_active: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &SqlitePool,
    params: CreateStudent<'_>,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (
            id, student_no, full_name, email, hashed_password, is_active, created_at, updated_at
        ) VALUES (?,?,?,?,?,?,?,?)
        RETURNING {COLUMNS}"
    ))
    .bind(params.id)
    .bind(params.student_no)
    .bind(params.full_name)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.is_active)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct UpdateStudent {
    pub(crate) full_name: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) hashed_password: Option<String>,
    pub(crate) is_active: Option<bool>,
    pub(crate) updated_at: PrimitiveDateTime,
}

pub(crate) async fn update(
    pool: &SqlitePool,
    id: &str,
    params: UpdateStudent,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE students SET
            full_name = COALESCE(?, full_name),
            email = COALESCE(?, email),
            hashed_password = COALESCE(?, hashed_password),
            is_active = COALESCE(?, is_active),
            updated_at = ?
         WHERE id = ?",
    )
    .bind(params.full_name)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.is_active)
    .bind(params.updated_at)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

pub(crate) async fn delete_by_id(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM students WHERE id = ?").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

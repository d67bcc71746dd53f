use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::api;
use crate::core::{
    config::Settings,
    security::{self, TokenKind},
    state::AppState,
    time::primitive_now_utc,
};
use crate::db::models::{Admin, Exam, Question, Student, Subject};
use crate::db::types::{AnswerOption, Difficulty};
use crate::repositories;

const TEST_SECRET_KEY: &str = "test-secret";

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    _guard: OwnedMutexGuard<()>,
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("EXAMHALL_ENV", "test");
    std::env::set_var("EXAMHALL_STRICT_CONFIG", "0");
    std::env::set_var("SECRET_KEY", TEST_SECRET_KEY);
    std::env::remove_var("DATABASE_URL");
    std::env::remove_var("FIRST_ADMIN_PASSWORD");
    std::env::remove_var("LATE_SUBMIT_GRACE_SECONDS");
    std::env::remove_var("BACKEND_CORS_ORIGINS");
}

pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let db = prepare_db().await;

    let state = AppState::new(settings, db);
    let app = api::router::router(state.clone());

    TestContext { state, app, _guard: guard }
}

// A shared in-memory database lives and dies with its connection, so the
// test pool is pinned to a single one.
async fn prepare_db() -> SqlitePool {
    let options = SqliteConnectOptions::new().in_memory(true).foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("db pool");

    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");
    pool
}

pub(crate) async fn insert_admin(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Admin {
    let hashed_password = security::hash_password(password).expect("hash password");
    let now = primitive_now_utc();

    repositories::admins::create(
        pool,
        repositories::admins::CreateAdmin {
            id: &Uuid::new_v4().to_string(),
            username,
            hashed_password,
            full_name: "Test Admin",
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("insert admin")
}

pub(crate) async fn insert_student(
    pool: &SqlitePool,
    student_no: &str,
    password: &str,
) -> Student {
    insert_student_with_active(pool, student_no, password, true).await
}

pub(crate) async fn insert_student_with_active(
    pool: &SqlitePool,
    student_no: &str,
    password: &str,
    is_active: bool,
) -> Student {
    let hashed_password = security::hash_password(password).expect("hash password");
    let now = primitive_now_utc();

    repositories::students::create(
        pool,
        repositories::students::CreateStudent {
            id: &Uuid::new_v4().to_string(),
            student_no,
            full_name: "Test Student",
            email: &format!("{student_no}@example.edu"),
            hashed_password,
            is_active,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("insert student")
}

pub(crate) async fn insert_subject(pool: &SqlitePool, name: &str) -> Subject {
    let now = primitive_now_utc();

    repositories::subjects::create(
        pool,
        repositories::subjects::CreateSubject {
            id: &Uuid::new_v4().to_string(),
            name,
            description: None,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("insert subject")
}

pub(crate) async fn insert_question(
    pool: &SqlitePool,
    subject_id: &str,
    text: &str,
    correct_option: AnswerOption,
    marks: i32,
) -> Question {
    let now = primitive_now_utc();

    repositories::questions::create(
        pool,
        repositories::questions::CreateQuestion {
            id: &Uuid::new_v4().to_string(),
            subject_id,
            text,
            option_a: "Option A",
            option_b: "Option B",
            option_c: "Option C",
            option_d: "Option D",
            correct_option,
            marks,
            difficulty: Difficulty::Medium,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("insert question")
}

pub(crate) struct ExamFixture<'a> {
    pub(crate) subject_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) duration_minutes: i32,
    pub(crate) questions_per_exam: i32,
    pub(crate) total_marks: i32,
    pub(crate) starts_at: Option<time::PrimitiveDateTime>,
    pub(crate) ends_at: Option<time::PrimitiveDateTime>,
    pub(crate) is_active: bool,
}

pub(crate) async fn insert_exam(pool: &SqlitePool, fixture: ExamFixture<'_>) -> Exam {
    let now = primitive_now_utc();

    repositories::exams::create(
        pool,
        repositories::exams::CreateExam {
            id: &Uuid::new_v4().to_string(),
            subject_id: fixture.subject_id,
            title: fixture.title,
            duration_minutes: fixture.duration_minutes,
            questions_per_exam: fixture.questions_per_exam,
            total_marks: fixture.total_marks,
            starts_at: fixture.starts_at,
            ends_at: fixture.ends_at,
            is_active: fixture.is_active,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .expect("insert exam")
}

pub(crate) async fn insert_open_exam(
    pool: &SqlitePool,
    subject_id: &str,
    questions_per_exam: i32,
    total_marks: i32,
) -> Exam {
    insert_exam(
        pool,
        ExamFixture {
            subject_id,
            title: "Test Exam",
            duration_minutes: 60,
            questions_per_exam,
            total_marks,
            starts_at: None,
            ends_at: None,
            is_active: true,
        },
    )
    .await
}

pub(crate) fn student_token(student_id: &str, settings: &Settings) -> String {
    security::create_access_token(student_id, TokenKind::Student, settings, None).expect("token")
}

pub(crate) fn admin_token(admin_id: &str, settings: &Settings) -> String {
    security::create_access_token(admin_id, TokenKind::Admin, settings, None).expect("token")
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}

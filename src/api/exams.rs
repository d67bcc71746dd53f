use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStudent;
use crate::api::pagination::{default_limit, PaginatedResponse};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::models::{Exam, ExamResult, Student};
use crate::db::types::AttemptStatus;
use crate::repositories;
use crate::schemas::exam::ExamResponse;
use crate::schemas::question::ExamQuestionResponse;
use crate::schemas::result::{
    AttemptStartedResponse, ExamPaperResponse, ExamSubmit, ResultResponse,
};
use crate::services::exam_session::{
    self, compute_expiry, exam_availability, is_expired, remaining_seconds, ExamAvailability,
};

#[derive(Debug, Deserialize)]
pub(crate) struct ListExamsQuery {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_exams))
        .route("/:exam_id", get(get_exam))
        .route("/:exam_id/start", post(start_exam))
        .route("/:exam_id/questions", get(exam_questions))
        .route("/:exam_id/submit", post(submit_exam))
}

async fn list_exams(
    Query(params): Query<ListExamsQuery>,
    CurrentStudent(_student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<PaginatedResponse<ExamResponse>>, ApiError> {
    let skip = params.skip.max(0);
    let limit = params.limit.clamp(1, 1000);

    let exams = repositories::exams::list_active(state.db(), skip, limit)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list exams"))?;
    let total_count = repositories::exams::count_active(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count exams"))?;

    Ok(Json(PaginatedResponse {
        items: exams.into_iter().map(ExamResponse::from_db).collect(),
        total_count,
        skip,
        limit,
    }))
}

async fn get_exam(
    Path(exam_id): Path<String>,
    CurrentStudent(_student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<ExamResponse>, ApiError> {
    let exam = fetch_exam(&state, &exam_id).await?;
    Ok(Json(ExamResponse::from_db(exam)))
}

async fn start_exam(
    Path(exam_id): Path<String>,
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<AttemptStartedResponse>), ApiError> {
    let exam = fetch_exam(&state, &exam_id).await?;
    let now = primitive_now_utc();

    check_open(&exam, now)?;

    let bank_size = repositories::questions::count_for_subject(state.db(), &exam.subject_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count question bank"))?;
    if bank_size < i64::from(exam.questions_per_exam) {
        return Err(ApiError::BadRequest(format!(
            "Question bank has {bank_size} questions, exam requires {}",
            exam.questions_per_exam
        )));
    }

    let question_ids = repositories::questions::sample_ids_for_subject(
        state.db(),
        &exam.subject_id,
        i64::from(exam.questions_per_exam),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to sample questions"))?;

    // The attempt is graded out of the pinned paper's marks; the exam's
    // nominal total need not match a random sample.
    let keys = repositories::questions::answer_keys_by_ids(state.db(), &question_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load question marks"))?;
    let total_marks: i32 = keys.iter().map(|(_, _, marks)| marks).sum();

    let expires_at = compute_expiry(now, exam.duration_minutes, exam.ends_at);
    let question_count = question_ids.len();

    let result = repositories::results::create(
        state.db(),
        repositories::results::CreateResult {
            id: &Uuid::new_v4().to_string(),
            exam_id: &exam.id,
            student_id: &student.id,
            question_ids,
            started_at: now,
            expires_at,
            total_marks,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| {
        if crate::db::is_unique_violation(&e) {
            ApiError::Forbidden("Exam already attempted")
        } else {
            ApiError::internal(e, "Failed to start exam attempt")
        }
    })?;

    tracing::info!(
        exam_id = %exam.id,
        student_id = %student.id,
        result_id = %result.id,
        "Exam attempt started"
    );

    Ok((
        StatusCode::CREATED,
        Json(AttemptStartedResponse {
            result_id: result.id,
            exam_id: result.exam_id,
            status: result.status,
            started_at: crate::core::time::format_primitive(result.started_at),
            expires_at: crate::core::time::format_primitive(result.expires_at),
            time_remaining_seconds: remaining_seconds(result.expires_at, now),
            question_count,
        }),
    ))
}

async fn exam_questions(
    Path(exam_id): Path<String>,
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
) -> Result<Json<ExamPaperResponse>, ApiError> {
    let result = fetch_attempt(&state, &exam_id, &student).await?;
    let now = primitive_now_utc();

    if result.status != AttemptStatus::Started {
        return Err(ApiError::Forbidden("Exam already submitted"));
    }
    if now >= result.expires_at {
        return Err(ApiError::Forbidden("Exam time is over"));
    }

    let questions = repositories::questions::fetch_by_ids(state.db(), &result.question_ids.0)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam questions"))?;

    // Deliver in the pinned sampling order, not table order.
    let mut by_id: std::collections::HashMap<String, _> =
        questions.into_iter().map(|q| (q.id.clone(), q)).collect();
    let ordered = result
        .question_ids
        .0
        .iter()
        .filter_map(|id| by_id.remove(id))
        .map(ExamQuestionResponse::from_db)
        .collect();

    Ok(Json(ExamPaperResponse {
        exam_id: result.exam_id,
        result_id: result.id,
        time_remaining_seconds: remaining_seconds(result.expires_at, now),
        questions: ordered,
    }))
}

async fn submit_exam(
    Path(exam_id): Path<String>,
    CurrentStudent(student): CurrentStudent,
    State(state): State<AppState>,
    Json(payload): Json<ExamSubmit>,
) -> Result<Json<ResultResponse>, ApiError> {
    let result = fetch_attempt(&state, &exam_id, &student).await?;
    let now = primitive_now_utc();

    if result.status != AttemptStatus::Started {
        return Err(ApiError::Forbidden("Exam already submitted"));
    }

    let grace = state.settings().exam().late_submit_grace_seconds as i64;
    if is_expired(result.expires_at, now, grace) {
        return Err(ApiError::Forbidden("Exam time is over"));
    }

    let keys = repositories::questions::answer_keys_by_ids(state.db(), &result.question_ids.0)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load answer keys"))?;

    let score = exam_session::score_answers(&keys, &payload.answers);
    let percentage = exam_session::percentage(score, result.total_marks);

    let updated = repositories::results::submit(
        state.db(),
        &result.id,
        repositories::results::SubmitResult {
            answers: payload.answers,
            score,
            percentage,
            submitted_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to submit exam attempt"))?;

    // Lost a race against another submit for the same attempt.
    if !updated {
        return Err(ApiError::Forbidden("Exam already submitted"));
    }

    tracing::info!(
        exam_id = %result.exam_id,
        student_id = %student.id,
        result_id = %result.id,
        score,
        percentage,
        "Exam attempt submitted"
    );

    let result = repositories::results::find_by_id(state.db(), &result.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch submitted attempt"))?
        .ok_or_else(|| ApiError::NotFound("Exam attempt not found".to_string()))?;

    Ok(Json(ResultResponse::from_db(result)))
}

async fn fetch_exam(state: &AppState, exam_id: &str) -> Result<Exam, ApiError> {
    repositories::exams::find_by_id(state.db(), exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam"))?
        .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))
}

async fn fetch_attempt(
    state: &AppState,
    exam_id: &str,
    student: &Student,
) -> Result<ExamResult, ApiError> {
    repositories::results::find_by_exam_and_student(state.db(), exam_id, &student.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch exam attempt"))?
        .ok_or_else(|| ApiError::NotFound("Exam attempt not found".to_string()))
}

fn check_open(exam: &Exam, now: time::PrimitiveDateTime) -> Result<(), ApiError> {
    match exam_availability(exam, now) {
        ExamAvailability::Open => Ok(()),
        ExamAvailability::Inactive => Err(ApiError::Forbidden("Exam is not active")),
        ExamAvailability::NotYetOpen => Err(ApiError::Forbidden("Exam has not opened yet")),
        ExamAvailability::Closed => Err(ApiError::Forbidden("Exam window has closed")),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use time::Duration;
    use tower::ServiceExt;

    use crate::core::time::primitive_now_utc;
    use crate::db::types::AnswerOption;
    use crate::test_support::{self, ExamFixture};

    #[tokio::test]
    async fn full_exam_flow_scores_submission() {
        let ctx = test_support::setup_test_context().await;
        let db = ctx.state.db();

        let subject = test_support::insert_subject(db, "Mathematics").await;
        let q1 = test_support::insert_question(db, &subject.id, "2+2?", AnswerOption::B, 2).await;
        let q2 = test_support::insert_question(db, &subject.id, "3*3?", AnswerOption::C, 3).await;
        let q3 = test_support::insert_question(db, &subject.id, "10/2?", AnswerOption::A, 5).await;
        let exam = test_support::insert_open_exam(db, &subject.id, 3, 10).await;

        let student = test_support::insert_student(db, "S1001", "student-pass").await;
        let token = test_support::student_token(&student.id, ctx.state.settings());

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exams/{}/start", exam.id),
                Some(&token),
                None,
            ))
            .await
            .expect("start");

        let status = response.status();
        let started = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {started}");
        assert_eq!(started["status"], "started");
        assert_eq!(started["question_count"], 3);
        assert!(started["time_remaining_seconds"].as_i64().unwrap() > 0);

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                &format!("/api/v1/exams/{}/questions", exam.id),
                Some(&token),
                None,
            ))
            .await
            .expect("questions");

        let status = response.status();
        let paper = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {paper}");
        let questions = paper["questions"].as_array().expect("questions");
        assert_eq!(questions.len(), 3);
        for question in questions {
            assert!(question.get("correct_option").is_none(), "answer key leaked: {question}");
        }

        // q1 and q3 right, q2 wrong: 2 + 5 of 10 marks.
        let mut answer_map = serde_json::Map::new();
        answer_map.insert(q1.id.clone(), json!("b"));
        answer_map.insert(q2.id.clone(), json!("a"));
        answer_map.insert(q3.id.clone(), json!("a"));
        let answers = json!({ "answers": answer_map });

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exams/{}/submit", exam.id),
                Some(&token),
                Some(answers),
            ))
            .await
            .expect("submit");

        let status = response.status();
        let result = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {result}");
        assert_eq!(result["status"], "submitted");
        assert_eq!(result["score"], 7);
        assert_eq!(result["total_marks"], 10);
        assert_eq!(result["percentage"], 70);
        assert!(result["submitted_at"].as_str().is_some());
    }

    #[tokio::test]
    async fn second_start_is_rejected() {
        let ctx = test_support::setup_test_context().await;
        let db = ctx.state.db();

        let subject = test_support::insert_subject(db, "Physics").await;
        test_support::insert_question(db, &subject.id, "Q1", AnswerOption::A, 1).await;
        let exam = test_support::insert_open_exam(db, &subject.id, 1, 1).await;

        let student = test_support::insert_student(db, "S1001", "student-pass").await;
        let token = test_support::student_token(&student.id, ctx.state.settings());

        let first = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exams/{}/start", exam.id),
                Some(&token),
                None,
            ))
            .await
            .expect("start");
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exams/{}/start", exam.id),
                Some(&token),
                None,
            ))
            .await
            .expect("start again");
        assert_eq!(second.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn second_submit_is_rejected() {
        let ctx = test_support::setup_test_context().await;
        let db = ctx.state.db();

        let subject = test_support::insert_subject(db, "Physics").await;
        test_support::insert_question(db, &subject.id, "Q1", AnswerOption::A, 1).await;
        let exam = test_support::insert_open_exam(db, &subject.id, 1, 1).await;

        let student = test_support::insert_student(db, "S1001", "student-pass").await;
        let token = test_support::student_token(&student.id, ctx.state.settings());

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exams/{}/start", exam.id),
                Some(&token),
                None,
            ))
            .await
            .expect("start");
        assert_eq!(response.status(), StatusCode::CREATED);

        let submit = test_support::json_request(
            Method::POST,
            &format!("/api/v1/exams/{}/submit", exam.id),
            Some(&token),
            Some(json!({"answers": {}})),
        );
        let response = ctx.app.clone().oneshot(submit).await.expect("submit");
        assert_eq!(response.status(), StatusCode::OK);

        let submit = test_support::json_request(
            Method::POST,
            &format!("/api/v1/exams/{}/submit", exam.id),
            Some(&token),
            Some(json!({"answers": {}})),
        );
        let response = ctx.app.oneshot(submit).await.expect("submit again");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn start_requires_sufficient_question_bank() {
        let ctx = test_support::setup_test_context().await;
        let db = ctx.state.db();

        let subject = test_support::insert_subject(db, "Chemistry").await;
        test_support::insert_question(db, &subject.id, "Q1", AnswerOption::A, 1).await;
        let exam = test_support::insert_open_exam(db, &subject.id, 5, 5).await;

        let student = test_support::insert_student(db, "S1001", "student-pass").await;
        let token = test_support::student_token(&student.id, ctx.state.settings());

        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exams/{}/start", exam.id),
                Some(&token),
                None,
            ))
            .await
            .expect("start");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn inactive_or_closed_exam_cannot_be_started() {
        let ctx = test_support::setup_test_context().await;
        let db = ctx.state.db();

        let subject = test_support::insert_subject(db, "Biology").await;
        test_support::insert_question(db, &subject.id, "Q1", AnswerOption::A, 1).await;

        let now = primitive_now_utc();
        let inactive = test_support::insert_exam(
            db,
            ExamFixture {
                subject_id: &subject.id,
                title: "Inactive",
                duration_minutes: 30,
                questions_per_exam: 1,
                total_marks: 1,
                starts_at: None,
                ends_at: None,
                is_active: false,
            },
        )
        .await;
        let closed = test_support::insert_exam(
            db,
            ExamFixture {
                subject_id: &subject.id,
                title: "Closed",
                duration_minutes: 30,
                questions_per_exam: 1,
                total_marks: 1,
                starts_at: Some(now - Duration::hours(2)),
                ends_at: Some(now - Duration::hours(1)),
                is_active: true,
            },
        )
        .await;
        let upcoming = test_support::insert_exam(
            db,
            ExamFixture {
                subject_id: &subject.id,
                title: "Upcoming",
                duration_minutes: 30,
                questions_per_exam: 1,
                total_marks: 1,
                starts_at: Some(now + Duration::hours(1)),
                ends_at: None,
                is_active: true,
            },
        )
        .await;

        let student = test_support::insert_student(db, "S1001", "student-pass").await;
        let token = test_support::student_token(&student.id, ctx.state.settings());

        for exam_id in [&inactive.id, &closed.id, &upcoming.id] {
            let response = ctx
                .app
                .clone()
                .oneshot(test_support::json_request(
                    Method::POST,
                    &format!("/api/v1/exams/{exam_id}/start"),
                    Some(&token),
                    None,
                ))
                .await
                .expect("start");
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "exam {exam_id}");
        }
    }

    #[tokio::test]
    async fn listing_shows_only_active_exams() {
        let ctx = test_support::setup_test_context().await;
        let db = ctx.state.db();

        let subject = test_support::insert_subject(db, "History").await;
        test_support::insert_open_exam(db, &subject.id, 1, 1).await;
        test_support::insert_exam(
            db,
            ExamFixture {
                subject_id: &subject.id,
                title: "Hidden",
                duration_minutes: 30,
                questions_per_exam: 1,
                total_marks: 1,
                starts_at: None,
                ends_at: None,
                is_active: false,
            },
        )
        .await;

        let student = test_support::insert_student(db, "S1001", "student-pass").await;
        let token = test_support::student_token(&student.id, ctx.state.settings());

        let response = ctx
            .app
            .oneshot(test_support::json_request(Method::GET, "/api/v1/exams", Some(&token), None))
            .await
            .expect("list");

        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {body}");
        let items = body["items"].as_array().expect("items");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["title"], "Test Exam");
    }

    #[tokio::test]
    async fn requests_without_token_are_rejected() {
        let ctx = test_support::setup_test_context().await;

        let response = ctx
            .app
            .oneshot(test_support::json_request(Method::GET, "/api/v1/exams", None, None))
            .await
            .expect("list");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().contains_key("www-authenticate"));
    }

    #[tokio::test]
    async fn attempt_is_graded_out_of_pinned_marks() {
        let ctx = test_support::setup_test_context().await;
        let db = ctx.state.db();

        // Nominal exam total says 10, but the sampled paper carries 20 marks.
        let subject = test_support::insert_subject(db, "Mathematics").await;
        let q1 = test_support::insert_question(db, &subject.id, "Q1", AnswerOption::A, 10).await;
        let q2 = test_support::insert_question(db, &subject.id, "Q2", AnswerOption::A, 10).await;
        let exam = test_support::insert_open_exam(db, &subject.id, 2, 10).await;

        let student = test_support::insert_student(db, "S1001", "student-pass").await;
        let token = test_support::student_token(&student.id, ctx.state.settings());

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exams/{}/start", exam.id),
                Some(&token),
                None,
            ))
            .await
            .expect("start");
        assert_eq!(response.status(), StatusCode::CREATED);

        let mut answer_map = serde_json::Map::new();
        answer_map.insert(q1.id.clone(), json!("a"));
        answer_map.insert(q2.id.clone(), json!("a"));
        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exams/{}/submit", exam.id),
                Some(&token),
                Some(json!({ "answers": answer_map })),
            ))
            .await
            .expect("submit");

        let status = response.status();
        let result = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {result}");
        assert_eq!(result["score"], 20);
        assert_eq!(result["total_marks"], 20);
        assert_eq!(result["percentage"], 100);
    }

    #[tokio::test]
    async fn expired_attempt_rejects_questions_and_submit() {
        let ctx = test_support::setup_test_context().await;
        let db = ctx.state.db();

        let subject = test_support::insert_subject(db, "Physics").await;
        let question =
            test_support::insert_question(db, &subject.id, "Q1", AnswerOption::A, 1).await;
        let exam = test_support::insert_open_exam(db, &subject.id, 1, 1).await;

        let student = test_support::insert_student(db, "S1001", "student-pass").await;
        let token = test_support::student_token(&student.id, ctx.state.settings());

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exams/{}/start", exam.id),
                Some(&token),
                None,
            ))
            .await
            .expect("start");
        let status = response.status();
        let started = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {started}");
        let result_id = started["result_id"].as_str().expect("result id").to_string();

        // Backdate the deadline well past the submit grace.
        let expired = primitive_now_utc() - Duration::minutes(10);
        sqlx::query("UPDATE results SET expires_at = ? WHERE id = ?")
            .bind(expired)
            .bind(&result_id)
            .execute(db)
            .await
            .expect("backdate");

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                &format!("/api/v1/exams/{}/questions", exam.id),
                Some(&token),
                None,
            ))
            .await
            .expect("questions");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let mut answer_map = serde_json::Map::new();
        answer_map.insert(question.id.clone(), json!("a"));
        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exams/{}/submit", exam.id),
                Some(&token),
                Some(json!({ "answers": answer_map })),
            ))
            .await
            .expect("submit");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn grace_window_accepts_submit_but_not_questions() {
        let ctx = test_support::setup_test_context().await;
        let db = ctx.state.db();

        let subject = test_support::insert_subject(db, "Chemistry").await;
        let question =
            test_support::insert_question(db, &subject.id, "Q1", AnswerOption::A, 1).await;
        let exam = test_support::insert_open_exam(db, &subject.id, 1, 1).await;

        let student = test_support::insert_student(db, "S1001", "student-pass").await;
        let token = test_support::student_token(&student.id, ctx.state.settings());

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exams/{}/start", exam.id),
                Some(&token),
                None,
            ))
            .await
            .expect("start");
        let status = response.status();
        let started = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {started}");
        let result_id = started["result_id"].as_str().expect("result id").to_string();

        // Just past the deadline, still inside the submit grace.
        let expired = primitive_now_utc() - Duration::seconds(10);
        sqlx::query("UPDATE results SET expires_at = ? WHERE id = ?")
            .bind(expired)
            .bind(&result_id)
            .execute(db)
            .await
            .expect("backdate");

        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::GET,
                &format!("/api/v1/exams/{}/questions", exam.id),
                Some(&token),
                None,
            ))
            .await
            .expect("questions");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let mut answer_map = serde_json::Map::new();
        answer_map.insert(question.id.clone(), json!("a"));
        let response = ctx
            .app
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/exams/{}/submit", exam.id),
                Some(&token),
                Some(json!({ "answers": answer_map })),
            ))
            .await
            .expect("submit");
        let status = response.status();
        let result = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::OK, "response: {result}");
        assert_eq!(result["score"], 1);
    }
}

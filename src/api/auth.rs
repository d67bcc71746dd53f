use std::time::Duration;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{ClientIp, CurrentPrincipal};
use crate::core::security::{self, TokenKind};
use crate::core::state::AppState;
use crate::repositories;
use crate::schemas::auth::{AdminLogin, AdminResponse, ProfileResponse, StudentLogin, TokenResponse};
use crate::schemas::student::StudentResponse;

/// Max attempts per window for the login endpoints.
const AUTH_RATE_LIMIT: u64 = 10;
/// Rate limit window in seconds.
const AUTH_RATE_WINDOW_SECONDS: u64 = 60;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/student/login", post(student_login))
        .route("/admin/login", post(admin_login))
        .route("/me", get(me))
}

/// Counts hits per client address and per submitted identifier, so neither
/// rotating identifiers from one host nor spraying one account from many
/// hosts slips through.
fn check_rate_limit(
    state: &AppState,
    scope: &str,
    client_ip: &str,
    identifier: &str,
) -> Result<(), ApiError> {
    let window = Duration::from_secs(AUTH_RATE_WINDOW_SECONDS);
    let within_ip =
        state.limiter().check(&format!("rl:{scope}:ip:{client_ip}"), AUTH_RATE_LIMIT, window);
    let within_id =
        state.limiter().check(&format!("rl:{scope}:id:{identifier}"), AUTH_RATE_LIMIT, window);

    if within_ip && within_id {
        Ok(())
    } else {
        Err(ApiError::TooManyRequests("Too many login attempts, try again later"))
    }
}

async fn student_login(
    ClientIp(client_ip): ClientIp,
    State(state): State<AppState>,
    Json(payload): Json<StudentLogin>,
) -> Result<Json<TokenResponse>, ApiError> {
    check_rate_limit(&state, "student-login", &client_ip, &payload.student_no)?;

    let student = repositories::students::find_by_student_no(state.db(), &payload.student_no)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student"))?
        .ok_or(ApiError::Unauthorized("Incorrect student number or password"))?;

    let verified = security::verify_password(&payload.password, &student.hashed_password)
        .map_err(|_| ApiError::Unauthorized("Incorrect student number or password"))?;

    if !verified {
        return Err(ApiError::Unauthorized("Incorrect student number or password"));
    }

    if !student.is_active {
        return Err(ApiError::BadRequest("Inactive student account".to_string()));
    }

    let token = security::create_access_token(&student.id, TokenKind::Student, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        profile: ProfileResponse::Student(StudentResponse::from_db(student)),
    }))
}

async fn admin_login(
    ClientIp(client_ip): ClientIp,
    State(state): State<AppState>,
    Json(payload): Json<AdminLogin>,
) -> Result<Json<TokenResponse>, ApiError> {
    check_rate_limit(&state, "admin-login", &client_ip, &payload.username)?;

    let admin = repositories::admins::find_by_username(state.db(), &payload.username)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch admin"))?
        .ok_or(ApiError::Unauthorized("Incorrect username or password"))?;

    let verified = security::verify_password(&payload.password, &admin.hashed_password)
        .map_err(|_| ApiError::Unauthorized("Incorrect username or password"))?;

    if !verified {
        return Err(ApiError::Unauthorized("Incorrect username or password"));
    }

    let token = security::create_access_token(&admin.id, TokenKind::Admin, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        profile: ProfileResponse::Admin(AdminResponse::from_db(admin)),
    }))
}

async fn me(principal: CurrentPrincipal) -> Json<ProfileResponse> {
    let profile = match principal {
        CurrentPrincipal::Student(student) => {
            ProfileResponse::Student(StudentResponse::from_db(student))
        }
        CurrentPrincipal::Admin(admin) => ProfileResponse::Admin(AdminResponse::from_db(admin)),
    };

    Json(profile)
}

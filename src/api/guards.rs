use std::convert::Infallible;
use std::net::SocketAddr;

use async_trait::async_trait;
use axum::extract::{ConnectInfo, FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::security::{self, TokenKind};
use crate::core::state::AppState;
use crate::db::models::{Admin, Student};
use crate::repositories;

pub(crate) struct CurrentStudent(pub(crate) Student);
pub(crate) struct CurrentAdmin(pub(crate) Admin);

/// Whoever the bearer token belongs to, either kind.
pub(crate) enum CurrentPrincipal {
    Student(Student),
    Admin(Admin),
}

/// Best-effort client address: the first `X-Forwarded-For` entry when behind
/// a proxy, otherwise the peer address from the connection.
pub(crate) struct ClientIp(pub(crate) String);

fn bearer_claims(
    parts: &Parts,
    state: &AppState,
) -> Result<security::Claims, ApiError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

    security::verify_token(token, state.settings())
        .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentStudent {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let claims = bearer_claims(parts, &app_state)?;
        if claims.kind != TokenKind::Student {
            return Err(ApiError::Forbidden("Student access required"));
        }

        let student = repositories::students::find_by_id(app_state.db(), &claims.sub)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load student"))?;

        let Some(student) = student else {
            return Err(ApiError::Unauthorized("Student not found"));
        };

        if !student.is_active {
            return Err(ApiError::Unauthorized("Invalid authentication credentials"));
        }

        Ok(CurrentStudent(student))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let claims = bearer_claims(parts, &app_state)?;
        if claims.kind != TokenKind::Admin {
            return Err(ApiError::Forbidden("Admin access required"));
        }

        let admin = repositories::admins::find_by_id(app_state.db(), &claims.sub)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load admin"))?;

        admin.map(CurrentAdmin).ok_or(ApiError::Unauthorized("Admin not found"))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let claims = bearer_claims(parts, &app_state)?;

        match claims.kind {
            TokenKind::Student => {
                let student = repositories::students::find_by_id(app_state.db(), &claims.sub)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to load student"))?
                    .ok_or(ApiError::Unauthorized("Student not found"))?;

                if !student.is_active {
                    return Err(ApiError::Unauthorized("Invalid authentication credentials"));
                }

                Ok(CurrentPrincipal::Student(student))
            }
            TokenKind::Admin => {
                let admin = repositories::admins::find_by_id(app_state.db(), &claims.sub)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to load admin"))?
                    .ok_or(ApiError::Unauthorized("Admin not found"))?;

                Ok(CurrentPrincipal::Admin(admin))
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        if let Some(ip) = forwarded {
            return Ok(ClientIp(ip));
        }

        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        Ok(ClientIp(ip))
    }
}

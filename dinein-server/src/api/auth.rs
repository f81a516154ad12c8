//! Staff authentication endpoints: register, login

use axum::{Json, Router, extract::State, http::StatusCode, middleware, routing::post};
use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{LoginRequest, LoginResponse, PublicUser, RegisterRequest, UserRole};

use crate::auth::rate_limit::{login_rate_limit, register_rate_limit};
use crate::auth::staff_auth::create_token;
use crate::db;
use crate::error::{ServiceError, ServiceResult, invalid};
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

use super::ApiResult;

pub fn router(state: &AppState) -> Router<AppState> {
    let register_routes = Router::new()
        .route("/api/auth/register", post(register))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            register_rate_limit,
        ));
    let login_routes = Router::new()
        .route("/api/auth/login", post(login))
        .layer(middleware::from_fn_with_state(state.clone(), login_rate_limit));
    register_routes.merge(login_routes)
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: PublicUser,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ServiceResult<(StatusCode, Json<RegisterResponse>)> {
    let (Some(email), Some(password), Some(role)) = (
        shared::util::non_blank(req.email),
        req.password.filter(|p| !p.is_empty()),
        shared::util::non_blank(req.role),
    ) else {
        return Err(invalid("Email, password, and role are required"));
    };

    let role = UserRole::parse(&role)
        .ok_or_else(|| invalid("Invalid role. Allowed roles: staff, waiter, kitchen"))?;
    if !role.is_self_registrable() {
        tracing::warn!(email = %email, "Admin self-registration refused");
        return Err(AppError::with_message(
            ErrorCode::RegistrationRestricted,
            "Registration for admin role is restricted. Please use the pre-configured admin account.",
        )
        .into());
    }

    let email = email.to_lowercase();
    if db::users::email_exists(&state.pool, &email).await? {
        return Err(AppError::new(ErrorCode::EmailExists).into());
    }

    let hash = hash_password(&password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let user = db::users::create(&state.pool, &email, &hash, role)
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                ServiceError::App(AppError::new(ErrorCode::EmailExists))
            } else {
                ServiceError::Db(e)
            }
        })?;

    tracing::info!(user_id = %user.id, role = %user.role, "Staff account registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully",
            user: PublicUser::from(&user),
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let (Some(email), Some(password)) = (shared::util::non_blank(req.email), req.password) else {
        return Err(invalid("Email and password are required"));
    };
    let email = email.to_lowercase();

    let user = db::users::find_by_email(&state.pool, &email).await?;
    let Some(user) = user.filter(|u| verify_password(&password, &u.password_hash)) else {
        tracing::warn!(email = %email, "Failed login attempt");
        return Err(AppError::new(ErrorCode::InvalidCredentials).into());
    };

    if !user.status.is_active() {
        return Err(AppError::new(ErrorCode::AccountDisabled).into());
    }

    let token = create_token(&user, &state.jwt_secret).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    tracing::info!(user_id = %user.id, "Staff login");
    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: PublicUser::from(&user),
    }))
}

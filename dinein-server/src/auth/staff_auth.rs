//! Staff JWT authentication for the admin API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{User, UserRole};
use uuid::Uuid;

use crate::state::AppState;

const JWT_EXPIRY_HOURS: i64 = 24;

/// JWT claims for staff sessions
#[derive(Debug, Serialize, Deserialize)]
pub struct StaffClaims {
    /// User ID
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: i64,
    /// Issued at (Unix timestamp seconds)
    pub iat: i64,
}

/// Authenticated staff identity extracted from JWT
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Create a 24h session token for a staff user
pub fn create_token(user: &User, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = StaffClaims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role.as_str().to_string(),
        exp: (now + Duration::hours(JWT_EXPIRY_HOURS)).timestamp(),
        iat: now.timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and check a session token
pub fn validate_token(token: &str, secret: &str) -> Result<CurrentUser, AppError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = jsonwebtoken::decode::<StaffClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::token_expired(),
        _ => {
            tracing::debug!("JWT validation failed: {e}");
            AppError::invalid_token("Invalid or expired token")
        }
    })?;

    let claims = data.claims;
    let id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::invalid_token("Invalid token subject"))?;
    let role = UserRole::parse(&claims.role)
        .ok_or_else(|| AppError::invalid_token("Invalid token role"))?;

    Ok(CurrentUser {
        id,
        email: claims.email,
        role,
    })
}

/// Middleware: require a valid `Authorization: Bearer <token>` header
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| {
            tracing::warn!(uri = %request.uri(), "Missing bearer token");
            AppError::unauthorized()
        })?;

    let user = validate_token(token, &state.jwt_secret)?;
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

/// Middleware: require the admin role (after `require_auth`)
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::unauthorized)?;

    if !user.is_admin() {
        tracing::warn!(
            user_id = %user.id,
            email = %user.email,
            role = %user.role,
            uri = %request.uri(),
            "Admin role required"
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(request).await)
}

//! HTTP routes

pub mod auth;
pub mod categories;
pub mod health;
pub mod items;
pub mod menu;
pub mod modifiers;
pub mod photos;
pub mod qr;
pub mod tables;

use axum::{Json, Router, middleware};
use http::{HeaderName, HeaderValue};
use serde::Serialize;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{require_admin, require_auth};
use crate::error::ServiceError;
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, ServiceError>;

/// `{message}` / `{message, data}` acknowledgement body
#[derive(Debug, Serialize)]
pub struct Message<T = ()> {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl Message {
    pub fn new(message: &'static str) -> Json<Self> {
        Json(Self {
            message,
            data: None,
        })
    }
}

impl<T> Message<T> {
    pub fn with_data(message: &'static str, data: T) -> Json<Self> {
        Json(Self {
            message,
            data: Some(data),
        })
    }
}

#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Routes open to guests and anonymous staff
fn public_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(menu::router())
        .merge(photos::uploads_router())
}

/// `/api/admin/*`: bearer token with the admin role
fn admin_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(tables::router())
        .merge(qr::router())
        .merge(categories::router())
        .merge(items::router())
        .merge(photos::router())
        .merge(modifiers::router())
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
}

/// Build the application with every route and middleware layer
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(public_router())
        .merge(auth::router(&state))
        .merge(admin_router(&state))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .with_state(state)
}

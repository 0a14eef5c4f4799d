//! User registration and login endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use domain::{Credentials, RegisterUser, Role, User};
use serde::Serialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub roles: Vec<Role>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            first_name: user.first_name().map(String::from),
            last_name: user.last_name().map(String::from),
            roles: user.roles().to_vec(),
            created_at: user.created_at(),
        }
    }
}

/// POST /users/register: create a customer account.
#[tracing::instrument(skip(state, payload))]
pub async fn register(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterUser>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let Json(req) = payload?;
    let user = state.users.register(req).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /users/login: verify credentials.
#[tracing::instrument(skip(state, payload))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(credentials) = payload?;
    let user = state.users.authenticate(credentials).await?;
    Ok(Json(user.into()))
}

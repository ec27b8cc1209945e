//! User handlers.

use super::AppState;
use super::responses::{Message, UserCreated, UserList};
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::models::{NewUser, User};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::info;

/// `POST /users`
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserCreated>)> {
    let Json(input) = payload?;
    let input = input.validate()?;

    let user = state.store.create_user(input).await?;
    metrics::record_user_created();
    info!(id = user.id, username = %user.username, "User created");

    Ok((
        StatusCode::CREATED,
        Json(UserCreated {
            message: "User created".to_string(),
            id: user.id,
            user,
        }),
    ))
}

/// `GET /users`
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<UserList>> {
    let users = state.store.list_users().await?;
    Ok(Json(UserList {
        count: users.len(),
        users,
    }))
}

/// `GET /users/{id}`
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<User>> {
    let Path(id) = id?;
    state
        .store
        .get_user(id)
        .await?
        .map(Json)
        .ok_or(ApiError::user_not_found(id))
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Message>> {
    let Path(id) = id?;
    if !state.store.delete_user(id).await? {
        return Err(ApiError::user_not_found(id));
    }

    info!(id, "User deleted");
    Ok(Json(Message {
        message: format!("User {id} deleted"),
    }))
}

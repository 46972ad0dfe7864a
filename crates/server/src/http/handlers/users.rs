use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::User;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{current_user, map_service_error};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "username must not be empty".to_string(),
        ));
    }

    let (user, token) = state
        .coordinator
        .create_user(username)
        .await
        .map_err(map_service_error)?;

    Ok(Json(json!({ "user": user, "token": token })))
}

pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<User>, (StatusCode, String)> {
    let user = current_user(&state.db, &headers).await?;
    Ok(Json(user))
}

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::{NewsFeedEntry, Notification};
use serde::Deserialize;

use super::{current_user, map_service_error};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PageParams {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

pub async fn list_feed(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<NewsFeedEntry>>, (StatusCode, String)> {
    let limit = params.limit.clamp(1, 200);
    let offset = params.offset.max(0);

    let entries = state
        .coordinator
        .feed(limit, offset)
        .await
        .map_err(map_service_error)?;

    Ok(Json(entries))
}

pub async fn list_notifications(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<PageParams>,
) -> Result<Json<Vec<Notification>>, (StatusCode, String)> {
    let user = current_user(&state.db, &headers).await?;
    let limit = params.limit.clamp(1, 200);
    let offset = params.offset.max(0);

    let notifications = state
        .coordinator
        .notifications_for(&user, limit, offset)
        .await
        .map_err(map_service_error)?;

    Ok(Json(notifications))
}

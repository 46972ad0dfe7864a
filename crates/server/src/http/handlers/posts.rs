use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::{votes::VoteDirection, Post};
use serde::Deserialize;

use super::{current_user, map_service_error, parse_id};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

pub async fn create_draft(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PostRequest>,
) -> Result<Json<Post>, (StatusCode, String)> {
    let user = current_user(&state.db, &headers).await?;

    let post = state
        .coordinator
        .create_draft(&user, &payload.title, &payload.text, payload.categories)
        .await
        .map_err(map_service_error)?;

    Ok(Json(post))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id_str): Path<String>,
) -> Result<Json<Post>, (StatusCode, String)> {
    let post_id = parse_id("post", &post_id_str)?;

    let post = state
        .coordinator
        .get_post(&post_id)
        .await
        .map_err(map_service_error)?;

    Ok(Json(post))
}

pub async fn publish_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id_str): Path<String>,
) -> Result<Json<Post>, (StatusCode, String)> {
    let user = current_user(&state.db, &headers).await?;
    let post_id = parse_id("post", &post_id_str)?;

    let post = state
        .coordinator
        .publish_post(&user, &post_id)
        .await
        .map_err(map_service_error)?;

    Ok(Json(post))
}

pub async fn edit_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id_str): Path<String>,
    Json(payload): Json<PostRequest>,
) -> Result<Json<Post>, (StatusCode, String)> {
    let user = current_user(&state.db, &headers).await?;
    let post_id = parse_id("post", &post_id_str)?;

    let post = state
        .coordinator
        .edit_post(&user, &post_id, &payload.title, &payload.text, payload.categories)
        .await
        .map_err(map_service_error)?;

    Ok(Json(post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id_str): Path<String>,
) -> Result<Json<&'static str>, (StatusCode, String)> {
    let user = current_user(&state.db, &headers).await?;
    let post_id = parse_id("post", &post_id_str)?;

    state
        .coordinator
        .delete_post(&user, &post_id)
        .await
        .map_err(map_service_error)?;

    Ok(Json("Deleted"))
}

pub async fn vote_up(
    state: State<AppState>,
    headers: HeaderMap,
    path: Path<String>,
) -> Result<Json<Post>, (StatusCode, String)> {
    vote(state, headers, path, VoteDirection::Up).await
}

pub async fn vote_down(
    state: State<AppState>,
    headers: HeaderMap,
    path: Path<String>,
) -> Result<Json<Post>, (StatusCode, String)> {
    vote(state, headers, path, VoteDirection::Down).await
}

async fn vote(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id_str): Path<String>,
    direction: VoteDirection,
) -> Result<Json<Post>, (StatusCode, String)> {
    let user = current_user(&state.db, &headers).await?;
    let post_id = parse_id("post", &post_id_str)?;

    let post = state
        .coordinator
        .vote_post(&user, &post_id, direction)
        .await
        .map_err(map_service_error)?;

    Ok(Json(post))
}

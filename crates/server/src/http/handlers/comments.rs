use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::{
    tree::CommentView,
    votes::VoteDirection,
    Post,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{current_user, map_service_error, parse_id};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

pub async fn create_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id_str): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<Post>, (StatusCode, String)> {
    let user = current_user(&state.db, &headers).await?;
    let post_id = parse_id("post", &post_id_str)?;

    let post = state
        .coordinator
        .create_comment(&user, &post_id, &payload.text)
        .await
        .map_err(map_service_error)?;

    Ok(Json(post))
}

pub async fn create_reply(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((post_id_str, comment_id_str)): Path<(String, String)>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<Post>, (StatusCode, String)> {
    let user = current_user(&state.db, &headers).await?;
    let post_id = parse_id("post", &post_id_str)?;
    let parent_id = parse_id("comment", &comment_id_str)?;

    let post = state
        .coordinator
        .create_reply(&user, &post_id, &parent_id, &payload.text)
        .await
        .map_err(map_service_error)?;

    Ok(Json(post))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path((post_id_str, comment_id_str)): Path<(String, String)>,
) -> Result<Json<CommentView>, (StatusCode, String)> {
    let post_id = parse_id("post", &post_id_str)?;
    let comment_id = parse_id("comment", &comment_id_str)?;

    let view = state
        .coordinator
        .comment_view(&post_id, &comment_id)
        .await
        .map_err(map_service_error)?;

    Ok(Json(view))
}

pub async fn update_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((post_id_str, comment_id_str)): Path<(String, String)>,
    Json(payload): Json<CommentRequest>,
) -> Result<Json<CommentView>, (StatusCode, String)> {
    let user = current_user(&state.db, &headers).await?;
    let post_id = parse_id("post", &post_id_str)?;
    let comment_id = parse_id("comment", &comment_id_str)?;

    let view = state
        .coordinator
        .update_comment(&user, &post_id, &comment_id, &payload.text)
        .await
        .map_err(map_service_error)?;

    Ok(Json(view))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((post_id_str, comment_id_str)): Path<(String, String)>,
) -> Result<Json<Value>, (StatusCode, String)> {
    let user = current_user(&state.db, &headers).await?;
    let post_id = parse_id("post", &post_id_str)?;
    let comment_id = parse_id("comment", &comment_id_str)?;

    let deleted = state
        .coordinator
        .delete_comment(&user, &post_id, &comment_id)
        .await
        .map_err(map_service_error)?;

    Ok(Json(json!({ "id": deleted })))
}

pub async fn vote_up(
    state: State<AppState>,
    headers: HeaderMap,
    path: Path<(String, String)>,
) -> Result<Json<CommentView>, (StatusCode, String)> {
    vote(state, headers, path, VoteDirection::Up).await
}

pub async fn vote_down(
    state: State<AppState>,
    headers: HeaderMap,
    path: Path<(String, String)>,
) -> Result<Json<CommentView>, (StatusCode, String)> {
    vote(state, headers, path, VoteDirection::Down).await
}

async fn vote(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((post_id_str, comment_id_str)): Path<(String, String)>,
    direction: VoteDirection,
) -> Result<Json<CommentView>, (StatusCode, String)> {
    let user = current_user(&state.db, &headers).await?;
    let post_id = parse_id("post", &post_id_str)?;
    let comment_id = parse_id("comment", &comment_id_str)?;

    let view = state
        .coordinator
        .vote_comment(&user, &post_id, &comment_id, direction)
        .await
        .map_err(map_service_error)?;

    Ok(Json(view))
}

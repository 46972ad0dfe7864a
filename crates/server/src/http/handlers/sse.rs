use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::sse::{Event, KeepAlive, Sse},
};
use domain::LiveEvent;
use futures::stream::Stream;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};

use super::current_user;
use crate::state::AppState;

/// 单个帖子的评论直播流。公开,不做鉴权。
pub async fn post_stream(
    State(state): State<AppState>,
    Path(post_id_str): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let rx = state.tx_live.subscribe();
    tracing::info!("SSE connected: post={}", post_id_str);

    let stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(event) => match event {
            LiveEvent::CommentSaved { post_id, comment } => {
                if post_id.as_str() == post_id_str {
                    let event_type = if comment.updated_at.is_some() {
                        "update_comment"
                    } else {
                        "new_comment"
                    };
                    Some(
                        Event::default()
                            .event(event_type)
                            .json_data(comment)
                            .map_err(|e| {
                                tracing::error!("SSE serialization error: {}", e);
                                axum::Error::new(e)
                            }),
                    )
                } else {
                    None
                }
            }
            LiveEvent::CommentDeleted {
                post_id,
                comment_id,
            } => {
                if post_id.as_str() == post_id_str {
                    Some(
                        Event::default()
                            .event("delete_comment")
                            .json_data(serde_json::json!({ "id": comment_id }))
                            .map_err(|e| {
                                tracing::error!("SSE serialization error: {}", e);
                                axum::Error::new(e)
                            }),
                    )
                } else {
                    None
                }
            }
            LiveEvent::NotificationCreated { .. } => None,
        },
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(std::time::Duration::from_secs(15)))
}

/// 当前用户的通知直播流
pub async fn notification_stream(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, (StatusCode, String)> {
    let user = current_user(&state.db, &headers).await?;
    let rx = state.tx_live.subscribe();
    tracing::info!("SSE connected: notifications for {}", user.username);

    let user_id = user.id;
    let stream = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(LiveEvent::NotificationCreated { notification }) if notification.to == user_id => Some(
            Event::default()
                .event("notification")
                .json_data(notification)
                .map_err(|e| {
                    tracing::error!("SSE serialization error: {}", e);
                    axum::Error::new(e)
                }),
        ),
        _ => None,
    });

    Ok(Sse::new(stream)
        .keep_alive(KeepAlive::new().interval(std::time::Duration::from_secs(15))))
}

use super::handlers::{comments, feed, posts, sse, users};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState, allowed_origins: &str) -> Router {
    let cors = if allowed_origins == "*" {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_origin(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<HeaderValue>().ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("CORS config is invalid or empty, falling back to allow ANY.");
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_origin(Any)
                .allow_headers(Any)
        } else {
            tracing::info!("CORS enabled for origins: {:?}", origins);
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_origin(origins)
                .allow_headers(Any)
        }
    };

    Router::new()
        .route("/api/v1/users", post(users::create_user))
        .route("/api/v1/users/me", get(users::me))
        .route("/api/v1/posts", post(posts::create_draft))
        .route(
            "/api/v1/posts/:post_id",
            get(posts::get_post)
                .put(posts::edit_post)
                .delete(posts::delete_post),
        )
        .route("/api/v1/posts/:post_id/publish", put(posts::publish_post))
        .route("/api/v1/posts/:post_id/vote-up", put(posts::vote_up))
        .route("/api/v1/posts/:post_id/vote-down", put(posts::vote_down))
        .route(
            "/api/v1/posts/:post_id/comments",
            post(comments::create_comment),
        )
        .route(
            "/api/v1/posts/:post_id/comments/:comment_id",
            get(comments::get_comment).delete(comments::delete_comment),
        )
        .route(
            "/api/v1/posts/:post_id/comments/:comment_id/update",
            put(comments::update_comment),
        )
        .route(
            "/api/v1/posts/:post_id/comments/:comment_id/replies",
            post(comments::create_reply),
        )
        .route(
            "/api/v1/posts/:post_id/comments/:comment_id/vote-up",
            put(comments::vote_up),
        )
        .route(
            "/api/v1/posts/:post_id/comments/:comment_id/vote-down",
            put(comments::vote_down),
        )
        .route("/api/v1/posts/:post_id/sse", get(sse::post_stream))
        .route("/api/v1/feed", get(feed::list_feed))
        .route("/api/v1/notifications", get(feed::list_notifications))
        .route("/api/v1/notifications/sse", get(sse::notification_stream))
        .layer(cors)
        .with_state(state)
}

use crate::models::{Comment, EntityId, Notification};
use serde::{Deserialize, Serialize};

/// 广播给在线客户端的实时事件（SSE 推送用）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LiveEvent {
    CommentSaved {
        post_id: EntityId,
        comment: Comment,
    },
    CommentDeleted {
        post_id: EntityId,
        comment_id: EntityId,
    },
    NotificationCreated {
        notification: Notification,
    },
}

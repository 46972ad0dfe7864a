//! 协调器消费的外部协作者接口。实现细节（存储引擎、推送通道）不在核心范围内。

use anyhow::Result;
use async_trait::async_trait;
use domain::{Comment, EntityId, LiveEvent, NewsFeedEntry, Notification, Post, User};

#[async_trait]
pub trait PostStore: Send + Sync {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Post>>;
    async fn save(&self, post: &Post) -> Result<()>;
    async fn delete(&self, id: &EntityId, author_id: &EntityId) -> Result<bool>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn upsert(&self, comment: &Comment) -> Result<()>;
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Comment>>;
    /// 幂等：目标已缺失返回 false，不算错误
    async fn delete(&self, id: &EntityId) -> Result<bool>;
}

#[async_trait]
pub trait NewsFeedStore: Send + Sync {
    async fn create(&self, entry: &NewsFeedEntry) -> Result<()>;
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<NewsFeedEntry>>;
    /// 软删，幂等，返回实际置位的行数
    async fn mark_deleted(&self, item_id: &EntityId) -> Result<u64>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<()>;
    async fn list_for(
        &self,
        recipient: &EntityId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>>;
    async fn delete_for_item(&self, item_id: &EntityId) -> Result<u64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: &User, token: &str) -> Result<()>;
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<User>>;
    async fn save_karma(&self, id: &EntityId, karma: i64) -> Result<()>;
}

/// 实时推送能力。对核心来说是发后不管，投递机制在外面。
pub trait Notifier: Send + Sync {
    fn notify(&self, event: LiveEvent);
}

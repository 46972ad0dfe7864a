//! 把 storage::Db 接到协调器的协作者接口上。

use crate::coordinator::Coordinator;
use crate::stores::{
    CommentStore, NewsFeedStore, Notifier, NotificationStore, PostStore, UserStore,
};
use anyhow::Result;
use async_trait::async_trait;
use domain::{Comment, EntityId, NewsFeedEntry, Notification, Post, User};
use std::sync::Arc;
use storage::Db;

#[async_trait]
impl PostStore for Db {
    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Post>> {
        self.get_post(id.as_str()).await
    }

    async fn save(&self, post: &Post) -> Result<()> {
        self.upsert_post(post).await
    }

    async fn delete(&self, id: &EntityId, author_id: &EntityId) -> Result<bool> {
        self.delete_post(id.as_str(), author_id.as_str()).await
    }
}

#[async_trait]
impl CommentStore for Db {
    async fn upsert(&self, comment: &Comment) -> Result<()> {
        self.upsert_comment(comment).await
    }

    async fn find_by_id(&self, id: &EntityId) -> Result<Option<Comment>> {
        self.get_comment(id.as_str()).await
    }

    async fn delete(&self, id: &EntityId) -> Result<bool> {
        self.delete_comment(id.as_str()).await
    }
}

#[async_trait]
impl NewsFeedStore for Db {
    async fn create(&self, entry: &NewsFeedEntry) -> Result<()> {
        self.insert_feed_entry(entry).await
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<NewsFeedEntry>> {
        self.list_feed(limit, offset).await
    }

    async fn mark_deleted(&self, item_id: &EntityId) -> Result<u64> {
        self.mark_feed_deleted(item_id.as_str()).await
    }
}

#[async_trait]
impl NotificationStore for Db {
    async fn create(&self, notification: &Notification) -> Result<()> {
        self.insert_notification(notification).await
    }

    async fn list_for(
        &self,
        recipient: &EntityId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>> {
        self.list_notifications(recipient.as_str(), limit, offset).await
    }

    async fn delete_for_item(&self, item_id: &EntityId) -> Result<u64> {
        self.delete_notifications_for_item(item_id.as_str()).await
    }
}

#[async_trait]
impl UserStore for Db {
    async fn create(&self, user: &User, token: &str) -> Result<()> {
        self.insert_user(user, token).await
    }

    async fn find_by_id(&self, id: &EntityId) -> Result<Option<User>> {
        self.get_user(id.as_str()).await
    }

    async fn save_karma(&self, id: &EntityId, karma: i64) -> Result<()> {
        self.set_karma(id.as_str(), karma).await
    }
}

impl Coordinator {
    /// 生产装配：五个协作者共用同一个 SQLite 连接池
    pub fn with_sqlite(db: Db, notifier: Arc<dyn Notifier>) -> Self {
        let db = Arc::new(db);
        Coordinator::new(
            db.clone(),
            db.clone(),
            db.clone(),
            db.clone(),
            db,
            notifier,
        )
    }
}

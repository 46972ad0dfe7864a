//! ConsistencyCoordinator：让同一条评论的三份表示在每次变更后保持一致。
//!
//! 一条评论存在于 (a) Post 内嵌树里的节点、(b) 扁平快查记录、(c) 信息流
//! 条目，外加引用它的通知行。每个写操作都是一串命名步骤，每步带自己的
//! 失败策略：Post 文档（权威树）写失败中止整个操作；旁表只是反范式优化，
//! 写失败记日志继续，不回滚已写入的前序步骤。

use crate::stores::{
    CommentStore, NewsFeedStore, Notifier, NotificationStore, PostStore, UserStore,
};
use chrono::{NaiveDateTime, Utc};
use domain::karma;
use domain::tree::{self, CommentView, ParentRef, ParentView};
use domain::votes::{self, VoteDirection, VoteOutcome};
use domain::{
    Comment, CommentNode, DomainError, EntityId, FeedItemKind, LiveEvent, NewsFeedEntry,
    Notification, NotifyAction, Post, User,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("{0}")]
    Conflict(String),

    // 主存储失败：对外只暴露笼统的失败信息
    #[error("operation failed")]
    Storage(#[from] anyhow::Error),
}

/// 次要步骤的失败策略：记日志，吞掉，继续走
fn secondary<T>(step: &'static str, result: anyhow::Result<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(step, ?error, "secondary write failed, continuing");
            None
        }
    }
}

#[derive(Clone)]
pub struct Coordinator {
    posts: Arc<dyn PostStore>,
    comments: Arc<dyn CommentStore>,
    feed: Arc<dyn NewsFeedStore>,
    notifications: Arc<dyn NotificationStore>,
    users: Arc<dyn UserStore>,
    notifier: Arc<dyn Notifier>,
}

impl Coordinator {
    pub fn new(
        posts: Arc<dyn PostStore>,
        comments: Arc<dyn CommentStore>,
        feed: Arc<dyn NewsFeedStore>,
        notifications: Arc<dyn NotificationStore>,
        users: Arc<dyn UserStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            posts,
            comments,
            feed,
            notifications,
            users,
            notifier,
        }
    }

    async fn load_post(&self, id: &EntityId) -> Result<Post, ServiceError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::Domain(DomainError::not_found("post", id.as_str())))
    }

    /// 顶层评论。步骤：扁平记录 -> 信息流 -> 树插入 -> Post 回写。
    /// 第 1 步之后的失败不回滚扁平记录，留给修复作业对账。
    pub async fn create_comment(
        &self,
        actor: &User,
        post_id: &EntityId,
        text: &str,
    ) -> Result<Post, ServiceError> {
        let mut post = self.load_post(post_id).await?;
        let now = Utc::now().naive_utc();

        let node = CommentNode::new(actor, text, now);
        let flat = Comment::from_node(&post.id, &node);
        self.comments.upsert(&flat).await?;

        let entry = NewsFeedEntry::new(
            &actor.id,
            &flat.id,
            Some(&post.id),
            text,
            FeedItemKind::Comment,
            now,
        );
        secondary("newsfeed.create", self.feed.create(&entry).await);

        tree::insert_reply(&ParentRef::Root, node, &mut post.comments)?;
        post.updated_at = now;
        self.posts.save(&post).await?;

        self.send_notification(&post.author_id, actor, &flat.id, NotifyAction::Comment, now)
            .await;
        self.notifier.notify(LiveEvent::CommentSaved {
            post_id: post.id.clone(),
            comment: flat,
        });

        Ok(post)
    }

    /// 任意深度的回复。信息流条目的 parent 指向直接父评论而不是帖子。
    pub async fn create_reply(
        &self,
        actor: &User,
        post_id: &EntityId,
        parent_id: &EntityId,
        text: &str,
    ) -> Result<Post, ServiceError> {
        let mut post = self.load_post(post_id).await?;
        let parent_author = tree::find_by_id(parent_id, &post.comments)
            .map(|parent| parent.author_id.clone())
            .ok_or_else(|| {
                ServiceError::Domain(DomainError::not_found("comment", parent_id.as_str()))
            })?;
        let now = Utc::now().naive_utc();

        let node = CommentNode::new(actor, text, now);
        let flat = Comment::from_node(&post.id, &node);
        self.comments.upsert(&flat).await?;

        let entry = NewsFeedEntry::new(
            &actor.id,
            &flat.id,
            Some(parent_id),
            text,
            FeedItemKind::Comment,
            now,
        );
        secondary("newsfeed.create", self.feed.create(&entry).await);

        tree::insert_reply(&ParentRef::Node(parent_id.clone()), node, &mut post.comments)?;
        post.updated_at = now;
        self.posts.save(&post).await?;

        self.send_notification(&parent_author, actor, &flat.id, NotifyAction::Reply, now)
            .await;
        self.notifier.notify(LiveEvent::CommentSaved {
            post_id: post.id.clone(),
            comment: flat,
        });

        Ok(post)
    }

    /// 内容编辑：树和扁平记录尽力双写，一边失败不拦着另一边。
    pub async fn update_comment(
        &self,
        actor: &User,
        post_id: &EntityId,
        comment_id: &EntityId,
        new_content: &str,
    ) -> Result<CommentView, ServiceError> {
        let mut post = self.load_post(post_id).await?;
        let now = Utc::now().naive_utc();

        tree::update_content(comment_id, new_content, now, &mut post.comments)?;
        post.updated_at = now;

        let primary = self.posts.save(&post).await;

        if let Some(Some(mut flat)) =
            secondary("comment.find", self.comments.find_by_id(comment_id).await)
        {
            flat.content = new_content.to_string();
            flat.updated_at = Some(now);
            secondary("comment.save", self.comments.upsert(&flat).await);
        }

        primary?;

        let view = tree::attach_parent_view(comment_id, &post)?;
        let recipient = match &view.parent {
            ParentView::Post(parent) => parent.author_id.clone(),
            ParentView::Comment(parent) => parent.author_id.clone(),
        };
        self.send_notification(&recipient, actor, comment_id, NotifyAction::Update, now)
            .await;
        self.notifier.notify(LiveEvent::CommentSaved {
            post_id: post.id.clone(),
            comment: Comment::from_node(&post.id, &view.comment),
        });

        Ok(view)
    }

    /// 投票切换：树上切一次，结果原样镜像到扁平记录；
    /// KarmaPolicy 每次切换恰好结算一次，不受镜像写入成败影响。
    pub async fn vote_comment(
        &self,
        actor: &User,
        post_id: &EntityId,
        comment_id: &EntityId,
        direction: VoteDirection,
    ) -> Result<CommentView, ServiceError> {
        let mut post = self.load_post(post_id).await?;
        let now = Utc::now().naive_utc();

        let (outcome, node) =
            tree::toggle_vote(comment_id, &actor.id, direction, &mut post.comments)?;
        let mirrored = Comment::from_node(&post.id, node);
        let author_id = node.author_id.clone();

        self.posts.save(&post).await?;

        if let Some(Some(mut flat)) =
            secondary("comment.find", self.comments.find_by_id(comment_id).await)
        {
            flat.up_votes = mirrored.up_votes.clone();
            flat.down_votes = mirrored.down_votes.clone();
            flat.vote_total = mirrored.vote_total;
            secondary("comment.save", self.comments.upsert(&flat).await);
        }

        self.apply_karma(actor, &author_id, direction, outcome, now)
            .await;

        let action = match direction {
            VoteDirection::Up => NotifyAction::Upvote,
            VoteDirection::Down => NotifyAction::Downvote,
        };
        self.send_notification(&author_id, actor, comment_id, action, now)
            .await;

        Ok(tree::attach_parent_view(comment_id, &post)?)
    }

    /// 级联删除。权威树先摘先落库；之后整棵子树逐节点清理旁表，
    /// 每步都幂等：旁记录缺失是常态（比如早于通知功能的老评论），不是错误。
    pub async fn delete_comment(
        &self,
        actor: &User,
        post_id: &EntityId,
        comment_id: &EntityId,
    ) -> Result<EntityId, ServiceError> {
        let mut post = self.load_post(post_id).await?;
        let now = Utc::now().naive_utc();

        let detached = tree::cascade_delete(comment_id, &mut post.comments)?;
        post.updated_at = now;
        self.posts.save(&post).await?;

        for id in tree::subtree_ids(&detached) {
            secondary("comment.delete", self.comments.delete(&id).await);
            secondary("newsfeed.soft_delete", self.feed.mark_deleted(&id).await);
            secondary(
                "notification.delete",
                self.notifications.delete_for_item(&id).await,
            );
        }

        self.send_notification(
            &detached.author_id,
            actor,
            comment_id,
            NotifyAction::Delete,
            now,
        )
        .await;
        self.notifier.notify(LiveEvent::CommentDeleted {
            post_id: post.id.clone(),
            comment_id: comment_id.clone(),
        });

        Ok(detached.id)
    }

    /// 只读：节点加直接父级的响应形态，每次现算
    pub async fn comment_view(
        &self,
        post_id: &EntityId,
        comment_id: &EntityId,
    ) -> Result<CommentView, ServiceError> {
        let post = self.load_post(post_id).await?;
        Ok(tree::attach_parent_view(comment_id, &post)?)
    }

    pub async fn get_post(&self, post_id: &EntityId) -> Result<Post, ServiceError> {
        self.load_post(post_id).await
    }

    pub async fn create_draft(
        &self,
        actor: &User,
        title: &str,
        text: &str,
        categories: Vec<String>,
    ) -> Result<Post, ServiceError> {
        let now = Utc::now().naive_utc();
        let post = Post::new_draft(actor, title, text, categories, now);
        self.posts.save(&post).await?;
        Ok(post)
    }

    /// 发布时才进入信息流
    pub async fn publish_post(&self, actor: &User, post_id: &EntityId) -> Result<Post, ServiceError> {
        let mut post = self.load_own_post(actor, post_id).await?;
        if !post.draft || post.published {
            return Err(ServiceError::Conflict(format!(
                "post {} has already been published",
                post_id
            )));
        }

        let now = Utc::now().naive_utc();
        post.draft = false;
        post.published = true;
        post.updated_at = now;
        self.posts.save(&post).await?;

        let entry = NewsFeedEntry::new(
            &actor.id,
            &post.id,
            None,
            &post.title,
            FeedItemKind::Post,
            now,
        );
        secondary("newsfeed.create", self.feed.create(&entry).await);

        Ok(post)
    }

    pub async fn edit_post(
        &self,
        actor: &User,
        post_id: &EntityId,
        title: &str,
        text: &str,
        categories: Vec<String>,
    ) -> Result<Post, ServiceError> {
        let mut post = self.load_own_post(actor, post_id).await?;
        let now = Utc::now().naive_utc();

        post.title = title.to_string();
        post.text = text.to_string();
        post.categories = categories;
        post.draft = false;
        post.published = true;
        post.updated_at = now;
        self.posts.save(&post).await?;

        Ok(post)
    }

    pub async fn vote_post(
        &self,
        actor: &User,
        post_id: &EntityId,
        direction: VoteDirection,
    ) -> Result<Post, ServiceError> {
        let mut post = self.load_post(post_id).await?;
        let now = Utc::now().naive_utc();

        let outcome = votes::toggle(direction, &actor.id, &mut post.up_votes, &mut post.down_votes);
        post.vote_total = votes::vote_total(&post.up_votes, &post.down_votes);
        post.updated_at = now;
        self.posts.save(&post).await?;

        let author_id = post.author_id.clone();
        self.apply_karma(actor, &author_id, direction, outcome, now)
            .await;

        let action = match direction {
            VoteDirection::Up => NotifyAction::Upvote,
            VoteDirection::Down => NotifyAction::Downvote,
        };
        let item_id = post.id.clone();
        self.send_notification(&author_id, actor, &item_id, action, now)
            .await;

        Ok(post)
    }

    pub async fn delete_post(&self, actor: &User, post_id: &EntityId) -> Result<(), ServiceError> {
        if !self.posts.delete(post_id, &actor.id).await? {
            return Err(ServiceError::Domain(DomainError::not_found(
                "post",
                post_id.as_str(),
            )));
        }
        secondary("newsfeed.soft_delete", self.feed.mark_deleted(post_id).await);
        secondary(
            "notification.delete",
            self.notifications.delete_for_item(post_id).await,
        );
        Ok(())
    }

    pub async fn feed(&self, limit: i64, offset: i64) -> Result<Vec<NewsFeedEntry>, ServiceError> {
        Ok(self.feed.list(limit, offset).await?)
    }

    pub async fn notifications_for(
        &self,
        user: &User,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, ServiceError> {
        Ok(self.notifications.list_for(&user.id, limit, offset).await?)
    }

    pub async fn create_user(&self, username: &str) -> Result<(User, String), ServiceError> {
        let now = Utc::now().naive_utc();
        let user = User {
            id: EntityId::generate(),
            username: username.to_string(),
            karma: 0,
            created_at: now,
        };
        let token = EntityId::generate().to_string();
        self.users.create(&user, &token).await?;
        Ok((user, token))
    }

    async fn load_own_post(&self, actor: &User, post_id: &EntityId) -> Result<Post, ServiceError> {
        let post = self.load_post(post_id).await?;
        if post.author_id != actor.id {
            // 别人的帖子对操作者来说等同不存在
            return Err(ServiceError::Domain(DomainError::not_found(
                "post",
                post_id.as_str(),
            )));
        }
        Ok(post)
    }

    async fn apply_karma(
        &self,
        actor: &User,
        target_author: &EntityId,
        direction: VoteDirection,
        outcome: VoteOutcome,
        now: NaiveDateTime,
    ) {
        if !karma::eligible(actor, target_author, now) {
            return;
        }
        let Some(Some(author)) = secondary("user.find", self.users.find_by_id(target_author).await)
        else {
            return;
        };
        let updated = karma::apply_vote(author.karma, direction, outcome);
        if updated != author.karma {
            secondary(
                "user.karma",
                self.users.save_karma(target_author, updated).await,
            );
        }
    }

    /// 受影响方不是操作者本人时记一条通知并实时推送
    async fn send_notification(
        &self,
        recipient: &EntityId,
        actor: &User,
        item_id: &EntityId,
        action: NotifyAction,
        now: NaiveDateTime,
    ) {
        if recipient == &actor.id {
            return;
        }
        let notification = Notification::new(recipient, &actor.id, item_id, action, now);
        if secondary(
            "notification.create",
            self.notifications.create(&notification).await,
        )
        .is_some()
        {
            self.notifier
                .notify(LiveEvent::NotificationCreated { notification });
        }
    }
}

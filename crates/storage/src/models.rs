use anyhow::Context;
use chrono::NaiveDateTime;
use domain::{
    Comment, CommentNode, EntityId, FeedItemKind, NewsFeedEntry, Notification, NotifyAction, Post,
    User,
};
use sqlx::FromRow;

// 投票集合、分类、内嵌评论树都以 JSON 文本落在行内。
// Post 是单文档整读整写，评论树没有独立的行。

#[derive(FromRow)]
pub struct SqlPost {
    pub id: String,
    pub author_id: String,
    pub username: String,
    pub title: String,
    pub text: String,
    pub categories: String,
    pub draft: bool,
    pub published: bool,
    pub completed: bool,
    pub up_votes: String,
    pub down_votes: String,
    pub vote_total: i64,
    pub comments: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SqlPost {
    pub fn into_domain(self) -> anyhow::Result<Post> {
        Ok(Post {
            id: EntityId::new_unchecked(self.id),
            author_id: EntityId::new_unchecked(self.author_id),
            username: self.username,
            title: self.title,
            text: self.text,
            categories: serde_json::from_str(&self.categories)
                .context("corrupt categories column")?,
            draft: self.draft,
            published: self.published,
            completed: self.completed,
            up_votes: serde_json::from_str(&self.up_votes).context("corrupt up_votes column")?,
            down_votes: serde_json::from_str(&self.down_votes)
                .context("corrupt down_votes column")?,
            vote_total: self.vote_total,
            comments: serde_json::from_str::<Vec<CommentNode>>(&self.comments)
                .context("corrupt comments column")?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
pub struct SqlComment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub username: String,
    pub content: String,
    pub up_votes: String,
    pub down_votes: String,
    pub vote_total: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl SqlComment {
    pub fn into_domain(self) -> anyhow::Result<Comment> {
        Ok(Comment {
            id: EntityId::new_unchecked(self.id),
            post_id: EntityId::new_unchecked(self.post_id),
            author_id: EntityId::new_unchecked(self.author_id),
            username: self.username,
            content: self.content,
            up_votes: serde_json::from_str(&self.up_votes).context("corrupt up_votes column")?,
            down_votes: serde_json::from_str(&self.down_votes)
                .context("corrupt down_votes column")?,
            vote_total: self.vote_total,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
pub struct SqlFeedEntry {
    pub id: String,
    pub owner_id: String,
    pub item_id: String,
    pub parent_id: Option<String>,
    pub content: String,
    pub kind: String,
    pub deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SqlFeedEntry {
    pub fn into_domain(self) -> anyhow::Result<NewsFeedEntry> {
        let kind = FeedItemKind::parse(&self.kind)
            .with_context(|| format!("unknown feed kind: {}", self.kind))?;
        Ok(NewsFeedEntry {
            id: EntityId::new_unchecked(self.id),
            owner_id: EntityId::new_unchecked(self.owner_id),
            item_id: EntityId::new_unchecked(self.item_id),
            parent_id: self.parent_id.map(EntityId::new_unchecked),
            content: self.content,
            kind,
            deleted: self.deleted,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
pub struct SqlNotification {
    pub id: String,
    pub to_id: String,
    pub from_id: String,
    pub item_id: String,
    pub action: String,
    pub seen: bool,
    pub created_at: NaiveDateTime,
}

impl SqlNotification {
    pub fn into_domain(self) -> anyhow::Result<Notification> {
        let action = NotifyAction::parse(&self.action)
            .with_context(|| format!("unknown notification action: {}", self.action))?;
        Ok(Notification {
            id: EntityId::new_unchecked(self.id),
            to: EntityId::new_unchecked(self.to_id),
            from: EntityId::new_unchecked(self.from_id),
            item_id: EntityId::new_unchecked(self.item_id),
            action,
            seen: self.seen,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
pub struct SqlUser {
    pub id: String,
    pub username: String,
    pub karma: i64,
    pub created_at: NaiveDateTime,
}

impl From<SqlUser> for User {
    fn from(sql: SqlUser) -> Self {
        User {
            id: EntityId::new_unchecked(sql.id),
            username: sql.username,
            karma: sql.karma,
            created_at: sql.created_at,
        }
    }
}

pub fn ids_json(ids: &[EntityId]) -> anyhow::Result<String> {
    serde_json::to_string(ids).context("serialize id set")
}

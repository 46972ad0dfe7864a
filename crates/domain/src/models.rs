use crate::error::DomainError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// 校验外部传入的 ID：32 位小写十六进制。
    pub fn new(kind: &'static str, s: impl Into<String>) -> Result<Self, DomainError> {
        let s = s.into();
        if s.len() != 32 || !s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()) {
            return Err(DomainError::invalid_reference(kind, s));
        }
        Ok(Self(s))
    }

    pub fn new_unchecked(s: String) -> Self {
        Self(s)
    }

    pub fn generate() -> Self {
        Self(format!("{:032x}", rand::random::<u128>()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub karma: i64,
    pub created_at: NaiveDateTime,
}

/// 嵌入在 Post 里的递归评论节点。子节点按新到旧排列（新回复插在最前）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentNode {
    pub id: EntityId,
    pub author_id: EntityId,
    pub username: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
    pub up_votes: Vec<EntityId>,
    pub down_votes: Vec<EntityId>,
    pub vote_total: i64,
    pub comments: Vec<CommentNode>,
}

impl CommentNode {
    pub fn new(author: &User, content: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            id: EntityId::generate(),
            author_id: author.id.clone(),
            username: author.username.clone(),
            content: content.into(),
            created_at: now,
            updated_at: None,
            up_votes: Vec::new(),
            down_votes: Vec::new(),
            vote_total: 0,
            comments: Vec::new(),
        }
    }
}

/// 根聚合。评论树只存在于 Post 文档内部，整读整写。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: EntityId,
    pub author_id: EntityId,
    pub username: String,
    pub title: String,
    pub text: String,
    pub categories: Vec<String>,
    pub draft: bool,
    pub published: bool,
    pub completed: bool,
    pub up_votes: Vec<EntityId>,
    pub down_votes: Vec<EntityId>,
    pub vote_total: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub comments: Vec<CommentNode>,
}

impl Post {
    pub fn new_draft(
        author: &User,
        title: impl Into<String>,
        text: impl Into<String>,
        categories: Vec<String>,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: EntityId::generate(),
            author_id: author.id.clone(),
            username: author.username.clone(),
            title: title.into(),
            text: text.into(),
            categories,
            draft: true,
            published: false,
            completed: false,
            up_votes: Vec::new(),
            down_votes: Vec::new(),
            vote_total: 0,
            created_at: now,
            updated_at: now,
            comments: Vec::new(),
        }
    }
}

/// 扁平评论记录：树节点的非权威镜像，只为按 ID 的 O(1) 查询服务。
/// 树结构以 Post 内嵌的版本为准，这里只镜像单个节点的标量字段。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    pub post_id: EntityId,
    pub author_id: EntityId,
    pub username: String,
    pub content: String,
    pub up_votes: Vec<EntityId>,
    pub down_votes: Vec<EntityId>,
    pub vote_total: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: Option<NaiveDateTime>,
}

impl Comment {
    pub fn from_node(post_id: &EntityId, node: &CommentNode) -> Self {
        Self {
            id: node.id.clone(),
            post_id: post_id.clone(),
            author_id: node.author_id.clone(),
            username: node.username.clone(),
            content: node.content.clone(),
            up_votes: node.up_votes.clone(),
            down_votes: node.down_votes.clone(),
            vote_total: node.vote_total,
            created_at: node.created_at,
            updated_at: node.updated_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedItemKind {
    Post,
    Comment,
}

impl FeedItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedItemKind::Post => "Post",
            FeedItemKind::Comment => "Comment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Post" => Some(FeedItemKind::Post),
            "Comment" => Some(FeedItemKind::Comment),
            _ => None,
        }
    }
}

/// 信息流条目。永不硬删：其他地方可能还持有引用，需要重定向而不是 404。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsFeedEntry {
    pub id: EntityId,
    pub owner_id: EntityId,
    pub item_id: EntityId,
    pub parent_id: Option<EntityId>,
    pub content: String,
    pub kind: FeedItemKind,
    pub deleted: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewsFeedEntry {
    pub fn new(
        owner_id: &EntityId,
        item_id: &EntityId,
        parent_id: Option<&EntityId>,
        content: impl Into<String>,
        kind: FeedItemKind,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: EntityId::generate(),
            owner_id: owner_id.clone(),
            item_id: item_id.clone(),
            parent_id: parent_id.cloned(),
            content: content.into(),
            kind,
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyAction {
    Comment,
    Reply,
    Update,
    Upvote,
    Downvote,
    Delete,
    NewPost,
}

impl NotifyAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyAction::Comment => "Comment",
            NotifyAction::Reply => "Reply",
            NotifyAction::Update => "Update",
            NotifyAction::Upvote => "Upvote",
            NotifyAction::Downvote => "Downvote",
            NotifyAction::Delete => "Delete",
            NotifyAction::NewPost => "New Post",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Comment" => Some(NotifyAction::Comment),
            "Reply" => Some(NotifyAction::Reply),
            "Update" => Some(NotifyAction::Update),
            "Upvote" => Some(NotifyAction::Upvote),
            "Downvote" => Some(NotifyAction::Downvote),
            "Delete" => Some(NotifyAction::Delete),
            "New Post" => Some(NotifyAction::NewPost),
            _ => None,
        }
    }
}

/// 通知记录。被引用的评论子树删除时整行硬删。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub to: EntityId,
    pub from: EntityId,
    pub item_id: EntityId,
    pub action: NotifyAction,
    pub seen: bool,
    pub created_at: NaiveDateTime,
}

impl Notification {
    pub fn new(
        to: &EntityId,
        from: &EntityId,
        item_id: &EntityId,
        action: NotifyAction,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id: EntityId::generate(),
            to: to.clone(),
            from: from.clone(),
            item_id: item_id.clone(),
            action,
            seen: false,
            created_at: now,
        }
    }
}

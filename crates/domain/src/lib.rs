mod error;
mod events;
mod models;
pub mod karma;
pub mod tree;
pub mod votes;

pub use error::DomainError;
pub use events::LiveEvent;
pub use models::{
    Comment, CommentNode, EntityId, FeedItemKind, NewsFeedEntry, Notification, NotifyAction, Post,
    User,
};

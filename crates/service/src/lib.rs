mod coordinator;
mod notifier;
mod sqlite;
mod stores;

pub use coordinator::{Coordinator, ServiceError};
pub use notifier::BroadcastNotifier;
pub use stores::{
    CommentStore, NewsFeedStore, Notifier, NotificationStore, PostStore, UserStore,
};

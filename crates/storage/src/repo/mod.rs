mod comments;
mod newsfeed;
mod notifications;
mod posts;
mod users;

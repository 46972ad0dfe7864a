use crate::{
    models::{ids_json, SqlPost},
    Db,
};
use anyhow::Context;
use domain::Post;

impl Db {
    // Post 单文档整体写入：内嵌评论树随行一起覆盖
    pub async fn upsert_post(&self, post: &Post) -> anyhow::Result<()> {
        let comments =
            serde_json::to_string(&post.comments).context("serialize comment tree")?;
        let categories =
            serde_json::to_string(&post.categories).context("serialize categories")?;

        sqlx::query(
            r#"
            INSERT INTO posts (
                id, author_id, username, title, text, categories,
                draft, published, completed,
                up_votes, down_votes, vote_total,
                comments, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                text = excluded.text,
                categories = excluded.categories,
                draft = excluded.draft,
                published = excluded.published,
                completed = excluded.completed,
                up_votes = excluded.up_votes,
                down_votes = excluded.down_votes,
                vote_total = excluded.vote_total,
                comments = excluded.comments,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(post.id.as_str())
        .bind(post.author_id.as_str())
        .bind(&post.username)
        .bind(&post.title)
        .bind(&post.text)
        .bind(categories)
        .bind(post.draft)
        .bind(post.published)
        .bind(post.completed)
        .bind(ids_json(&post.up_votes)?)
        .bind(ids_json(&post.down_votes)?)
        .bind(post.vote_total)
        .bind(comments)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_post(&self, id: &str) -> anyhow::Result<Option<Post>> {
        let row = sqlx::query_as::<_, SqlPost>(
            r#"
            SELECT id, author_id, username, title, text, categories,
                   draft, published, completed,
                   up_votes, down_votes, vote_total,
                   comments, created_at, updated_at
            FROM posts
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SqlPost::into_domain).transpose()
    }

    // 只允许作者删自己的帖子，返回是否真的删了
    pub async fn delete_post(&self, id: &str, author_id: &str) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ? AND author_id = ?")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

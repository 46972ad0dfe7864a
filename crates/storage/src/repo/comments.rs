use crate::{
    models::{ids_json, SqlComment},
    Db,
};
use domain::Comment;

impl Db {
    // 扁平评论记录：创建和镜像更新共用一个 upsert
    pub async fn upsert_comment(&self, c: &Comment) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO comments (
                id, post_id, author_id, username, content,
                up_votes, down_votes, vote_total,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                content = excluded.content,
                up_votes = excluded.up_votes,
                down_votes = excluded.down_votes,
                vote_total = excluded.vote_total,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(c.id.as_str())
        .bind(c.post_id.as_str())
        .bind(c.author_id.as_str())
        .bind(&c.username)
        .bind(&c.content)
        .bind(ids_json(&c.up_votes)?)
        .bind(ids_json(&c.down_votes)?)
        .bind(c.vote_total)
        .bind(c.created_at)
        .bind(c.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_comment(&self, id: &str) -> anyhow::Result<Option<Comment>> {
        let row = sqlx::query_as::<_, SqlComment>(
            r#"
            SELECT id, post_id, author_id, username, content,
                   up_votes, down_votes, vote_total,
                   created_at, updated_at
            FROM comments
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(SqlComment::into_domain).transpose()
    }

    // 幂等硬删：行不存在不算错
    pub async fn delete_comment(&self, id: &str) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

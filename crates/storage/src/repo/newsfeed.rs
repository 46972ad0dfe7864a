use crate::{models::SqlFeedEntry, Db};
use chrono::Utc;
use domain::NewsFeedEntry;

impl Db {
    pub async fn insert_feed_entry(&self, entry: &NewsFeedEntry) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO newsfeed (
                id, owner_id, item_id, parent_id, content, kind,
                deleted, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.as_str())
        .bind(entry.owner_id.as_str())
        .bind(entry.item_id.as_str())
        .bind(entry.parent_id.as_ref().map(|id| id.as_str().to_string()))
        .bind(&entry.content)
        .bind(entry.kind.as_str())
        .bind(entry.deleted)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_feed(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<NewsFeedEntry>> {
        let rows = sqlx::query_as::<_, SqlFeedEntry>(
            r#"
            SELECT id, owner_id, item_id, parent_id, content, kind,
                   deleted, created_at, updated_at
            FROM newsfeed
            WHERE deleted = FALSE
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SqlFeedEntry::into_domain).collect()
    }

    // 软删：条目永不移除，置位后用于重定向失效链接。幂等。
    pub async fn mark_feed_deleted(&self, item_id: &str) -> anyhow::Result<u64> {
        let now = Utc::now().naive_utc();
        let result = sqlx::query(
            r#"
            UPDATE newsfeed
            SET deleted = TRUE, updated_at = ?
            WHERE item_id = ? AND deleted = FALSE
            "#,
        )
        .bind(now)
        .bind(item_id)
        .execute(&self.pool)
        .await?;

        let affected = result.rows_affected();
        if affected > 0 {
            tracing::debug!(item_id, affected, "feed entries soft-deleted");
        }
        Ok(affected)
    }
}

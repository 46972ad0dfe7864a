use crate::{models::SqlNotification, Db};
use domain::Notification;

impl Db {
    pub async fn insert_notification(&self, n: &Notification) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, to_id, from_id, item_id, action, seen, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(n.id.as_str())
        .bind(n.to.as_str())
        .bind(n.from.as_str())
        .bind(n.item_id.as_str())
        .bind(n.action.as_str())
        .bind(n.seen)
        .bind(n.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn list_notifications(
        &self,
        to_id: &str,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, SqlNotification>(
            r#"
            SELECT id, to_id, from_id, item_id, action, seen, created_at
            FROM notifications
            WHERE to_id = ?
            ORDER BY created_at DESC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(to_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(SqlNotification::into_domain)
            .collect()
    }

    // 被引用对象删除时整行清掉，幂等
    pub async fn delete_notifications_for_item(&self, item_id: &str) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM notifications WHERE item_id = ?")
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        let affected = result.rows_affected();
        if affected > 0 {
            tracing::debug!(item_id, affected, "notifications purged");
        }
        Ok(affected)
    }
}

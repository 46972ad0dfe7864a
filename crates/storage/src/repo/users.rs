use crate::{models::SqlUser, Db};
use domain::User;

impl Db {
    pub async fn insert_user(&self, user: &User, token: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, token, karma, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.username)
        .bind(token)
        .bind(user.karma)
        .bind(user.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_user(&self, id: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, SqlUser>(
            "SELECT id, username, karma, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    // Bearer token 解析出当前用户（令牌签发不在本服务范围内）
    pub async fn get_user_by_token(&self, token: &str) -> anyhow::Result<Option<User>> {
        let row = sqlx::query_as::<_, SqlUser>(
            "SELECT id, username, karma, created_at FROM users WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    pub async fn set_karma(&self, id: &str, karma: i64) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET karma = ? WHERE id = ?")
            .bind(karma)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

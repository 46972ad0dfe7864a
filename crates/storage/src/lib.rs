use anyhow::Context;
use sqlx::{
    migrate::MigrateDatabase,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous},
    Pool, Sqlite,
};
use std::{path::Path, str::FromStr, time::Duration};

mod models;
mod repo;

#[derive(Clone)]
pub struct Db {
    pub(crate) pool: Pool<Sqlite>,
}

impl Db {
    pub async fn new(db_url: &str) -> anyhow::Result<Self> {
        if let Some(file) = db_url
            .strip_prefix("sqlite://")
            .filter(|p| !p.contains(":memory:"))
        {
            if let Some(parent) = Path::new(file).parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("create database directory {}", parent.display())
                    })?;
                }
            }
        }

        if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
            Sqlite::create_database(db_url).await?;
        }

        // Post 是整文档读改写，写事务短但频繁：WAL 让读不挡写，
        // busy_timeout 吃掉偶发的写锁竞争而不是直接报 SQLITE_BUSY
        let options = SqliteConnectOptions::from_str(db_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await
            .with_context(|| format!("connect to {}", db_url))?;

        sqlx::migrate!("../../migrations").run(&pool).await?;

        Ok(Self { pool })
    }
}

use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::auth::repo::{PgUserRepo, UserRepo};
use crate::blogs::repo::{BlogRepo, PgBlogRepo};
use crate::comments::repo::{CommentRepo, PgCommentRepo};
use crate::config::AppConfig;
use crate::storage::{Storage, StorageClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub blogs: Arc<dyn BlogRepo>,
    pub comments: Arc<dyn CommentRepo>,
    pub storage: Arc<dyn StorageClient>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }

        let storage = Arc::new(Storage::new(&config.media).await?) as Arc<dyn StorageClient>;

        Ok(Self {
            users: Arc::new(PgUserRepo::new(db.clone())),
            blogs: Arc::new(PgBlogRepo::new(db.clone())),
            comments: Arc::new(PgCommentRepo::new(db)),
            config,
            storage,
        })
    }
}

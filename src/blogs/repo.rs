use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::blogs::repo_types::Blog;

const BLOG_COLUMNS: &str = "id, title, slug, content, excerpt, featured_image, published, \
     featured, category, tags, author_id, views, created_at, updated_at";

#[async_trait]
pub trait BlogRepo: Send + Sync {
    /// Published blogs, newest first.
    async fn list_published(&self) -> anyhow::Result<Vec<Blog>>;
    /// Every blog including drafts, newest first.
    async fn list_all(&self) -> anyhow::Result<Vec<Blog>>;
    async fn list_by_author(&self, author_id: Uuid) -> anyhow::Result<Vec<Blog>>;
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Blog>>;
    /// Adds one view and returns the blog carrying the new count.
    async fn increment_views(&self, id: Uuid) -> anyhow::Result<Option<Blog>>;
    async fn insert(&self, blog: &Blog) -> anyhow::Result<Blog>;
    /// Overwrites the editable fields; `None` if the row is gone.
    async fn update(&self, blog: &Blog) -> anyhow::Result<Option<Blog>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

pub struct PgBlogRepo {
    db: PgPool,
}

impl PgBlogRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BlogRepo for PgBlogRepo {
    async fn list_published(&self) -> anyhow::Result<Vec<Blog>> {
        let sql = format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE published = TRUE ORDER BY created_at DESC, seq DESC"
        );
        sqlx::query_as::<_, Blog>(&sql)
            .fetch_all(&self.db)
            .await
            .context("list published blogs")
    }

    async fn list_all(&self) -> anyhow::Result<Vec<Blog>> {
        let sql = format!("SELECT {BLOG_COLUMNS} FROM blogs ORDER BY created_at DESC, seq DESC");
        sqlx::query_as::<_, Blog>(&sql)
            .fetch_all(&self.db)
            .await
            .context("list all blogs")
    }

    async fn list_by_author(&self, author_id: Uuid) -> anyhow::Result<Vec<Blog>> {
        let sql = format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE author_id = $1 ORDER BY created_at DESC, seq DESC"
        );
        sqlx::query_as::<_, Blog>(&sql)
            .bind(author_id)
            .fetch_all(&self.db)
            .await
            .context("list blogs by author")
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Blog>> {
        let sql = format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1");
        sqlx::query_as::<_, Blog>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("find blog")
    }

    async fn increment_views(&self, id: Uuid) -> anyhow::Result<Option<Blog>> {
        let sql = format!(
            "UPDATE blogs SET views = views + 1 WHERE id = $1 RETURNING {BLOG_COLUMNS}"
        );
        sqlx::query_as::<_, Blog>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .context("increment blog views")
    }

    async fn insert(&self, blog: &Blog) -> anyhow::Result<Blog> {
        let sql = format!(
            r#"
            INSERT INTO blogs (id, title, slug, content, excerpt, featured_image, published,
                               featured, category, tags, author_id, views, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {BLOG_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Blog>(&sql)
            .bind(blog.id)
            .bind(&blog.title)
            .bind(&blog.slug)
            .bind(&blog.content)
            .bind(&blog.excerpt)
            .bind(&blog.featured_image)
            .bind(blog.published)
            .bind(blog.featured)
            .bind(&blog.category)
            .bind(&blog.tags)
            .bind(blog.author_id)
            .bind(blog.views)
            .bind(blog.created_at)
            .bind(blog.updated_at)
            .fetch_one(&self.db)
            .await
            .context("insert blog")
    }

    async fn update(&self, blog: &Blog) -> anyhow::Result<Option<Blog>> {
        let sql = format!(
            r#"
            UPDATE blogs
               SET title = $2, slug = $3, content = $4, excerpt = $5, featured_image = $6,
                   published = $7, featured = $8, category = $9, tags = $10, updated_at = $11
             WHERE id = $1
            RETURNING {BLOG_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Blog>(&sql)
            .bind(blog.id)
            .bind(&blog.title)
            .bind(&blog.slug)
            .bind(&blog.content)
            .bind(&blog.excerpt)
            .bind(&blog.featured_image)
            .bind(blog.published)
            .bind(blog.featured)
            .bind(&blog.category)
            .bind(&blog.tags)
            .bind(blog.updated_at)
            .fetch_optional(&self.db)
            .await
            .context("update blog")
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete blog")?;
        Ok(res.rows_affected() > 0)
    }
}

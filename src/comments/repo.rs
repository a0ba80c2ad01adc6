use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;

use crate::comments::repo_types::{Comment, Reply};

#[async_trait]
pub trait CommentRepo: Send + Sync {
    /// Comments on a post, newest first.
    async fn list_comments(&self, post_id: &str) -> anyhow::Result<Vec<Comment>>;
    async fn insert_comment(&self, comment: &Comment) -> anyhow::Result<Comment>;
    /// Replies on a post, newest first.
    async fn list_replies(&self, post_id: &str) -> anyhow::Result<Vec<Reply>>;
    async fn insert_reply(&self, reply: &Reply) -> anyhow::Result<Reply>;
}

pub struct PgCommentRepo {
    db: PgPool,
}

impl PgCommentRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentRepo for PgCommentRepo {
    async fn list_comments(&self, post_id: &str) -> anyhow::Result<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, name, email, body, created_at
              FROM comments
             WHERE post_id = $1
             ORDER BY created_at DESC, seq DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.db)
        .await
        .context("list comments")
    }

    async fn insert_comment(&self, comment: &Comment) -> anyhow::Result<Comment> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, post_id, name, email, body, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, post_id, name, email, body, created_at
            "#,
        )
        .bind(comment.id)
        .bind(&comment.post_id)
        .bind(&comment.name)
        .bind(&comment.email)
        .bind(&comment.body)
        .bind(comment.created_at)
        .fetch_one(&self.db)
        .await
        .context("insert comment")
    }

    async fn list_replies(&self, post_id: &str) -> anyhow::Result<Vec<Reply>> {
        sqlx::query_as::<_, Reply>(
            r#"
            SELECT id, post_id, parent_comment_id, name, body, created_at
              FROM replies
             WHERE post_id = $1
             ORDER BY created_at DESC, seq DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.db)
        .await
        .context("list replies")
    }

    async fn insert_reply(&self, reply: &Reply) -> anyhow::Result<Reply> {
        sqlx::query_as::<_, Reply>(
            r#"
            INSERT INTO replies (id, post_id, parent_comment_id, name, body, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, post_id, parent_comment_id, name, body, created_at
            "#,
        )
        .bind(reply.id)
        .bind(&reply.post_id)
        .bind(&reply.parent_comment_id)
        .bind(&reply.name)
        .bind(&reply.body)
        .bind(reply.created_at)
        .fetch_one(&self.db)
        .await
        .context("insert reply")
    }
}

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::repo_types::{Comment, Reply};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

fn required(fields: &[&str], msg: &str) -> ApiResult<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(ApiError::validation(msg));
    }
    Ok(())
}

pub async fn list_comments(state: &AppState, post_id: &str) -> ApiResult<Vec<Comment>> {
    required(&[post_id], "postId is required")?;
    Ok(state.comments.list_comments(post_id).await?)
}

pub async fn add_comment(
    state: &AppState,
    post_id: &str,
    name: &str,
    email: &str,
    body: &str,
) -> ApiResult<Comment> {
    required(
        &[post_id, name, email, body],
        "postId, name, email and comment are required",
    )?;

    let comment = Comment {
        id: Uuid::new_v4(),
        post_id: post_id.trim().to_string(),
        name: name.trim().to_string(),
        email: email.trim().to_string(),
        body: body.trim().to_string(),
        created_at: OffsetDateTime::now_utc(),
    };
    let saved = state.comments.insert_comment(&comment).await?;
    info!(comment_id = %saved.id, post_id = %saved.post_id, "comment added");
    Ok(saved)
}

pub async fn list_replies(state: &AppState, post_id: &str) -> ApiResult<Vec<Reply>> {
    required(&[post_id], "postId is required")?;
    Ok(state.comments.list_replies(post_id).await?)
}

/// The parent comment is not looked up; a reply may point at any id.
pub async fn add_reply(
    state: &AppState,
    post_id: &str,
    parent_comment_id: &str,
    name: &str,
    body: &str,
) -> ApiResult<Reply> {
    required(
        &[post_id, parent_comment_id, name, body],
        "postId, parentCommentId, name and reply are required",
    )?;

    let reply = Reply {
        id: Uuid::new_v4(),
        post_id: post_id.trim().to_string(),
        parent_comment_id: parent_comment_id.trim().to_string(),
        name: name.trim().to_string(),
        body: body.trim().to_string(),
        created_at: OffsetDateTime::now_utc(),
    };
    let saved = state.comments.insert_reply(&reply).await?;
    info!(reply_id = %saved.id, post_id = %saved.post_id, parent = %saved.parent_comment_id, "reply added");
    Ok(saved)
}

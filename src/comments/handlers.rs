use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{NewCommentRequest, NewReplyRequest, PostQuery};
use super::repo_types::{Comment, Reply};
use super::services;
use crate::{error::ApiResult, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/comments", get(list_comments).post(add_comment))
        .route("/replies", get(list_replies).post(add_reply))
}

#[instrument(skip(state))]
pub async fn list_comments(
    State(state): State<AppState>,
    Query(q): Query<PostQuery>,
) -> ApiResult<Json<Vec<Comment>>> {
    let post_id = q.post_id.unwrap_or_default();
    Ok(Json(services::list_comments(&state, &post_id).await?))
}

#[instrument(skip(state, body))]
pub async fn add_comment(
    State(state): State<AppState>,
    Query(q): Query<PostQuery>,
    body: Result<Json<NewCommentRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let Json(body) = body?;
    let post_id = q.post_id.unwrap_or_default();
    let comment =
        services::add_comment(&state, &post_id, &body.name, &body.email, &body.body).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[instrument(skip(state))]
pub async fn list_replies(
    State(state): State<AppState>,
    Query(q): Query<PostQuery>,
) -> ApiResult<Json<Vec<Reply>>> {
    let post_id = q.post_id.unwrap_or_default();
    Ok(Json(services::list_replies(&state, &post_id).await?))
}

#[instrument(skip(state, body))]
pub async fn add_reply(
    State(state): State<AppState>,
    Query(q): Query<PostQuery>,
    body: Result<Json<NewReplyRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Reply>)> {
    let Json(body) = body?;
    let post_id = q.post_id.unwrap_or_default();
    let reply =
        services::add_reply(&state, &post_id, &body.parent_comment_id, &body.name, &body.body)
            .await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{BlogPatch, BlogWithAuthor, CreateBlogRequest, MessageResponse};
use super::repo_types::Blog;
use super::services;
use crate::{
    app::API_PREFIX,
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", get(list_published))
        .route("/blogs/:id", get(get_blog))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/blogs", axum::routing::post(create_blog))
        .route("/blogs/:id", axum::routing::patch(update_blog).delete(delete_blog))
        .route("/admin/blogs", get(list_all))
        .route("/blogger/blogs", get(list_mine))
}

/// Malformed ids cannot match any blog.
fn parse_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound("Blog not found".into()))
}

#[instrument(skip(state))]
pub async fn list_published(State(state): State<AppState>) -> ApiResult<Json<Vec<BlogWithAuthor>>> {
    Ok(Json(services::list_published(&state).await?))
}

#[instrument(skip(state))]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BlogWithAuthor>> {
    let id = parse_id(&id)?;
    Ok(Json(services::get_by_id(&state, id).await?))
}

#[instrument(skip(state, body))]
pub async fn create_blog(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<CreateBlogRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, HeaderMap, Json<Blog>)> {
    let Json(body) = body?;
    let blog = services::create(&state, body, &user).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("{API_PREFIX}/blogs/{}", blog.id).parse() {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(blog)))
}

#[instrument(skip(state, patch))]
pub async fn update_blog(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    patch: Result<Json<BlogPatch>, JsonRejection>,
) -> ApiResult<Json<Blog>> {
    let id = parse_id(&id)?;
    let Json(patch) = patch?;
    Ok(Json(services::update(&state, id, patch, &user).await?))
}

#[instrument(skip(state))]
pub async fn delete_blog(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    services::delete(&state, id, &user).await?;
    Ok(Json(MessageResponse {
        message: "Blog deleted successfully".into(),
    }))
}

#[instrument(skip(state))]
pub async fn list_all(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Vec<Blog>>> {
    Ok(Json(services::list_all(&state, &user).await?))
}

#[instrument(skip(state))]
pub async fn list_mine(State(state): State<AppState>, user: AuthUser) -> ApiResult<Json<Vec<Blog>>> {
    Ok(Json(services::list_by_author(&state, user.id).await?))
}

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{AuthorInfo, BlogPatch, BlogWithAuthor, CreateBlogRequest};
use super::repo_types::Blog;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

lazy_static! {
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^a-z0-9\s-]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHENS: Regex = Regex::new(r"-+").unwrap();
}

/// Lowercase, drop anything outside `[a-z0-9 -]`, turn whitespace runs into
/// one hyphen, collapse repeated hyphens. Uniqueness is not enforced.
pub fn slugify(title: &str) -> String {
    let lower = title.trim().to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lower, "");
    let hyphenated = WHITESPACE.replace_all(stripped.trim(), "-");
    HYPHENS.replace_all(&hyphenated, "-").into_owned()
}

fn not_found() -> ApiError {
    ApiError::NotFound("Blog not found".into())
}

fn require_text(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(())
}

/// Best-effort author lookup. A missing user or a failed read yields the
/// placeholder rather than an error.
async fn author_info(state: &AppState, author_id: Uuid) -> AuthorInfo {
    match state.users.find_by_id(author_id).await {
        Ok(Some(u)) => AuthorInfo {
            name: u.name,
            email: u.email,
        },
        Ok(None) => AuthorInfo::unknown(),
        Err(e) => {
            warn!(error = %e, %author_id, "author lookup failed");
            AuthorInfo::unknown()
        }
    }
}

async fn with_authors(state: &AppState, blogs: Vec<Blog>) -> Vec<BlogWithAuthor> {
    let mut cache: HashMap<Uuid, AuthorInfo> = HashMap::new();
    let mut out = Vec::with_capacity(blogs.len());
    for blog in blogs {
        let author = match cache.get(&blog.author_id) {
            Some(a) => a.clone(),
            None => {
                let a = author_info(state, blog.author_id).await;
                cache.insert(blog.author_id, a.clone());
                a
            }
        };
        out.push(BlogWithAuthor { blog, author });
    }
    out
}

pub async fn list_published(state: &AppState) -> ApiResult<Vec<BlogWithAuthor>> {
    let blogs = state.blogs.list_published().await?;
    Ok(with_authors(state, blogs).await)
}

pub async fn list_all(state: &AppState, caller: &AuthUser) -> ApiResult<Vec<Blog>> {
    caller.require_admin()?;
    Ok(state.blogs.list_all().await?)
}

pub async fn list_by_author(state: &AppState, caller_id: Uuid) -> ApiResult<Vec<Blog>> {
    Ok(state.blogs.list_by_author(caller_id).await?)
}

/// Every call counts as a view; repeated fetches are not deduplicated.
pub async fn get_by_id(state: &AppState, id: Uuid) -> ApiResult<BlogWithAuthor> {
    let blog = state.blogs.increment_views(id).await?.ok_or_else(not_found)?;
    let author = author_info(state, blog.author_id).await;
    Ok(BlogWithAuthor { blog, author })
}

pub async fn create(state: &AppState, input: CreateBlogRequest, caller: &AuthUser) -> ApiResult<Blog> {
    if input.title.trim().is_empty() || input.content.trim().is_empty() {
        return Err(ApiError::validation("Title and content are required"));
    }

    let now = OffsetDateTime::now_utc();
    let blog = Blog {
        id: Uuid::new_v4(),
        slug: slugify(&input.title),
        title: input.title.trim().to_string(),
        content: input.content,
        excerpt: input.excerpt,
        featured_image: input.featured_image,
        published: input.published.unwrap_or(false),
        featured: input.featured.unwrap_or(false),
        category: input.category,
        tags: input.tags,
        author_id: caller.id,
        views: 0,
        created_at: now,
        updated_at: now,
    };

    let created = state.blogs.insert(&blog).await?;
    info!(blog_id = %created.id, author_id = %caller.id, slug = %created.slug, "blog created");
    Ok(created)
}

/// Applies every supplied field of `patch` over `blog`.
fn merge(blog: &mut Blog, patch: BlogPatch) -> ApiResult<()> {
    if let Some(title) = patch.title {
        require_text(&title, "Title")?;
        if patch.slug.is_none() {
            blog.slug = slugify(&title);
        }
        blog.title = title.trim().to_string();
    }
    if let Some(slug) = patch.slug {
        blog.slug = slugify(&slug);
    }
    if let Some(content) = patch.content {
        require_text(&content, "Content")?;
        blog.content = content;
    }
    if let Some(excerpt) = patch.excerpt {
        blog.excerpt = excerpt;
    }
    if let Some(image) = patch.featured_image {
        blog.featured_image = image;
    }
    if let Some(published) = patch.published {
        blog.published = published;
    }
    if let Some(featured) = patch.featured {
        blog.featured = featured;
    }
    if let Some(category) = patch.category {
        blog.category = category;
    }
    if let Some(tags) = patch.tags {
        blog.tags = tags;
    }
    Ok(())
}

pub async fn update(state: &AppState, id: Uuid, patch: BlogPatch, caller: &AuthUser) -> ApiResult<Blog> {
    let mut blog = state.blogs.find(id).await?.ok_or_else(not_found)?;
    if let Err(e) = caller.require_owner_or_admin(blog.author_id) {
        warn!(blog_id = %id, caller_id = %caller.id, "update refused");
        return Err(e);
    }

    merge(&mut blog, patch)?;
    blog.updated_at = OffsetDateTime::now_utc();

    let updated = state.blogs.update(&blog).await?.ok_or_else(not_found)?;
    info!(blog_id = %id, caller_id = %caller.id, "blog updated");
    Ok(updated)
}

pub async fn delete(state: &AppState, id: Uuid, caller: &AuthUser) -> ApiResult<()> {
    let blog = state.blogs.find(id).await?.ok_or_else(not_found)?;
    if let Err(e) = caller.require_owner_or_admin(blog.author_id) {
        warn!(blog_id = %id, caller_id = %caller.id, "delete refused");
        return Err(e);
    }

    if !state.blogs.delete(id).await? {
        return Err(not_found());
    }
    info!(blog_id = %id, caller_id = %caller.id, "blog deleted");
    Ok(())
}

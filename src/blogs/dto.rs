use serde::{Deserialize, Deserializer, Serialize};

use super::repo_types::Blog;

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Fields an authorized caller may overwrite. Absent fields are left as-is;
/// an explicit `null` clears the optional ones.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub excerpt: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub featured_image: Option<Option<String>>,
    pub published: Option<bool>,
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

/// Only called for keys that appear in the body, so `null` becomes `Some(None)`.
fn present<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorInfo {
    pub name: String,
    pub email: String,
}

impl AuthorInfo {
    pub fn unknown() -> Self {
        Self {
            name: UNKNOWN_AUTHOR.to_string(),
            email: String::new(),
        }
    }
}

/// Blog with its author's display details copied in.
#[derive(Debug, Serialize)]
pub struct BlogWithAuthor {
    #[serde(flatten)]
    pub blog: Blog,
    pub author: AuthorInfo,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_tells_null_from_absent() {
        let patch: BlogPatch =
            serde_json::from_value(json!({ "excerpt": null, "category": "cardiology" })).unwrap();
        assert_eq!(patch.excerpt, Some(None));
        assert_eq!(patch.category, Some(Some("cardiology".to_string())));
        assert_eq!(patch.featured_image, None);
    }
}

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostQuery {
    pub post_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewCommentRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "comment")]
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReplyRequest {
    #[serde(default, alias = "parentId", alias = "commentId")]
    pub parent_comment_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "reply")]
    pub body: String,
}

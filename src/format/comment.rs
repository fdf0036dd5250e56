use serde::Serialize;

use crate::api::models::RawComment;

/// Normalized comment.
///
/// `hide_type`, `likes` and `have_i_liked` are sparse: they are only set (and
/// only serialized) when the upstream value is non-zero / true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub body: Option<String>,
    pub author_id: Option<String>,
    pub created_at: i64,
    pub seq_number: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hide_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes: Option<i64>,
    #[serde(rename = "haveILiked", skip_serializing_if = "Option::is_none")]
    pub have_i_liked: Option<bool>,
}

impl From<&RawComment> for Comment {
    fn from(comment: &RawComment) -> Self {
        Self {
            id: comment.id.clone(),
            body: comment.body.clone(),
            author_id: comment.created_by.clone(),
            created_at: comment.created_at,
            seq_number: comment.seq_number,
            hide_type: Some(comment.hide_type).filter(|&t| t != 0),
            likes: Some(comment.likes).filter(|&n| n != 0),
            have_i_liked: comment.has_own_like.then_some(true),
        }
    }
}

/// Format a raw comment; `None` in, `None` out.
#[must_use]
pub fn format_comment(comment: Option<&RawComment>) -> Option<Comment> {
    comment.map(Comment::from)
}
